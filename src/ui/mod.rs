pub mod widget;

pub use widget::PickerWidget;

use crate::picker::LocationPicker;

pub trait UiPickerExt {
    /// Adds a location picker filling the available space
    fn location_picker(&mut self, picker: &mut LocationPicker) -> egui::Response;
}

impl UiPickerExt for egui::Ui {
    fn location_picker(&mut self, picker: &mut LocationPicker) -> egui::Response {
        self.add(PickerWidget::new(picker))
    }
}
