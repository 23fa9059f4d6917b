use location_picker::{
    prelude::*,
    runtime::spawners::tokio_impl::TokioSpawner,
    ui::UiPickerExt,
};

/// Standalone location picker
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let google = GoogleMapsConfig::from_env();
    if !google.has_api_key() {
        log::warn!(
            "{} is not set; the map will stay on its loading placeholder",
            location_picker::core::config::API_KEY_ENV
        );
    }

    let spawner: Arc<dyn AsyncSpawner> = Arc::new(TokioSpawner::new());
    let provider: Arc<dyn MapProvider> = Arc::new(GoogleMapsProvider::new(google)?);
    let config = PickerConfig::default();
    let tiles = TileLayer::new(config.tiles.clone(), spawner.clone())?;
    let picker = LocationPicker::mount(provider, spawner, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Location Picker"),
        ..Default::default()
    };

    let app = PickerApp {
        picker: Some(picker),
        tiles,
        plain: false,
    };
    eframe::run_native("picker-app", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("window failed: {e}"))?;

    Ok(())
}

struct PickerApp {
    picker: Option<LocationPicker>,
    tiles: TileLayer,
    /// Hide raster tiles and draw only the marker
    plain: bool,
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.plain, "Hide tiles");
                ui.separator();
                match picker.selection() {
                    Some(selection) => {
                        ui.label(format!("Selected: {}", selection.position.to_coordinate_text()));
                        ui.separator();
                        ui.label(picker.address().unwrap_or_default());
                    }
                    None => {
                        ui.label("Loading map...");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Tiles: {}", self.tiles.loaded_tiles()));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.plain {
                    ui.location_picker(picker);
                } else {
                    ui.add(PickerWidget::new(picker).tiles(&mut self.tiles));
                }
            });
    }
}

impl Drop for PickerApp {
    fn drop(&mut self) {
        if let Some(picker) = self.picker.take() {
            picker.unmount();
        }
    }
}
