use crate::{
    core::{
        constants::{MARKER_ICON_ANCHOR, MARKER_ICON_SIZE, SCROLL_PIXELS_PER_ZOOM_LEVEL},
        geo::Point,
        viewport::Viewport,
    },
    input::events::MapEvent,
    picker::{InteractiveView, LocationPicker, PickerView},
    tiles::TileLayer,
};
use egui::{
    Align2, Color32, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Widget,
};
use std::time::Duration;

const SEARCH_BOX_WIDTH: f32 = 420.0;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Immediate-mode view of a [`LocationPicker`].
///
/// Draws a loading skeleton until the picker is ready, then the map surface
/// with its marker and the search box floating over the top edge.
///
/// # Examples
///
/// ```ignore
/// ui.add(PickerWidget::new(&mut picker).tiles(&mut tiles));
/// ```
pub struct PickerWidget<'a> {
    picker: &'a mut LocationPicker,
    tiles: Option<&'a mut TileLayer>,
    size: Option<Vec2>,
    hint: String,
    background_color: Color32,
}

impl<'a> PickerWidget<'a> {
    pub fn new(picker: &'a mut LocationPicker) -> Self {
        Self {
            picker,
            tiles: None,
            size: None,
            hint: "Enter a location".to_string(),
            background_color: Color32::from_rgb(230, 230, 230),
        }
    }

    /// Draw raster tiles under the marker
    pub fn tiles(mut self, tiles: &'a mut TileLayer) -> Self {
        self.tiles = Some(tiles);
        self
    }

    /// Set the widget size (otherwise uses available space)
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    /// Placeholder text of the search box
    pub fn hint_text(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn background_color(mut self, color: Color32) -> Self {
        self.background_color = color;
        self
    }
}

impl Widget for PickerWidget<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let PickerWidget {
            picker,
            mut tiles,
            size,
            hint,
            background_color,
        } = self;

        let mut needs_repaint = picker.poll();
        if let Some(tiles) = tiles.as_deref_mut() {
            needs_repaint |= tiles.poll(ui.ctx());
        }

        let desired_size = size.unwrap_or_else(|| ui.available_size());
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        let map_size = Point::new(rect.width() as f64, rect.height() as f64);

        let view = match picker.view() {
            PickerView::Placeholder => {
                paint_skeleton(ui, rect);
                ui.ctx().request_repaint_after(POLL_INTERVAL);
                return response;
            }
            PickerView::Interactive(view) => view,
        };

        picker.resize_map(map_size);
        let viewport = Viewport::new(view.camera_center, view.zoom, map_size);

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y) as f64;
            if scroll.abs() > 0.1 {
                if let Some(pointer) = response.hover_pos() {
                    let position = container_point(rect, pointer);
                    picker.handle_map_event(MapEvent::Scroll {
                        delta: scroll / SCROLL_PIXELS_PER_ZOOM_LEVEL,
                        position,
                    });
                    needs_repaint = true;
                }
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                picker.handle_map_event(MapEvent::Drag {
                    delta: Point::new(delta.x as f64, delta.y as f64),
                });
                needs_repaint = true;
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let pixel = container_point(rect, pointer);
                picker.handle_map_event(MapEvent::Click {
                    lat_lng: viewport.pixel_to_lat_lng(&pixel),
                    pixel,
                });
                needs_repaint = true;
            }
        }

        // Gestures and clicks may have moved the camera
        let view = match picker.view() {
            PickerView::Interactive(view) => view,
            PickerView::Placeholder => view,
        };
        let viewport = Viewport::new(view.camera_center, view.zoom, map_size);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, background_color);
        if let Some(tiles) = tiles.as_deref_mut() {
            tiles.paint(&painter, rect, &viewport);
            needs_repaint |= tiles.pending_tiles() > 0;
            paint_attribution(&painter, rect, tiles.attribution());
        }
        paint_marker(&painter, rect, &viewport, &view);

        search_box(ui, rect, picker, &view, &hint);

        if needs_repaint {
            ui.ctx().request_repaint();
        }
        if picker.has_pending_work() {
            ui.ctx().request_repaint_after(POLL_INTERVAL);
        }

        response
    }
}

fn container_point(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

/// Pulsing grey bars shown while the provider loads
fn paint_skeleton(ui: &Ui, rect: Rect) {
    let painter = ui.painter_at(rect);
    let t = ui.input(|i| i.time);
    let pulse = ((t * 2.0).sin() * 0.5 + 0.5) as f32;
    let gray = (200.0 + 30.0 * pulse) as u8;
    let color = Color32::from_gray(gray);

    let width = (rect.width() * 0.6).min(SEARCH_BOX_WIDTH);
    let left = rect.center().x - width / 2.0;
    for (row, fraction) in [1.0_f32, 0.9, 0.75].into_iter().enumerate() {
        let top = rect.min.y + 24.0 + row as f32 * 18.0;
        let bar = Rect::from_min_size(Pos2::new(left, top), Vec2::new(width * fraction, 10.0));
        painter.rect_filled(bar, 4.0, color);
    }
}

fn paint_marker(painter: &egui::Painter, rect: Rect, viewport: &Viewport, view: &InteractiveView) {
    let tip = viewport.lat_lng_to_pixel(&view.marker.position());
    let tip = rect.min + Vec2::new(tip.x as f32, tip.y as f32);
    if !rect.expand(MARKER_ICON_SIZE.1).contains(tip) {
        return;
    }

    let (width, height) = MARKER_ICON_SIZE;
    let (anchor_x, anchor_y) = MARKER_ICON_ANCHOR;
    let top_left = tip - Vec2::new(anchor_x, anchor_y);
    let head_radius = width / 2.0;
    let head = top_left + Vec2::new(width / 2.0, head_radius);

    let fill = Color32::from_rgb(219, 68, 55);
    let outline = Stroke::new(1.0, Color32::from_rgb(150, 30, 25));
    painter.add(Shape::convex_polygon(
        vec![
            head + Vec2::new(-head_radius * 0.8, head_radius * 0.6),
            head + Vec2::new(head_radius * 0.8, head_radius * 0.6),
            top_left + Vec2::new(width / 2.0, height),
        ],
        fill,
        Stroke::NONE,
    ));
    painter.circle(head, head_radius, fill, outline);
    painter.circle_filled(head, head_radius * 0.35, Color32::from_rgb(120, 20, 15));
}

fn paint_attribution(painter: &egui::Painter, rect: Rect, attribution: &str) {
    if attribution.is_empty() {
        return;
    }
    painter.text(
        rect.left_bottom() + Vec2::new(5.0, -5.0),
        Align2::LEFT_BOTTOM,
        attribution,
        FontId::proportional(10.0),
        Color32::from_gray(90),
    );
}

/// Search input with its suggestion list, floating over the map
fn search_box(ui: &Ui, rect: Rect, picker: &mut LocationPicker, view: &InteractiveView, hint: &str) {
    let width = SEARCH_BOX_WIDTH.min(rect.width() - 32.0).max(120.0);
    let origin = Pos2::new(rect.center().x - width / 2.0, rect.min.y + 16.0);

    egui::Area::new(ui.id().with("location_picker_search"))
        .order(egui::Order::Foreground)
        .fixed_pos(origin)
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(width);

                let mut text = view.address.clone();
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text(hint)
                        .desired_width(f32::INFINITY),
                );
                if edit.changed() {
                    picker.set_query(text);
                }

                let mut chosen = None;
                for (index, prediction) in view.suggestions.iter().enumerate() {
                    if ui
                        .selectable_label(false, prediction.description.as_str())
                        .clicked()
                    {
                        chosen = Some(index);
                    }
                }
                if let Some(index) = chosen {
                    picker.select_suggestion(index);
                }
            });
        });
}
