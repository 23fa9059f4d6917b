use super::MapHandle;
use crate::core::{
    config::MapOptions,
    geo::{LatLng, Point},
    viewport::Viewport,
};

/// Map camera backed by a Web Mercator [`Viewport`].
///
/// Providers that draw the map themselves (the egui surface) use this as
/// their [`MapHandle`]. The reported center is the coordinate last panned
/// to; only the projection clamps it to the displayable latitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    viewport: Viewport,
    center: LatLng,
}

impl Camera {
    pub fn new(center: LatLng, zoom: f64, options: &MapOptions) -> Self {
        let mut viewport = Viewport::new(center, zoom, Point::new(800.0, 600.0));
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);
        Self { viewport, center }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

impl MapHandle for Camera {
    fn pan_to(&mut self, center: LatLng) {
        self.viewport.set_center(center);
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn pan_by(&mut self, delta: Point) {
        self.viewport.pan(delta);
        self.center = self.viewport.center;
    }

    fn zoom_around(&mut self, zoom: f64, focus: Point) {
        let before = self.viewport.center;
        self.viewport.zoom_to(zoom, Some(focus));
        let after = self.viewport.center;
        // Projection round-off alone must not snap a polar center to the clamp
        if (after.lat - before.lat).abs() > 1e-9 || (after.lng - before.lng).abs() > 1e-9 {
            self.center = after;
        }
    }

    fn resize(&mut self, size: Point) {
        self.viewport.set_size(size);
    }
}
