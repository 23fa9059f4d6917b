use crate::core::geo::LatLng;

/// The single pin drawn on the map surface.
///
/// The picker owns exactly one of these and moves it only when a selection
/// is committed, so it always sits on the selected coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: LatLng,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self { position }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }
}
