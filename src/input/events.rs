use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

/// Pointer input on the map surface, already resolved against the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Single click/tap at a geographic position
    Click { lat_lng: LatLng, pixel: Point },
    /// Drag in progress, in container pixels
    Drag { delta: Point },
    /// Scroll wheel or pinch zoom around a container position
    Scroll { delta: f64, position: Point },
}
