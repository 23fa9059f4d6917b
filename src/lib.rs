//! # location-picker
//!
//! An interactive map with an address search box for choosing one location.
//!
//! Searching for a place or clicking the map moves a single marker and the
//! camera to the chosen point, and the address field shows either the
//! place's address or the reverse-geocoded address of the clicked point.
//! Vendor capabilities (geocoding, autocomplete) sit behind the
//! [`provider::MapProvider`] trait; the map itself is drawn with egui.

pub mod core;
pub mod input;
pub mod layers;
pub mod picker;
pub mod prelude;
pub mod provider;
pub mod runtime;
#[cfg(feature = "egui")]
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GoogleMapsConfig, MapOptions, PickerConfig, TileLoadingConfig},
    geo::{LatLng, Point, TileCoord},
    viewport::Viewport,
};

pub use input::events::{EventHandled, MapEvent};

pub use layers::marker::Marker;

pub use picker::{InteractiveView, LocationPicker, PickerView, Readiness, SelectionState};

pub use provider::{
    google::GoogleMapsProvider, Camera, GeocodeResponse, GeocodeStatus, Geocoder, MapHandle,
    MapProvider, PlaceAutocomplete, PlaceResult, Prediction,
};

#[cfg(feature = "egui")]
pub use ui::widget::PickerWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider returned {status}: {message}")]
    Provider { status: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(String),
}
