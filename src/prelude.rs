//! Prelude module for common location-picker types and traits
//!
//! `use location_picker::prelude::*;` brings in everything a host needs to
//! mount a picker and feed it events.

pub use crate::core::{
    config::{GoogleMapsConfig, MapOptions, PickerConfig, TileLoadingConfig},
    geo::{LatLng, Point},
    viewport::Viewport,
};

pub use crate::input::events::{EventHandled, MapEvent};

pub use crate::picker::{InteractiveView, LocationPicker, PickerView, Readiness};

pub use crate::provider::{
    google::GoogleMapsProvider, GeocodeResponse, GeocodeStatus, Geocoder, MapHandle, MapProvider,
    PlaceAutocomplete, PlaceResult, Prediction,
};

pub use crate::runtime::{AsyncHandle, AsyncSpawner};

#[cfg(feature = "egui")]
pub use crate::{tiles::TileLayer, ui::widget::PickerWidget};

pub use crate::{Error, Result};

pub use std::sync::Arc;
