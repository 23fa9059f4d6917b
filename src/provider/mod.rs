//! Contracts for the external map capabilities the picker consumes.
//!
//! The picker only ever talks to a [`MapProvider`]. It hands out the map
//! camera, the reverse geocoder and the place autocomplete client, so a
//! test can swap the whole vendor SDK for an in-memory fake.

pub mod camera;
pub mod google;

use crate::{
    core::{
        config::MapOptions,
        geo::{LatLng, Point},
    },
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use camera::Camera;

/// Entry point to a mapping SDK
#[async_trait]
pub trait MapProvider: Send + Sync {
    /// Resolves once the SDK is usable. An error keeps the picker on its
    /// loading placeholder for good.
    async fn load(&self) -> Result<()>;

    /// Creates the map surface's camera
    fn render_map(&self, center: LatLng, zoom: f64, options: &MapOptions) -> Box<dyn MapHandle>;

    /// Creates a reverse geocoding client
    fn create_geocoder(&self) -> Arc<dyn Geocoder>;

    /// Creates a place autocomplete client
    fn autocomplete(&self) -> Arc<dyn PlaceAutocomplete>;
}

/// Camera control of a rendered map
pub trait MapHandle: Send {
    fn pan_to(&mut self, center: LatLng);

    fn set_zoom(&mut self, zoom: f64);

    fn center(&self) -> LatLng;

    fn zoom(&self) -> f64;

    /// Moves the camera by a drag offset in container pixels
    fn pan_by(&mut self, _delta: Point) {}

    /// Zooms keeping a container pixel fixed
    fn zoom_around(&mut self, zoom: f64, _focus: Point) {
        self.set_zoom(zoom);
    }

    /// Informs the camera about the container size
    fn resize(&mut self, _size: Point) {}
}

/// Turns coordinates into addresses
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, location: LatLng) -> Result<GeocodeResponse>;
}

/// Search-as-you-type place lookup
#[async_trait]
pub trait PlaceAutocomplete: Send + Sync {
    async fn predictions(&self, input: &str) -> Result<Vec<Prediction>>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceResult>;
}

/// Geometry of a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// A place as returned by search or geocoding. Geometry is optional: some
/// search results only carry a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PlaceResult {
    pub fn at(location: LatLng) -> Self {
        Self {
            geometry: Some(Geometry { location }),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.formatted_address = Some(address.into());
        self
    }

    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().map(|g| g.location)
    }
}

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub description: String,
    pub place_id: String,
}

impl Prediction {
    pub fn new(description: impl Into<String>, place_id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            place_id: place_id.into(),
        }
    }
}

/// Service status codes shared by the Google web services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GeocodeStatus {
    Ok,
    ZeroResults,
    NotFound,
    OverQueryLimit,
    OverDailyLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    Other(String),
}

impl GeocodeStatus {
    pub fn is_ok(&self) -> bool {
        *self == GeocodeStatus::Ok
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeocodeStatus::Ok => "OK",
            GeocodeStatus::ZeroResults => "ZERO_RESULTS",
            GeocodeStatus::NotFound => "NOT_FOUND",
            GeocodeStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            GeocodeStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            GeocodeStatus::RequestDenied => "REQUEST_DENIED",
            GeocodeStatus::InvalidRequest => "INVALID_REQUEST",
            GeocodeStatus::UnknownError => "UNKNOWN_ERROR",
            GeocodeStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for GeocodeStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "OK" => GeocodeStatus::Ok,
            "ZERO_RESULTS" => GeocodeStatus::ZeroResults,
            "NOT_FOUND" => GeocodeStatus::NotFound,
            "OVER_QUERY_LIMIT" => GeocodeStatus::OverQueryLimit,
            "OVER_DAILY_LIMIT" => GeocodeStatus::OverDailyLimit,
            "REQUEST_DENIED" => GeocodeStatus::RequestDenied,
            "INVALID_REQUEST" => GeocodeStatus::InvalidRequest,
            "UNKNOWN_ERROR" => GeocodeStatus::UnknownError,
            _ => GeocodeStatus::Other(raw),
        }
    }
}

impl From<GeocodeStatus> for String {
    fn from(status: GeocodeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for GeocodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Results of one reverse geocode request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub status: GeocodeStatus,
}

impl GeocodeResponse {
    pub fn ok(results: Vec<PlaceResult>) -> Self {
        Self {
            results,
            status: GeocodeStatus::Ok,
        }
    }

    pub fn failed(status: GeocodeStatus) -> Self {
        Self {
            results: Vec::new(),
            status,
        }
    }

    /// The first result's address when the request succeeded with a
    /// non-empty address
    pub fn best_address(&self) -> Option<&str> {
        if !self.status.is_ok() {
            return None;
        }
        self.results
            .first()
            .and_then(|r| r.formatted_address.as_deref())
            .filter(|a| !a.trim().is_empty())
    }
}
