//! Google Maps Platform gateway.
//!
//! Talks to the Geocoding, Places Autocomplete and Place Details web
//! services over HTTPS with `reqwest`. The map itself is drawn locally by the
//! egui surface, so rendering only creates a [`Camera`].

use super::{
    Camera, GeocodeResponse, GeocodeStatus, Geocoder, MapHandle, MapProvider, PlaceAutocomplete,
    PlaceResult, Prediction,
};
use crate::{
    core::{
        config::{GoogleMapsConfig, MapOptions, API_KEY_ENV},
        geo::LatLng,
    },
    Error, Result,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const DETAILS_FIELDS: &str = "formatted_address,geometry,name,place_id";

/// [`MapProvider`] backed by the Google Maps web services
pub struct GoogleMapsProvider {
    api: Arc<GoogleApi>,
}

impl GoogleMapsProvider {
    pub fn new(config: GoogleMapsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("location-picker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: GoogleMapsConfig, client: reqwest::Client) -> Self {
        Self {
            api: Arc::new(GoogleApi { config, client }),
        }
    }

    pub fn config(&self) -> &GoogleMapsConfig {
        &self.api.config
    }
}

#[async_trait]
impl MapProvider for GoogleMapsProvider {
    async fn load(&self) -> Result<()> {
        if !self.api.config.has_api_key() {
            return Err(Error::Config(format!("{} is not set", API_KEY_ENV)));
        }
        log::debug!("google maps provider ready ({:?})", self.api.config);
        Ok(())
    }

    fn render_map(&self, center: LatLng, zoom: f64, options: &MapOptions) -> Box<dyn MapHandle> {
        Box::new(Camera::new(center, zoom, options))
    }

    fn create_geocoder(&self) -> Arc<dyn Geocoder> {
        self.api.clone()
    }

    fn autocomplete(&self) -> Arc<dyn PlaceAutocomplete> {
        self.api.clone()
    }
}

struct GoogleApi {
    config: GoogleMapsConfig,
    client: reqwest::Client,
}

impl GoogleApi {
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("key", self.config.api_key.as_str()));
        if let Some(language) = &self.config.language {
            query.push(("language", language.as_str()));
        }

        log::debug!("GET {}", url);
        let body = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl Geocoder for GoogleApi {
    async fn reverse_geocode(&self, location: LatLng) -> Result<GeocodeResponse> {
        let latlng = format!("{},{}", location.lat, location.lng);
        let body = self.get("geocode/json", &[("latlng", latlng.as_str())]).await?;
        parse_geocode(&body)
    }
}

#[async_trait]
impl PlaceAutocomplete for GoogleApi {
    async fn predictions(&self, input: &str) -> Result<Vec<Prediction>> {
        let body = self
            .get("place/autocomplete/json", &[("input", input)])
            .await?;
        parse_predictions(&body)
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceResult> {
        let body = self
            .get(
                "place/details/json",
                &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
            )
            .await?;
        parse_place_details(&body)
    }
}

#[derive(Deserialize)]
struct GeocodeBody {
    #[serde(default)]
    results: Vec<PlaceResult>,
    status: GeocodeStatus,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct AutocompleteBody {
    #[serde(default)]
    predictions: Vec<Prediction>,
    status: GeocodeStatus,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DetailsBody {
    #[serde(default)]
    result: Option<PlaceResult>,
    status: GeocodeStatus,
    #[serde(default)]
    error_message: Option<String>,
}

/// Parses a Geocoding API body. Non-OK statuses are returned as data, not
/// errors; the picker decides how to fall back.
pub fn parse_geocode(body: &str) -> Result<GeocodeResponse> {
    let body: GeocodeBody = serde_json::from_str(body)?;
    if let Some(message) = &body.error_message {
        log::warn!("geocoding returned {}: {}", body.status, message);
    }
    Ok(GeocodeResponse {
        results: body.results,
        status: body.status,
    })
}

/// Parses a Places Autocomplete body. `ZERO_RESULTS` is an empty list.
pub fn parse_predictions(body: &str) -> Result<Vec<Prediction>> {
    let body: AutocompleteBody = serde_json::from_str(body)?;
    match body.status {
        GeocodeStatus::Ok => Ok(body.predictions),
        GeocodeStatus::ZeroResults => Ok(Vec::new()),
        status => Err(Error::Provider {
            status: status.to_string(),
            message: body.error_message.unwrap_or_default(),
        }),
    }
}

/// Parses a Place Details body
pub fn parse_place_details(body: &str) -> Result<PlaceResult> {
    let body: DetailsBody = serde_json::from_str(body)?;
    match (body.status, body.result) {
        (GeocodeStatus::Ok, Some(result)) => Ok(result),
        (status, _) => Err(Error::Provider {
            status: status.to_string(),
            message: body.error_message.unwrap_or_default(),
        }),
    }
}
