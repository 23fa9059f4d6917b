//! Configuration for the picker, the map surface and the provider gateway.
//!
//! Every struct has sensible defaults so a host only has to override what it
//! cares about. All of them derive serde so they can be embedded in a larger
//! configuration file.

use crate::core::constants::{DEFAULT_CENTER, SELECTION_ZOOM};
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Environment variable holding the map-provider API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Optional environment variable selecting the result language (e.g. `en-AU`).
pub const LANGUAGE_ENV: &str = "LOCATION_PICKER_LANGUAGE";

/// Top-level picker behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Selection and camera center at mount
    pub default_center: LatLng,
    /// Camera zoom at mount
    pub initial_zoom: f64,
    /// Zoom applied after a search selection recenters the map
    pub selection_zoom: f64,
    /// Queries shorter than this (after trimming) do not hit the autocomplete service
    pub min_query_len: usize,
    pub map_options: MapOptions,
    pub tiles: TileLoadingConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            initial_zoom: SELECTION_ZOOM,
            selection_zoom: SELECTION_ZOOM,
            min_query_len: 1,
            map_options: MapOptions::default(),
            tiles: TileLoadingConfig::default(),
        }
    }
}

/// Options handed to the map surface when it is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub zoom_control: bool,
    pub street_view_control: bool,
    pub map_type_control: bool,
    pub fullscreen_control: bool,
    /// Drag to pan and scroll to zoom the camera
    pub gestures: bool,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom_control: false,
            street_view_control: false,
            map_type_control: false,
            fullscreen_control: false,
            gestures: true,
            min_zoom: crate::core::constants::MIN_ZOOM,
            max_zoom: crate::core::constants::MAX_ZOOM,
        }
    }
}

/// Raster tile fetching for the map surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoadingConfig {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub user_agent: String,
    /// Decoded tiles kept as textures
    pub cache_size: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl TileLoadingConfig {
    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            user_agent: concat!("location-picker/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_size: 256,
            max_retries: 2,
            retry_delay_ms: 250,
        }
    }
}

/// Google Maps Platform web-service settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    /// Base URL of the `maps/api` web services
    pub base_url: String,
    pub language: Option<String>,
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads the API key and language from the process environment.
    ///
    /// A missing key is not reported here; the provider's `load()` fails
    /// instead and the picker stays on its placeholder.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            language: std::env::var(LANGUAGE_ENV).ok().filter(|l| !l.is_empty()),
            ..Self::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            language: None,
        }
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<missing>" })
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_defaults() {
        let config = PickerConfig::default();

        assert_eq!(config.default_center, LatLng::new(-35.2809, 149.13));
        assert_eq!(config.initial_zoom, 15.0);
        assert_eq!(config.selection_zoom, 15.0);
        assert!(!config.map_options.zoom_control);
        assert!(!config.map_options.street_view_control);
        assert!(!config.map_options.map_type_control);
        assert!(!config.map_options.fullscreen_control);
        assert!(config.map_options.gestures);
    }

    #[test]
    fn test_tile_url_template() {
        let tiles = TileLoadingConfig::default();
        assert_eq!(
            tiles.tile_url(3, 5, 7),
            "https://tile.openstreetmap.org/7/3/5.png"
        );
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: PickerConfig =
            serde_json::from_str(r#"{"selection_zoom": 12.0, "map_options": {"gestures": false}}"#)
                .unwrap();

        assert_eq!(config.selection_zoom, 12.0);
        assert_eq!(config.initial_zoom, 15.0);
        assert!(!config.map_options.gestures);
        assert_eq!(config.tiles, TileLoadingConfig::default());
    }

    #[test]
    fn test_api_key_is_not_debug_printed() {
        let config = GoogleMapsConfig::new("secret-key");
        let printed = format!("{:?}", config);

        assert!(config.has_api_key());
        assert!(!printed.contains("secret-key"));
        assert!(!GoogleMapsConfig::default().has_api_key());
    }
}
