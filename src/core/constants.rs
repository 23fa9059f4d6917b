//! Picker-wide constants. Map conventions follow the usual slippy-map defaults.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom the camera accepts.
pub const MIN_ZOOM: f64 = 0.0;

/// Highest zoom the camera accepts (raster tile servers stop at 19).
pub const MAX_ZOOM: f64 = 19.0;

/// Zoom used for the initial camera and after a search selection.
pub const SELECTION_ZOOM: f64 = 15.0;

/// Location shown before the user picks anything (Canberra, Australia).
pub const DEFAULT_CENTER: (f64, f64) = (-35.2809, 149.13);

/// Marker pin size in logical pixels (width, height).
pub const MARKER_ICON_SIZE: (f32, f32) = (25.0, 41.0);

/// Hot-spot inside the marker icon, measured from its top-left corner.
pub const MARKER_ICON_ANCHOR: (f32, f32) = (12.5, 41.0);

/// Scroll distance (in points) that changes the zoom by one level.
pub const SCROLL_PIXELS_PER_ZOOM_LEVEL: f64 = 120.0;
