//! Background tile downloads and the visible-tile grid.

use crate::{
    core::{
        config::TileLoadingConfig,
        constants::{MAX_ZOOM, TILE_SIZE},
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    runtime, Error, Result,
};
use std::time::Duration;

/// A tile that intersects the viewport, positioned in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub coord: TileCoord,
    /// Top-left corner relative to the map container
    pub min: Point,
    /// Edge length on screen
    pub size: f64,
}

/// Tiles covering the viewport. Longitudes wrap; rows past the poles are skipped.
pub fn visible_tiles(viewport: &Viewport) -> Vec<VisibleTile> {
    let z = viewport.zoom.floor().clamp(0.0, MAX_ZOOM) as u8;
    let scale = 2_f64.powf(viewport.zoom - z as f64);
    let tile_px = TILE_SIZE as f64;
    let n = 2_i64.pow(z as u32);

    let origin = viewport.pixel_origin();
    let origin_z = origin.multiply(1.0 / scale);
    let extent_z = viewport.size.multiply(1.0 / scale);

    // Projection round-off must not pull in a neighbour that is not on screen
    const EPS: f64 = 1e-6;
    let first_x = (origin_z.x / tile_px + EPS).floor() as i64;
    let last_x = ((origin_z.x + extent_z.x) / tile_px - EPS).ceil() as i64 - 1;
    let first_y = ((origin_z.y / tile_px + EPS).floor() as i64).max(0);
    let last_y = (((origin_z.y + extent_z.y) / tile_px - EPS).ceil() as i64 - 1).min(n - 1);

    let mut tiles = Vec::new();
    for ty in first_y..=last_y {
        for tx in first_x..=last_x {
            let coord = TileCoord::new(tx.rem_euclid(n) as u32, ty as u32, z);
            let min = Point::new(
                tx as f64 * tile_px * scale - origin.x,
                ty as f64 * tile_px * scale - origin.y,
            );
            tiles.push(VisibleTile {
                coord,
                min,
                size: tile_px * scale,
            });
        }
    }
    tiles
}

/// Downloads and decodes one tile, retrying transient failures
pub async fn fetch_tile(
    client: reqwest::Client,
    config: TileLoadingConfig,
    coord: TileCoord,
) -> Result<egui::ColorImage> {
    let url = config.tile_url(coord.x, coord.y, coord.z);
    let mut attempt = 0;
    loop {
        attempt += 1;
        log::debug!("fetch tile {:?} attempt {}", coord, attempt);
        match download(&client, &url).await {
            Ok(bytes) => {
                log::debug!("downloaded tile {:?} ({} bytes)", coord, bytes.len());
                return decode_tile(&bytes);
            }
            Err(e) if attempt <= config.max_retries => {
                log::debug!("tile {:?} download failed on attempt {}: {}", coord, attempt, e);
                runtime::delay(Duration::from_millis(config.retry_delay_ms)).await;
            }
            Err(e) => {
                log::warn!("giving up on tile {:?}: {}", coord, e);
                return Err(e);
            }
        }
    }
}

async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// Decodes PNG/JPEG tile bytes into an egui image
pub fn decode_tile(bytes: &[u8]) -> Result<egui::ColorImage> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| Error::Image(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        rgba.as_raw(),
    ))
}
