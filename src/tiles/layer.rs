use super::{
    cache::TileCache,
    loader::{fetch_tile, visible_tiles},
};
use crate::{
    core::{config::TileLoadingConfig, geo::TileCoord, viewport::Viewport},
    runtime::AsyncSpawner,
    Result,
};
use crossbeam_channel::{Receiver, Sender};
use egui::{Color32, Painter, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use futures::FutureExt;
use std::collections::HashSet;
use std::sync::Arc;

type TileReply = (TileCoord, Result<egui::ColorImage>);

/// Raster base map drawn under the marker.
///
/// Missing tiles are requested in the background and painted once their
/// texture has been uploaded; until then the slot stays blank.
pub struct TileLayer {
    config: TileLoadingConfig,
    client: reqwest::Client,
    spawner: Arc<dyn AsyncSpawner>,
    textures: TileCache<TextureHandle>,
    pending: HashSet<TileCoord>,
    failed: HashSet<TileCoord>,
    tx: Sender<TileReply>,
    rx: Receiver<TileReply>,
}

impl TileLayer {
    pub fn new(config: TileLoadingConfig, spawner: Arc<dyn AsyncSpawner>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            textures: TileCache::new(config.cache_size),
            config,
            client,
            spawner,
            pending: HashSet::new(),
            failed: HashSet::new(),
            tx,
            rx,
        })
    }

    pub fn attribution(&self) -> &str {
        &self.config.attribution
    }

    pub fn loaded_tiles(&self) -> usize {
        self.textures.len()
    }

    pub fn pending_tiles(&self) -> usize {
        self.pending.len()
    }

    /// Uploads finished downloads as textures. Returns true if any arrived.
    pub fn poll(&mut self, ctx: &egui::Context) -> bool {
        let mut arrived = false;
        while let Ok((coord, outcome)) = self.rx.try_recv() {
            self.pending.remove(&coord);
            match outcome {
                Ok(image) => {
                    let name = format!("tile_{}_{}_{}", coord.z, coord.x, coord.y);
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    self.textures.insert(coord, texture);
                    arrived = true;
                }
                Err(e) => {
                    log::warn!("failed to load tile {:?}: {}", coord, e);
                    self.failed.insert(coord);
                }
            }
        }
        arrived
    }

    /// Paints the tiles covering `viewport` into `rect`, requesting missing ones
    pub fn paint(&mut self, painter: &Painter, rect: Rect, viewport: &Viewport) {
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        for tile in visible_tiles(viewport) {
            let min = rect.min + Vec2::new(tile.min.x as f32, tile.min.y as f32);
            let tile_rect = Rect::from_min_size(min, Vec2::splat(tile.size as f32));

            if let Some(texture) = self.textures.get(&tile.coord) {
                painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                continue;
            }
            self.request(tile.coord);
        }
    }

    fn request(&mut self, coord: TileCoord) {
        if self.pending.contains(&coord) || self.failed.contains(&coord) {
            return;
        }
        self.pending.insert(coord);

        let client = self.client.clone();
        let config = self.config.clone();
        let tx = self.tx.clone();
        self.spawner.spawn_boxed(
            async move {
                let outcome = fetch_tile(client, config, coord).await;
                let _ = tx.send((coord, outcome));
            }
            .boxed(),
        );
    }
}
