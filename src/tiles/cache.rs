use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;

/// In-memory tile store using LRU eviction
#[derive(Debug)]
pub struct TileCache<T> {
    cache: LruCache<TileCoord, T>,
}

impl<T> TileCache<T> {
    /// Create a new tile cache with the given capacity (at least one tile)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Get a tile, marking it as recently used
    pub fn get(&mut self, coord: &TileCoord) -> Option<&T> {
        self.cache.get(coord)
    }

    /// Insert a tile, returning whatever got evicted
    pub fn insert(&mut self, coord: TileCoord, tile: T) -> Option<(TileCoord, T)> {
        self.cache.push(coord, tile).filter(|(evicted, _)| *evicted != coord)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
