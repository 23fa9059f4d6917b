pub mod cache;
pub mod layer;
pub mod loader;

pub use cache::TileCache;
pub use layer::TileLayer;
pub use loader::{visible_tiles, VisibleTile};
