//! Runtime tile composition for ldtk_tiles
//!
//! Places shared tile definitions from `ldtk_tiles_core` into grids:
//! - `TileStack` - Elements painted bottom to top in one cell, with a merged
//!   sprite and a merged collider
//! - `TileGrid` - Fixed-size grid of stacks with collision and render
//!   projections kept in step with every write
//! - `TileLayer` - A grid bound to one tileset, addressed by tileset
//!   coordinates or pixel positions
//! - `WorldLoader` - Builds tile layers from the editor's project JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use ldtk_tiles_runtime::{Flip, TileGrid};
//!
//! let mut grid = TileGrid::new(16, 9);
//! grid.stack_add((3, 4), catalog.get(12).unwrap().clone());
//! grid.stack_add((3, 4), catalog.get(40).unwrap().clone());
//!
//! // Two elements, so the render cell holds a composite sprite
//! let cell = grid.render_at((3, 4)).unwrap();
//! assert!(cell.sprite.is_composite());
//! ```

mod element;
mod grid;
mod layer;
pub mod loader;
mod merged;
mod stack;

pub use element::TileElement;
pub use grid::{GridCoord, Projection, TileGrid};
pub use layer::TileLayer;
pub use loader::{LoadError, TilesetRegistry, WorldLoader};
pub use merged::{Merged, RenderCell};
pub use stack::{Flip, TileStack};
