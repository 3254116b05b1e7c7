//! Core data structures for ldtk_tiles
//!
//! This crate turns a level editor's exported tileset data into immutable,
//! shareable tile definitions:
//! - `TilesetCatalog` - One `TileDefinition` per tile id, built once per load
//! - `TileDefinition` - Sprite region, enum tags, parsed collider and attributes
//! - `ColliderSpec` - Collider geometry declared in per-tile custom data
//! - `FieldValue` - Typed value for raw field data
//! - `Fields` - Default-returning getters over a list of field instances
//!
//! Runtime composition (tile stacks, grids and their projections) lives in
//! `ldtk_tiles_runtime`.

mod collision;
pub mod custom_data;
mod field;
mod source;
mod tileset;
mod value;

pub use collision::{Bounds, ColliderSpec, TileCollider};
pub use field::{EntityRef, FieldInstance, Fields, GridPoint, TileRef};
pub use source::{
    CustomDataSource, EnumTagSource, LayerSource, LevelSource, TileInstanceSource,
    TilesetSource, WorldDefinitionsSource, WorldSource,
};
pub use tileset::{PixelRect, SpriteSource, TileDefinition, TilesetCatalog, TilesetLayout};
pub use value::FieldValue;
