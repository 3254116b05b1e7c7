//! Deserializable mirrors of the editor's save-file JSON
//!
//! Only the members this crate consumes are declared; everything else in the
//! file is ignored by serde. Names follow the editor's JSON keys.

use crate::FieldInstance;
use serde::{Deserialize, Serialize};

/// Enum tag applied to a set of tiles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EnumTagSource {
    #[serde(rename = "enumValueId")]
    pub value: String,
    #[serde(rename = "tileIds", default)]
    pub tile_ids: Vec<i64>,
}

/// Free-text custom data attached to one tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomDataSource {
    #[serde(rename = "tileId")]
    pub tile_id: i64,
    #[serde(default)]
    pub data: String,
}

/// Tileset definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TilesetSource {
    pub uid: i64,
    pub identifier: String,
    #[serde(rename = "__cWid")]
    pub tile_count_x: u32,
    #[serde(rename = "__cHei")]
    pub tile_count_y: u32,
    #[serde(rename = "tileGridSize")]
    pub tile_size: u32,
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(rename = "enumTags", default)]
    pub enum_tags: Vec<EnumTagSource>,
    #[serde(rename = "customData", default)]
    pub custom_data: Vec<CustomDataSource>,
}

/// A tile placed in a layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileInstanceSource {
    /// Tile id in the tileset
    #[serde(rename = "t")]
    pub tile_id: i64,
    /// Flip bits: X on bit 0, Y on bit 1
    #[serde(rename = "f", default)]
    pub flip: u8,
    /// Pixel position in the layer
    pub px: [i64; 2],
    /// Pixel position in the tileset texture
    pub src: [i64; 2],
}

/// A layer instance inside a level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LayerSource {
    #[serde(rename = "__type")]
    pub kind: String,
    #[serde(rename = "__identifier", default)]
    pub identifier: String,
    #[serde(default)]
    pub iid: String,
    #[serde(rename = "__cWid")]
    pub width: u32,
    #[serde(rename = "__cHei")]
    pub height: u32,
    #[serde(rename = "__gridSize")]
    pub grid_size: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "__tilesetDefUid", default)]
    pub tileset_uid: Option<i64>,
    #[serde(rename = "__pxTotalOffsetX", default)]
    pub offset_x: i64,
    #[serde(rename = "__pxTotalOffsetY", default)]
    pub offset_y: i64,
    #[serde(rename = "gridTiles", default)]
    pub grid_tiles: Vec<TileInstanceSource>,
    #[serde(rename = "autoLayerTiles", default)]
    pub auto_layer_tiles: Vec<TileInstanceSource>,
}

fn default_visible() -> bool {
    true
}

impl LayerSource {
    /// Whether this layer type can hold tiles
    pub fn has_tiles(&self) -> bool {
        matches!(self.kind.as_str(), "Tiles" | "IntGrid" | "AutoLayer")
    }

    /// Every placed tile, hand-placed first, in file order
    pub fn tiles(&self) -> impl Iterator<Item = &TileInstanceSource> {
        self.grid_tiles.iter().chain(self.auto_layer_tiles.iter())
    }
}

/// Level header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LevelSource {
    pub identifier: String,
    #[serde(default)]
    pub iid: String,
    #[serde(rename = "worldX", default)]
    pub world_x: i64,
    #[serde(rename = "worldY", default)]
    pub world_y: i64,
    #[serde(rename = "pxWid", default)]
    pub width: i64,
    #[serde(rename = "pxHei", default)]
    pub height: i64,
    #[serde(rename = "__bgColor", default)]
    pub background_color: String,
    #[serde(rename = "fieldInstances", default)]
    pub fields: Vec<FieldInstance>,
    /// `None` when levels are saved to separate files
    #[serde(rename = "layerInstances", default)]
    pub layers: Option<Vec<LayerSource>>,
}

/// Project-wide definitions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorldDefinitionsSource {
    #[serde(default)]
    pub tilesets: Vec<TilesetSource>,
}

/// Root of a project file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorldSource {
    pub defs: WorldDefinitionsSource,
    #[serde(default)]
    pub levels: Vec<LevelSource>,
}
