//! Building tile layers from the editor's project JSON
//!
//! Tilesets are registered once per load in a [`TilesetRegistry`] keyed by
//! the editor's tileset uid. Layers are then built against that registry,
//! stacking every tile placed in the same cell in file order.
//!
//! # Example
//!
//! ```rust,ignore
//! use ldtk_tiles_runtime::WorldLoader;
//!
//! let loader = WorldLoader::from_json(&json, &atlas, |tag| match tag {
//!     "Solid" => Some(1),
//!     _ => None,
//! })?;
//!
//! // Bottom layer first
//! for layer in loader.load_level("Level_0")? {
//!     let walls = layer.grid().collision();
//! }
//! ```

use crate::{Flip, TileLayer};
use bevy::log::warn;
use ldtk_tiles_core::{
    Fields, LayerSource, LevelSource, SpriteSource, TilesetCatalog, TilesetSource, WorldSource,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error type for project loading failures
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Layer references unknown tileset uid {0}")]
    UnknownTileset(i64),
    #[error("Level '{0}' not found")]
    UnknownLevel(String),
}

/// Tileset catalogs of one load, keyed by tileset uid
#[derive(Debug, Clone)]
pub struct TilesetRegistry<S> {
    tilesets: HashMap<i64, Arc<TilesetCatalog<S>>>,
}

impl<S> Default for TilesetRegistry<S> {
    fn default() -> Self {
        Self {
            tilesets: HashMap::new(),
        }
    }
}

impl<S: Clone> TilesetRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog for every tileset definition
    pub fn from_definitions<P, C>(tilesets: &[TilesetSource], sprites: &P, classify: C) -> Self
    where
        P: SpriteSource<Sprite = S>,
        C: Fn(&str) -> Option<i32>,
    {
        let mut registry = Self::new();
        for source in tilesets {
            let catalog = TilesetCatalog::from_source(source, sprites, &classify);
            registry.insert(source.uid, catalog);
        }
        registry
    }

    /// Register a catalog, returning the one it replaced
    pub fn insert(
        &mut self,
        uid: i64,
        catalog: TilesetCatalog<S>,
    ) -> Option<Arc<TilesetCatalog<S>>> {
        self.tilesets.insert(uid, Arc::new(catalog))
    }

    /// Build the tile layer of a layer instance.
    ///
    /// Returns `Ok(None)` for layers that hold no tiles, and for tile layers
    /// without an assigned tileset (logged).
    pub fn build_layer(&self, source: &LayerSource) -> Result<Option<TileLayer<S>>, LoadError> {
        if !source.has_tiles() {
            return Ok(None);
        }
        let Some(uid) = source.tileset_uid else {
            warn!(
                "Unable to load layer '{}', no tileset assigned",
                source.identifier
            );
            return Ok(None);
        };
        let tileset = self
            .tilesets
            .get(&uid)
            .ok_or(LoadError::UnknownTileset(uid))?;

        let mut layer = TileLayer::new(
            source.identifier.clone(),
            tileset.clone(),
            [source.width, source.height],
            source.grid_size,
            [source.offset_x, source.offset_y],
        );
        layer.visible = source.visible;

        for tile in source.tiles() {
            let src = [tile.src[0] as f32, tile.src[1] as f32];
            let px = [tile.px[0] as f32, tile.px[1] as f32];
            if !layer.add_tile_stack_local(src, px, Flip::from_bits(tile.flip)) {
                warn!(
                    "Layer '{}': tile {} from {:?} at {:?} does not fit, skipping",
                    source.identifier, tile.tile_id, tile.src, tile.px
                );
            }
        }

        Ok(Some(layer))
    }
}

impl<S> TilesetRegistry<S> {
    pub fn get(&self, uid: i64) -> Option<&Arc<TilesetCatalog<S>>> {
        self.tilesets.get(&uid)
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }
}

/// A parsed project: its tilesets and level headers
#[derive(Debug, Clone)]
pub struct WorldLoader<S> {
    tilesets: TilesetRegistry<S>,
    levels: Vec<LevelSource>,
}

impl<S: Clone> WorldLoader<S> {
    pub fn from_json<P, C>(json: &str, sprites: &P, classify: C) -> Result<Self, LoadError>
    where
        P: SpriteSource<Sprite = S>,
        C: Fn(&str) -> Option<i32>,
    {
        let world = load_world_from_str(json)?;
        Ok(Self::from_world(world, sprites, classify))
    }

    pub fn from_world<P, C>(world: WorldSource, sprites: &P, classify: C) -> Self
    where
        P: SpriteSource<Sprite = S>,
        C: Fn(&str) -> Option<i32>,
    {
        Self {
            tilesets: TilesetRegistry::from_definitions(&world.defs.tilesets, sprites, classify),
            levels: world.levels,
        }
    }

    /// Tile layers of a level, bottom layer first
    pub fn load_level(&self, name: &str) -> Result<Vec<TileLayer<S>>, LoadError> {
        let level = self.level(name)?;
        self.load_layers(level)
    }

    /// Tile layers of a level header or a separately saved level file,
    /// bottom layer first.
    ///
    /// The editor lists layers top first.
    pub fn load_layers(&self, level: &LevelSource) -> Result<Vec<TileLayer<S>>, LoadError> {
        let Some(layers) = &level.layers else {
            warn!(
                "Level '{}' has no layer data, its layers are saved separately",
                level.identifier
            );
            return Ok(Vec::new());
        };

        let mut built = Vec::new();
        for source in layers.iter().rev() {
            if let Some(layer) = self.tilesets.build_layer(source)? {
                built.push(layer);
            }
        }
        Ok(built)
    }
}

impl<S> WorldLoader<S> {
    pub fn tilesets(&self) -> &TilesetRegistry<S> {
        &self.tilesets
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.identifier.as_str())
    }

    pub fn level(&self, name: &str) -> Result<&LevelSource, LoadError> {
        self.levels
            .iter()
            .find(|level| level.identifier == name)
            .ok_or_else(|| {
                warn!("Level '{}' not found", name);
                LoadError::UnknownLevel(name.to_string())
            })
    }

    /// Field getters of a level. Empty when the level does not exist.
    pub fn level_fields(&self, name: &str) -> Fields<'_> {
        match self.level(name) {
            Ok(level) => Fields::new(&level.fields),
            Err(_) => Fields::new(&[]),
        }
    }
}

/// Load a project from a JSON string
pub fn load_world_from_str(json: &str) -> Result<WorldSource, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a separately saved level from a JSON string
pub fn load_level_from_str(json: &str) -> Result<LevelSource, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a separately saved level from bytes
pub fn load_level_from_bytes(bytes: &[u8]) -> Result<LevelSource, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Merged;
    use ldtk_tiles_core::{ColliderSpec, PixelRect};

    struct Regions;

    impl SpriteSource for Regions {
        type Sprite = PixelRect;

        fn atlas_region(&self, region: PixelRect) -> PixelRect {
            region
        }

        fn animation(&self, _name: &str) -> Option<PixelRect> {
            None
        }
    }

    fn classify(tag: &str) -> Option<i32> {
        (tag == "Solid").then_some(1)
    }

    const PROJECT: &str = r#"{
        "defs": {
            "tilesets": [{
                "uid": 7,
                "identifier": "Terrain",
                "__cWid": 2,
                "__cHei": 2,
                "tileGridSize": 8,
                "enumTags": [{ "enumValueId": "Solid", "tileIds": [1] }],
                "customData": [
                    { "tileId": 1, "data": "collider: FULL" },
                    { "tileId": 3, "data": "collider: CIRCLE 4 4 2\nkind: lava" }
                ]
            }]
        },
        "levels": [{
            "identifier": "Level_0",
            "pxWid": 24,
            "pxHei": 16,
            "fieldInstances": [{ "__identifier": "music", "__value": "cave" }],
            "layerInstances": [
                {
                    "__type": "Tiles",
                    "__identifier": "Top",
                    "__cWid": 3,
                    "__cHei": 2,
                    "__gridSize": 8,
                    "__tilesetDefUid": 7,
                    "gridTiles": [{ "t": 3, "f": 1, "px": [8, 0], "src": [8, 8] }]
                },
                {
                    "__type": "Entities",
                    "__identifier": "Things",
                    "__cWid": 3,
                    "__cHei": 2,
                    "__gridSize": 8
                },
                {
                    "__type": "AutoLayer",
                    "__identifier": "Ground",
                    "__cWid": 3,
                    "__cHei": 2,
                    "__gridSize": 8,
                    "__tilesetDefUid": 7,
                    "autoLayerTiles": [
                        { "t": 1, "px": [0, 8], "src": [8, 0] },
                        { "t": 0, "f": 2, "px": [0, 8], "src": [0, 0] },
                        { "t": 0, "px": [64, 64], "src": [0, 0] }
                    ]
                }
            ]
        }]
    }"#;

    #[test]
    fn test_layers_in_paint_order() {
        let loader = WorldLoader::from_json(PROJECT, &Regions, classify).unwrap();
        assert_eq!(loader.tilesets().len(), 1);

        let layers = loader.load_level("Level_0").unwrap();
        let names: Vec<_> = layers.iter().map(|l| l.identifier.as_str()).collect();
        assert_eq!(names, vec!["Ground", "Top"]);
    }

    #[test]
    fn test_tiles_in_same_cell_stack_in_file_order() {
        let loader = WorldLoader::from_json(PROJECT, &Regions, classify).unwrap();
        let layers = loader.load_level("Level_0").unwrap();
        let ground = &layers[0];

        assert_eq!(ground.grid().occupied(), 1);
        let stack = ground.get_tile((0, 1)).unwrap();
        let ids: Vec<_> = stack.elements().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(stack.flip(), Flip::NONE);

        let collider = ground.grid().collider_at((0, 1)).unwrap();
        let solid = collider.single().unwrap();
        assert_eq!(solid.shape, ColliderSpec::full(8.0));
        assert!(solid.has_tag(1));
    }

    #[test]
    fn test_flip_and_collider_from_custom_data() {
        let loader = WorldLoader::from_json(PROJECT, &Regions, classify).unwrap();
        let top = &loader.load_level("Level_0").unwrap()[1];

        let cell = top.grid().render_at((1, 0)).unwrap();
        assert_eq!(cell.flip, Flip::new(true, false));
        assert_eq!(cell.sprite, Merged::Single(PixelRect::new(8, 8, 8, 8)));

        let stack = top.get_tile((1, 0)).unwrap();
        assert_eq!(stack.top().unwrap().attribute("kind"), "lava");
        assert!(stack.top().unwrap().classification_tags().is_empty());
        assert!(matches!(
            top.grid().collider_at((1, 0)).unwrap().single().map(|c| &c.shape),
            Some(ColliderSpec::Circle { .. })
        ));
    }

    #[test]
    fn test_unknown_level() {
        let loader = WorldLoader::from_json(PROJECT, &Regions, classify).unwrap();
        assert!(matches!(
            loader.load_level("Level_9"),
            Err(LoadError::UnknownLevel(name)) if name == "Level_9"
        ));
        assert_eq!(loader.level_fields("Level_9").string("music"), "");
        assert_eq!(loader.level_fields("Level_0").string("music"), "cave");
        assert_eq!(loader.level_names().collect::<Vec<_>>(), vec!["Level_0"]);
    }

    #[test]
    fn test_unknown_tileset_is_an_error() {
        let registry = TilesetRegistry::<PixelRect>::new();
        let layer: LayerSource = serde_json::from_str(
            r#"{ "__type": "Tiles", "__cWid": 1, "__cHei": 1, "__gridSize": 8, "__tilesetDefUid": 3 }"#,
        )
        .unwrap();
        assert!(matches!(
            registry.build_layer(&layer),
            Err(LoadError::UnknownTileset(3))
        ));
    }

    #[test]
    fn test_layer_without_tileset_is_skipped() {
        let registry = TilesetRegistry::<PixelRect>::new();
        let layer: LayerSource = serde_json::from_str(
            r#"{ "__type": "IntGrid", "__identifier": "Walls", "__cWid": 1, "__cHei": 1, "__gridSize": 8 }"#,
        )
        .unwrap();
        assert!(registry.build_layer(&layer).unwrap().is_none());
    }

    #[test]
    fn test_separate_level_file() {
        let loader = WorldLoader::from_json(PROJECT, &Regions, classify).unwrap();
        let header = load_level_from_str(r#"{ "identifier": "Level_1" }"#).unwrap();
        assert!(loader.load_layers(&header).unwrap().is_empty());

        assert!(matches!(
            load_level_from_bytes(b"{ not json"),
            Err(LoadError::Json(_))
        ));
    }
}
