//! Materialized tile element: one definition placed in a stack

use ldtk_tiles_core::{TileCollider, TileDefinition};
use std::collections::BTreeSet;
use std::sync::Arc;

static NO_TAGS: BTreeSet<i32> = BTreeSet::new();

/// A definition paired with its own render and collision handles.
///
/// Created when a definition is pushed onto a stack and dropped when it is
/// removed. The definition itself stays shared with the tileset catalog.
#[derive(Debug, Clone)]
pub struct TileElement<S> {
    definition: Arc<TileDefinition<S>>,
    sprite: S,
    collider: Option<TileCollider>,
}

impl<S: Clone> TileElement<S> {
    pub fn new(definition: Arc<TileDefinition<S>>) -> Self {
        Self {
            sprite: definition.sprite.clone(),
            collider: definition.collider.clone(),
            definition,
        }
    }
}

impl<S> TileElement<S> {
    pub fn definition(&self) -> &Arc<TileDefinition<S>> {
        &self.definition
    }

    /// Tile id in the owning tileset
    pub fn id(&self) -> u32 {
        self.definition.id
    }

    pub fn sprite(&self) -> &S {
        &self.sprite
    }

    pub fn collider(&self) -> Option<&TileCollider> {
        self.collider.as_ref()
    }

    /// Collision classifications, empty when the element has no collider
    pub fn classification_tags(&self) -> &BTreeSet<i32> {
        self.collider.as_ref().map_or(&NO_TAGS, |c| &c.tags)
    }

    /// Custom data value of the underlying definition, `""` if absent
    pub fn attribute(&self, key: &str) -> &str {
        self.definition.attribute(key)
    }
}

/// Elements are equal when they come from the same shared definition
impl<S: PartialEq> PartialEq for TileElement<S> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
            && self.sprite == other.sprite
            && self.collider == other.collider
    }
}
