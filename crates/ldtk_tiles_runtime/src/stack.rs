//! Ordered stack of tile elements occupying one grid cell

use crate::{Merged, RenderCell, TileElement};
use ldtk_tiles_core::{TileCollider, TileDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sprite flip, stored by the editor as X on bit 0 and Y on bit 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
}

impl Flip {
    pub const NONE: Flip = Flip { x: false, y: false };

    pub fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }

    /// Decode editor flip bits. Bits above the second are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            x: bits & 0b01 != 0,
            y: bits & 0b10 != 0,
        }
    }

    pub fn bits(&self) -> u8 {
        (self.x as u8) | ((self.y as u8) << 1)
    }
}

/// Tile elements painted bottom to top in insertion order.
///
/// The merged sprite and collider are recomputed after every change to the
/// element list, so they always reflect the current elements.
#[derive(Debug, Clone, PartialEq)]
pub struct TileStack<S> {
    elements: Vec<TileElement<S>>,
    flip: Flip,
    sprite: Merged<S>,
    collider: Merged<TileCollider>,
}

impl<S: Clone> TileStack<S> {
    pub fn new() -> Self {
        Self::with_flip(Flip::NONE)
    }

    pub fn with_flip(flip: Flip) -> Self {
        Self {
            elements: Vec::new(),
            flip,
            sprite: Merged::Empty,
            collider: Merged::Empty,
        }
    }

    /// Stack built from definitions, first one at the bottom
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = Arc<TileDefinition<S>>>,
        flip: Flip,
    ) -> Self {
        let mut stack = Self::with_flip(flip);
        stack.elements = definitions.into_iter().map(TileElement::new).collect();
        stack.refresh();
        stack
    }

    /// Push a new element on top of the stack
    pub fn add(&mut self, definition: Arc<TileDefinition<S>>) {
        self.elements.push(TileElement::new(definition));
        self.refresh();
    }

    /// Remove the top element. Returns `false` if the stack was already empty.
    pub fn remove_top(&mut self) -> bool {
        if self.elements.pop().is_none() {
            return false;
        }
        self.refresh();
        true
    }

    /// Remove the element at `index`. Returns `false` if out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.elements.len() {
            return false;
        }
        self.elements.remove(index);
        self.refresh();
        true
    }

    /// Render view of the merged sprite with this stack's flip
    pub fn render_cell(&self) -> RenderCell<S> {
        RenderCell {
            sprite: self.sprite.clone(),
            flip: self.flip,
        }
    }

    fn refresh(&mut self) {
        self.sprite = self.elements.iter().map(|e| e.sprite().clone()).collect();
        self.collider = self
            .elements
            .iter()
            .filter_map(|e| e.collider().cloned())
            .collect();
    }
}

impl<S> TileStack<S> {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, index: usize) -> Option<&TileElement<S>> {
        self.elements.get(index)
    }

    pub fn elements(&self) -> &[TileElement<S>] {
        &self.elements
    }

    /// Topmost element
    pub fn top(&self) -> Option<&TileElement<S>> {
        self.elements.last()
    }

    pub fn flip(&self) -> Flip {
        self.flip
    }

    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    /// Merged sprite: nothing, the single element's sprite, or all sprites bottom to top
    pub fn sprite(&self) -> &Merged<S> {
        &self.sprite
    }

    /// Merged collider over the elements that have one
    pub fn collider(&self) -> &Merged<TileCollider> {
        &self.collider
    }
}
