//! Zero/one/many collapse for stacked sprites and colliders
//!
//! A tile stack exposes a single merged sprite and a single merged collider.
//! With no members the merged value is `Empty`, with one it is that member
//! itself, and only with two or more is it a `Composite`. A composite of one
//! is never constructed, so callers cannot tell a single element apart from
//! a stack that happens to hold one.

use crate::Flip;
use ldtk_tiles_core::{Bounds, TileCollider};
use std::collections::BTreeSet;

/// Merged view over the members of a tile stack
#[derive(Debug, Clone, PartialEq)]
pub enum Merged<T> {
    Empty,
    Single(T),
    /// Two or more members, bottom to top
    Composite(Vec<T>),
}

impl<T> Default for Merged<T> {
    fn default() -> Self {
        Merged::Empty
    }
}

impl<T> Merged<T> {
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Merged::Empty)
    }

    /// Members in paint order (bottom first)
    pub fn as_slice(&self) -> &[T] {
        match self {
            Merged::Empty => &[],
            Merged::Single(item) => std::slice::from_ref(item),
            Merged::Composite(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The member if there is exactly one
    pub fn single(&self) -> Option<&T> {
        match self {
            Merged::Single(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Merged::Composite(_))
    }
}

impl<T> FromIterator<T> for Merged<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        match items.len() {
            0 => Merged::Empty,
            1 => items.pop().map_or(Merged::Empty, Merged::Single),
            _ => Merged::Composite(items),
        }
    }
}

impl<'a, T> IntoIterator for &'a Merged<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Merged<TileCollider> {
    /// Union of all member bounds, `None` when empty
    pub fn bounds(&self) -> Option<Bounds> {
        self.iter()
            .map(TileCollider::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Union of all member classification tags
    pub fn tags(&self) -> BTreeSet<i32> {
        self.iter().flat_map(|c| c.tags.iter().copied()).collect()
    }

    pub fn has_tag(&self, tag: i32) -> bool {
        self.iter().any(|c| c.has_tag(tag))
    }
}

/// What the renderer paints for one grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCell<S> {
    pub sprite: Merged<S>,
    /// Applied to the merged sprite as a whole
    pub flip: Flip,
}

impl<S> Default for RenderCell<S> {
    fn default() -> Self {
        Self {
            sprite: Merged::Empty,
            flip: Flip::NONE,
        }
    }
}

impl<S> RenderCell<S> {
    pub fn is_empty(&self) -> bool {
        self.sprite.is_empty()
    }
}
