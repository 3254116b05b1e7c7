//! Collision data structures for tiles
//!
//! This module provides the collider types produced by the custom-data parser:
//! - `ColliderSpec` - Shape geometry (Rectangle, Circle, Polygon) in tile pixels
//! - `TileCollider` - A shape plus the collision classification tags it carries
//! - `Bounds` - Axis-aligned bounding box used to aggregate stacked colliders

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Axis-aligned bounding box in tile-local pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Bounds {
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing both `self` and `other`
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }
}

/// Collider geometry declared for a tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ColliderSpec {
    /// Rectangle anchored at its top-left corner
    Rectangle { x: f32, y: f32, w: f32, h: f32 },
    /// Circle around a center point
    Circle { x: f32, y: f32, r: f32 },
    /// Polygon with vertices in authored order. Convexity is not checked.
    Polygon { vertices: Vec<[f32; 2]> },
}

impl ColliderSpec {
    /// Create a rectangle shape
    pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Self {
        ColliderSpec::Rectangle { x, y, w, h }
    }

    /// Create a circle shape
    pub fn circle(x: f32, y: f32, r: f32) -> Self {
        ColliderSpec::Circle { x, y, r }
    }

    /// Create a polygon shape from vertices
    pub fn polygon(vertices: Vec<[f32; 2]>) -> Self {
        ColliderSpec::Polygon { vertices }
    }

    /// Rectangle covering a whole tile
    pub fn full(tile_size: f32) -> Self {
        ColliderSpec::rectangle(0.0, 0.0, tile_size, tile_size)
    }

    /// Get the display name of this shape type
    pub fn name(&self) -> &'static str {
        match self {
            ColliderSpec::Rectangle { .. } => "Rectangle",
            ColliderSpec::Circle { .. } => "Circle",
            ColliderSpec::Polygon { .. } => "Polygon",
        }
    }

    /// Bounding box of the shape. An empty polygon has a zero-sized box at the origin.
    pub fn bounds(&self) -> Bounds {
        match self {
            ColliderSpec::Rectangle { x, y, w, h } => Bounds::new([*x, *y], [x + w, y + h]),
            ColliderSpec::Circle { x, y, r } => Bounds::new([x - r, y - r], [x + r, y + r]),
            ColliderSpec::Polygon { vertices } => {
                let Some(first) = vertices.first() else {
                    return Bounds::new([0.0, 0.0], [0.0, 0.0]);
                };
                vertices.iter().fold(Bounds::new(*first, *first), |acc, v| {
                    acc.union(&Bounds::new(*v, *v))
                })
            }
        }
    }
}

/// A collider shape with its collision classification tags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileCollider {
    pub shape: ColliderSpec,
    /// Classifications resolved from the tile's enum tags
    #[serde(default)]
    pub tags: BTreeSet<i32>,
}

impl TileCollider {
    pub fn new(shape: ColliderSpec) -> Self {
        Self {
            shape,
            tags: BTreeSet::new(),
        }
    }

    /// Set the classification tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = i32>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds()
    }

    pub fn has_tag(&self, tag: i32) -> bool {
        self.tags.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_covers_tile() {
        let shape = ColliderSpec::full(16.0);
        assert_eq!(shape, ColliderSpec::rectangle(0.0, 0.0, 16.0, 16.0));
        assert_eq!(shape.bounds(), Bounds::new([0.0, 0.0], [16.0, 16.0]));
    }

    #[test]
    fn test_circle_bounds() {
        let bounds = ColliderSpec::circle(4.0, 4.0, 2.0).bounds();
        assert_eq!(bounds, Bounds::new([2.0, 2.0], [6.0, 6.0]));
        assert_eq!(bounds.width(), 4.0);
    }

    #[test]
    fn test_polygon_bounds_any_winding() {
        let concave = ColliderSpec::polygon(vec![[0.0, 0.0], [8.0, 4.0], [16.0, 0.0], [8.0, 16.0]]);
        assert_eq!(concave.bounds(), Bounds::new([0.0, 0.0], [16.0, 16.0]));

        let empty = ColliderSpec::polygon(Vec::new());
        assert_eq!(empty.bounds().width(), 0.0);
    }

    #[test]
    fn test_collider_tags() {
        let collider = TileCollider::new(ColliderSpec::full(8.0)).with_tags([3, 1, 3]);
        assert_eq!(collider.tags.len(), 2);
        assert!(collider.has_tag(1));
        assert!(!collider.has_tag(2));
    }
}
