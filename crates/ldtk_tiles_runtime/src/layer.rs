//! Tile layer: a tile grid bound to one tileset

use crate::{Flip, GridCoord, TileGrid, TileStack};
use ldtk_tiles_core::TilesetCatalog;
use std::sync::Arc;

/// A grid of tile stacks whose tiles all come from one shared tileset.
///
/// Tiles are addressed by their tileset grid coordinate, or by pixel
/// positions for the `_local` variants. Unknown tileset coordinates are
/// ignored.
#[derive(Debug, Clone)]
pub struct TileLayer<S> {
    pub identifier: String,
    pub visible: bool,
    /// Pixel offset of the layer relative to its level
    pub offset: [i64; 2],
    tile_size: u32,
    tileset: Arc<TilesetCatalog<S>>,
    grid: TileGrid<S>,
}

impl<S: Clone> TileLayer<S> {
    pub fn new(
        identifier: impl Into<String>,
        tileset: Arc<TilesetCatalog<S>>,
        grid_size: [u32; 2],
        tile_size: u32,
        offset: [i64; 2],
    ) -> Self {
        Self {
            identifier: identifier.into(),
            visible: true,
            offset,
            tile_size,
            tileset,
            grid: TileGrid::new(grid_size[0], grid_size[1]),
        }
    }

    /// Replace the cell with a single tile
    pub fn set_tile(&mut self, tileset_coord: [u32; 2], grid_coord: impl Into<GridCoord>) -> bool {
        let Some(definition) = self.tileset.get_at(tileset_coord[0], tileset_coord[1]) else {
            return false;
        };
        self.grid
            .set_tile(grid_coord, definition.clone(), Flip::NONE)
    }

    /// Stack a tile on top of whatever occupies the cell
    pub fn add_tile_stack(
        &mut self,
        tileset_coord: [u32; 2],
        grid_coord: impl Into<GridCoord>,
    ) -> bool {
        let Some(definition) = self.tileset.get_at(tileset_coord[0], tileset_coord[1]) else {
            return false;
        };
        self.grid.stack_add(grid_coord, definition.clone())
    }

    /// Stack a tile using pixel positions in the tileset texture and in the layer.
    ///
    /// `flip` is applied when this tile creates the cell's stack; tiles stacked
    /// on an existing cell keep that stack's flip.
    pub fn add_tile_stack_local(&mut self, source_px: [f32; 2], layer_px: [f32; 2], flip: Flip) -> bool {
        let Some(definition) = self.tileset.get_local(source_px[0], source_px[1]) else {
            return false;
        };
        let Some(coord) = self.grid_coord_local(layer_px) else {
            return false;
        };
        let created = self.grid.get(coord).is_none();
        if !self.grid.stack_add(coord, definition.clone()) {
            return false;
        }
        if created && flip != Flip::NONE {
            self.grid.set_flip(coord, flip);
        }
        true
    }

    /// Remove the top tile of a cell's stack
    pub fn remove_tile_stack(&mut self, grid_coord: impl Into<GridCoord>) -> bool {
        self.grid.stack_remove_top(grid_coord)
    }

    /// Reset a cell to empty
    pub fn clear_tile(&mut self, grid_coord: impl Into<GridCoord>) -> bool {
        self.grid.clear(grid_coord)
    }
}

impl<S> TileLayer<S> {
    pub fn get_tile(&self, grid_coord: impl Into<GridCoord>) -> Option<&TileStack<S>> {
        self.grid.get(grid_coord)
    }

    pub fn grid(&self) -> &TileGrid<S> {
        &self.grid
    }

    pub fn tileset(&self) -> &Arc<TilesetCatalog<S>> {
        &self.tileset
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Width and height of the grid in tiles
    pub fn grid_size(&self) -> [u32; 2] {
        [self.grid.width(), self.grid.height()]
    }

    /// Width and height covered by the layer in pixels, saturating at `u32::MAX`
    pub fn size_px(&self) -> [u32; 2] {
        [
            self.grid.width().saturating_mul(self.tile_size),
            self.grid.height().saturating_mul(self.tile_size),
        ]
    }

    /// Grid cell under a pixel position in the layer. `None` for
    /// non-finite positions.
    pub fn grid_coord_local(&self, px: [f32; 2]) -> Option<GridCoord> {
        if !px[0].is_finite() || !px[1].is_finite() {
            return None;
        }
        let size = self.tile_size.max(1) as f32;
        Some(GridCoord::new(
            (px[0] / size).floor() as i32,
            (px[1] / size).floor() as i32,
        ))
    }
}
