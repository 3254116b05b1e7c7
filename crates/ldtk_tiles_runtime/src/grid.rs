//! Fixed-size grid of tile stacks with collision and render projections
//!
//! The stack grid is authoritative. After every mutation the touched cell of
//! both projections is re-derived from the stack that now occupies it, so a
//! projection read always matches the stacks. Reads and writes outside the
//! grid are ignored.

use crate::{Flip, Merged, RenderCell, TileStack};
use bevy::log::warn;
use ldtk_tiles_core::{TileCollider, TileDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cell coordinate in a tile grid. Negative values are valid inputs and are
/// simply outside every grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for GridCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// Read-only per-cell view derived from a tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Default> Projection<T> {
    fn new(width: u32, height: u32, len: usize) -> Self {
        Self {
            width,
            height,
            cells: std::iter::repeat_with(T::default).take(len).collect(),
        }
    }
}

impl<T> Projection<T> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell value, `None` outside the grid
    pub fn get(&self, coord: impl Into<GridCoord>) -> Option<&T> {
        let index = cell_index(self.width, self.height, coord.into())?;
        self.cells.get(index)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let coord = GridCoord::new((i % width) as i32, (i / width) as i32);
            (coord, cell)
        })
    }
}

fn cell_index(width: u32, height: u32, coord: GridCoord) -> Option<usize> {
    let x = u32::try_from(coord.x).ok()?;
    let y = u32::try_from(coord.y).ok()?;
    if x >= width || y >= height {
        return None;
    }
    (y as usize)
        .checked_mul(width as usize)?
        .checked_add(x as usize)
}

/// Number of cells, `None` when it does not fit a `u32`
fn cell_count(width: u32, height: u32) -> Option<usize> {
    width.checked_mul(height).map(|n| n as usize)
}

/// Grid of tile stacks. Each cell is either absent or holds a non-empty stack.
#[derive(Debug, Clone)]
pub struct TileGrid<S> {
    width: u32,
    height: u32,
    cells: Vec<Option<TileStack<S>>>,
    collision: Projection<Merged<TileCollider>>,
    render: Projection<RenderCell<S>>,
}

impl<S: Clone> TileGrid<S> {
    /// Empty grid. A size whose cell count overflows yields a 0x0 grid.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height, len) = match cell_count(width, height) {
            Some(len) => (width, height, len),
            None => {
                warn!("Tile grid of {}x{} cells is too large, using an empty grid", width, height);
                (0, 0, 0)
            }
        };
        Self {
            width,
            height,
            cells: std::iter::repeat_with(|| None).take(len).collect(),
            collision: Projection::new(width, height, len),
            render: Projection::new(width, height, len),
        }
    }

    /// Overwrite a cell. `None` or an empty stack makes the cell absent.
    /// Returns `false` if the coordinate is outside the grid.
    pub fn set(&mut self, coord: impl Into<GridCoord>, stack: Option<TileStack<S>>) -> bool {
        let Some(index) = self.index(coord.into()) else {
            return false;
        };
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        *cell = stack.filter(|s| !s.is_empty());
        self.refresh(index);
        true
    }

    /// Replace a cell with a single-element stack of `definition`
    pub fn set_tile(
        &mut self,
        coord: impl Into<GridCoord>,
        definition: Arc<TileDefinition<S>>,
        flip: Flip,
    ) -> bool {
        self.set(coord, Some(TileStack::from_definitions([definition], flip)))
    }

    /// Push `definition` onto the cell's stack, creating the stack if the cell is absent
    pub fn stack_add(
        &mut self,
        coord: impl Into<GridCoord>,
        definition: Arc<TileDefinition<S>>,
    ) -> bool {
        let Some(index) = self.index(coord.into()) else {
            return false;
        };
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        cell.get_or_insert_with(TileStack::new).add(definition);
        self.refresh(index);
        true
    }

    /// Remove the top element of the cell's stack. The cell becomes absent
    /// when its last element is removed.
    pub fn stack_remove_top(&mut self, coord: impl Into<GridCoord>) -> bool {
        self.remove_with(coord.into(), TileStack::remove_top)
    }

    /// Remove the element at `index` from the cell's stack
    pub fn stack_remove_at(&mut self, coord: impl Into<GridCoord>, index: usize) -> bool {
        self.remove_with(coord.into(), |stack| stack.remove_at(index))
    }

    /// Make the cell absent. Returns `false` if outside the grid.
    pub fn clear(&mut self, coord: impl Into<GridCoord>) -> bool {
        self.set(coord, None)
    }

    /// Change the flip of an occupied cell
    pub fn set_flip(&mut self, coord: impl Into<GridCoord>, flip: Flip) -> bool {
        let Some(index) = self.index(coord.into()) else {
            return false;
        };
        let Some(stack) = self.cells.get_mut(index).and_then(Option::as_mut) else {
            return false;
        };
        stack.set_flip(flip);
        self.refresh(index);
        true
    }

    fn remove_with(
        &mut self,
        coord: GridCoord,
        remove: impl FnOnce(&mut TileStack<S>) -> bool,
    ) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        let Some(stack) = self.cells.get_mut(index).and_then(Option::as_mut) else {
            return false;
        };
        if !remove(stack) {
            return false;
        }
        if stack.is_empty() {
            self.cells[index] = None;
        }
        self.refresh(index);
        true
    }

    /// Re-derive both projections for one cell from its stack
    fn refresh(&mut self, index: usize) {
        let (collider, render) = match self.cells.get(index) {
            Some(Some(stack)) => (stack.collider().clone(), stack.render_cell()),
            _ => (Merged::Empty, RenderCell::default()),
        };
        if let Some(cell) = self.collision.cells.get_mut(index) {
            *cell = collider;
        }
        if let Some(cell) = self.render.cells.get_mut(index) {
            *cell = render;
        }
    }
}

impl<S> TileGrid<S> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, coord: impl Into<GridCoord>) -> bool {
        self.index(coord.into()).is_some()
    }

    /// Stack at a cell, `None` if absent or outside the grid
    pub fn get(&self, coord: impl Into<GridCoord>) -> Option<&TileStack<S>> {
        self.cells.get(self.index(coord.into())?)?.as_ref()
    }

    /// Occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &TileStack<S>)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let coord = GridCoord::new((i % width) as i32, (i / width) as i32);
            cell.as_ref().map(|stack| (coord, stack))
        })
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Merged collider of every cell. Valid until the next mutation.
    pub fn collision(&self) -> &Projection<Merged<TileCollider>> {
        &self.collision
    }

    /// Merged sprite and flip of every cell. Valid until the next mutation.
    pub fn render(&self) -> &Projection<RenderCell<S>> {
        &self.render
    }

    pub fn collider_at(&self, coord: impl Into<GridCoord>) -> Option<&Merged<TileCollider>> {
        self.collision.get(coord)
    }

    pub fn render_at(&self, coord: impl Into<GridCoord>) -> Option<&RenderCell<S>> {
        self.render.get(coord)
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        cell_index(self.width, self.height, coord)
    }
}
