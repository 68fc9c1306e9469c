//! Ordered collection of PDFs shown as a thumbnail grid
//!
//! The board owns the merge order: a plain `Vec` of items, first to last.
//! The grid the user sees is a projection of that vector. Item `i` sits in
//! cell `(i / columns, i % columns)` and the "add" placeholder always takes
//! the cell right after the last item. Insert, remove and swap only touch the
//! vector, so there are no stored coordinates to re-flow or go stale.
//!
//! Items are identified by an [`ItemId`] handed out at creation. A drag
//! carries that id, and the drop looks the item up by it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::thumbnail::{PageRenderer, Thumbnail};

/// Stable identifier of a board item, unique for the lifetime of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One selected PDF
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub path: PathBuf,
    pub preview: Thumbnail,
}

/// Grid cell, counted from the top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Pointer position relative to the grid's top-left corner, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel rectangle of a cell relative to the grid origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fixed-width grid dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_width: 120.0,
            cell_height: 140.0,
        }
    }
}

/// What occupies a cell in the projected grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Item { id: ItemId, cell: Cell },
    Placeholder { cell: Cell },
}

impl Slot {
    pub fn cell(&self) -> Cell {
        match self {
            Slot::Item { cell, .. } | Slot::Placeholder { cell } => *cell,
        }
    }
}

/// Highlight to draw while something is dragged over the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropHint {
    pub cell: Cell,
    /// `false` when the cell is the placeholder or an empty cell past it
    pub accepted: bool,
}

/// Result of releasing a dragged item over the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The items at `from` and `to` traded places
    Swapped { from: usize, to: usize },
    /// Dropped back onto its own cell
    Unchanged,
    /// Placeholder cell, a cell past it, outside the grid, or an unknown item
    Rejected,
}

/// The ordered collection behind the thumbnail grid
#[derive(Debug, Clone)]
pub struct Board {
    geometry: GridGeometry,
    items: Vec<Item>,
    next_id: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GridGeometry::default())
    }
}

impl Board {
    pub fn new(mut geometry: GridGeometry) -> Self {
        geometry.columns = geometry.columns.max(1);
        Self {
            geometry,
            items: Vec::new(),
            next_id: 0,
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Render the first page of `path` and append it before the placeholder
    pub fn add_item(&mut self, path: &Path, renderer: &dyn PageRenderer) -> Result<ItemId> {
        let preview = renderer.render_first_page(path)?;
        Ok(self.insert(path.to_path_buf(), preview))
    }

    /// Add several files in order, skipping any whose preview cannot be rendered
    ///
    /// Skipped files are only logged.
    pub fn add_items<I, P>(&mut self, paths: I, renderer: &dyn PageRenderer) -> Vec<ItemId>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.add_item(path, renderer) {
                Ok(id) => added.push(id),
                Err(e) => log::warn!("Error generating thumbnail for {}: {}", path.display(), e),
            }
        }
        added
    }

    /// Append an already rendered item before the placeholder
    pub fn insert(&mut self, path: PathBuf, preview: Thumbnail) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        log::debug!("Adding {} as {} at index {}", path.display(), id, self.items.len());
        self.items.push(Item { id, path, preview });
        id
    }

    /// Detach an item; the rest keep their relative order
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.index_of(id)?;
        log::debug!("Removing {} from index {}", id, index);
        Some(self.items.remove(index))
    }

    /// Remove every item, leaving the placeholder alone at index 0
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Source paths in merge order
    pub fn ordered_paths(&self) -> Vec<PathBuf> {
        self.items.iter().map(|item| item.path.clone()).collect()
    }

    /// Linear index of the placeholder, always the item count
    pub fn placeholder_index(&self) -> usize {
        self.items.len()
    }

    pub fn placeholder_cell(&self) -> Cell {
        self.cell_of(self.placeholder_index())
    }

    pub fn cell_of(&self, index: usize) -> Cell {
        Cell {
            row: index / self.geometry.columns,
            col: index % self.geometry.columns,
        }
    }

    /// Linear index of a cell, `None` when it does not fit in a `usize`
    pub fn index_of_cell(&self, cell: Cell) -> Option<usize> {
        cell.row
            .checked_mul(self.geometry.columns)?
            .checked_add(cell.col)
    }

    /// Rows needed to show every item plus the placeholder
    pub fn rows(&self) -> usize {
        self.placeholder_cell().row + 1
    }

    /// Cell under a pointer position, if it falls inside the grid's columns
    pub fn cell_at(&self, pos: Point) -> Option<Cell> {
        if !(pos.x >= 0.0 && pos.y >= 0.0) {
            return None;
        }
        let col = (pos.x / self.geometry.cell_width).floor() as usize;
        let row = (pos.y / self.geometry.cell_height).floor() as usize;
        if col >= self.geometry.columns {
            return None;
        }
        Some(Cell { row, col })
    }

    pub fn cell_rect(&self, cell: Cell) -> CellRect {
        CellRect {
            x: cell.col as f32 * self.geometry.cell_width,
            y: cell.row as f32 * self.geometry.cell_height,
            width: self.geometry.cell_width,
            height: self.geometry.cell_height,
        }
    }

    /// Target cell under the pointer while dragging, and whether it takes a drop
    pub fn drag_over(&self, pos: Point) -> Option<DropHint> {
        let cell = self.cell_at(pos)?;
        Some(DropHint {
            cell,
            accepted: self
                .index_of_cell(cell)
                .is_some_and(|index| index < self.placeholder_index()),
        })
    }

    /// Drop the dragged item `id` at `pos`, swapping it with the target cell's item
    pub fn drop_item(&mut self, id: ItemId, pos: Point) -> DropOutcome {
        let Some(from) = self.index_of(id) else {
            log::debug!("Drop of unknown item {}", id);
            return DropOutcome::Rejected;
        };
        let Some(hint) = self.drag_over(pos) else {
            return DropOutcome::Rejected;
        };
        if !hint.accepted {
            log::debug!("Drop of {} on {:?} rejected", id, hint.cell);
            return DropOutcome::Rejected;
        }

        let Some(to) = self.index_of_cell(hint.cell) else {
            return DropOutcome::Rejected;
        };
        if from == to {
            return DropOutcome::Unchanged;
        }
        self.items.swap(from, to);
        log::debug!("Swapped index {} with {}", from, to);
        DropOutcome::Swapped { from, to }
    }

    /// Every occupied cell, items in order then the placeholder
    pub fn layout(&self) -> Vec<Slot> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| Slot::Item {
                id: item.id,
                cell: self.cell_of(index),
            })
            .chain(std::iter::once(Slot::Placeholder {
                cell: self.placeholder_cell(),
            }))
            .collect()
    }
}
