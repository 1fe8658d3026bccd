//! Stationary items placed on the grid

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::GridSurface;
use crate::error::{GameError, Result};

/// What an item set represents in the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Collectible
    Shell,
    /// Blocks obstacle-avoiding movement
    Rock,
    /// Freezes whoever steps in it
    Lava,
    /// Maui's transport item
    Hook,
    /// Moana's transport item
    Boat,
    /// Win item, revealed once every shell is gone
    Heart,
    /// Empties the carrier's load
    Depot,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Shell => "shell",
            ItemKind::Rock => "rock",
            ItemKind::Lava => "lava",
            ItemKind::Hook => "hook",
            ItemKind::Boat => "boat",
            ItemKind::Heart => "heart",
            ItemKind::Depot => "depot",
        }
    }
}

/// A collection of fungible items sharing one image and one obstacle flag.
///
/// Cells are unique within a set and kept in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSet {
    pub kind: ItemKind,
    pub image: String,
    pub obstacle: bool,
    cells: Vec<IVec2>,
}

impl ItemSet {
    pub fn new(kind: ItemKind, image: impl Into<String>, obstacle: bool) -> Self {
        Self {
            kind,
            image: image.into(),
            obstacle,
            cells: Vec::new(),
        }
    }

    /// Add an item at `cell`; out-of-bounds cells are ignored
    pub fn place_at(&mut self, grid: &GridSurface, cell: IVec2) {
        if grid.in_bounds(cell) && !self.cells.contains(&cell) {
            self.cells.push(cell);
        }
    }

    pub fn count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn has(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn cells(&self) -> &[IVec2] {
        &self.cells
    }

    /// Remove the item at `cell`. Callers check `has` first.
    pub fn remove(&mut self, cell: IVec2) -> Result<()> {
        let index = self
            .cells
            .iter()
            .position(|c| *c == cell)
            .ok_or(GameError::NotFound(cell))?;
        self.cells.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Place `count` items on free cells, then mark them occupied so later
    /// placements this tick avoid them
    pub fn place_randomly(&mut self, grid: &mut GridSurface, count: usize) -> Result<()> {
        let mut remaining = count;
        while remaining > 0 {
            let cell = grid.random_free_cell(None, None)?;
            if self.cells.contains(&cell) {
                // Already ours; try again
                continue;
            }
            self.place_at(grid, cell);
            grid.mark(cell, self.obstacle);
            remaining -= 1;
        }
        self.draw(grid);
        Ok(())
    }

    /// Register every item's cell with this tick's occupancy
    pub fn draw(&self, grid: &mut GridSurface) {
        for cell in &self.cells {
            grid.mark(*cell, self.obstacle);
        }
    }
}
