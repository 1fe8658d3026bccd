//! Grid bounds and per-tick occupancy
//!
//! The occupied and obstacle sets are rebuilt from scratch every tick by the
//! entities that draw themselves; nothing in them survives a `reset`.

use std::collections::HashSet;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{GameError, Result};

/// Authoritative bounds/occupancy/obstacle tracker for one frame
#[derive(Debug, Clone)]
pub struct GridSurface {
    width: i32,
    height: i32,
    /// Cells drawn this tick
    occupied: HashSet<IVec2>,
    /// Cells drawn this tick that block obstacle-avoiding movement
    obstacles: HashSet<IVec2>,
    rng: Pcg32,
}

impl GridSurface {
    /// Create an empty grid with a seeded placement RNG
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self {
            width,
            height,
            occupied: HashSet::new(),
            obstacles: HashSet::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Forget everything drawn last tick
    pub fn reset(&mut self) {
        self.occupied.clear();
        self.obstacles.clear();
    }

    /// Record that `cell` was drawn this tick.
    ///
    /// Bounds are the caller's responsibility.
    pub fn mark(&mut self, cell: IVec2, obstacle: bool) {
        self.occupied.insert(cell);
        if obstacle {
            self.obstacles.insert(cell);
        }
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn is_obstacle(&self, cell: IVec2) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Whether a mover may end up on `cell`
    pub fn is_passable(&self, cell: IVec2, avoid_obstacles: bool) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        !(avoid_obstacles && self.obstacles.contains(&cell))
    }

    pub fn is_blocked(&self, cell: IVec2, avoid_obstacles: bool) -> bool {
        !self.is_passable(cell, avoid_obstacles)
    }

    /// Draw a seed for the next board from this board's RNG
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Pick a uniformly random unoccupied cell.
    ///
    /// Pinning both coordinates returns that exact cell with no freeness check.
    /// Pinning one restricts the choice to that column or row. Free cells are
    /// enumerated before choosing, so a full line yields `NoFreeCell` instead of
    /// spinning forever.
    pub fn random_free_cell(&mut self, fixed_x: Option<i32>, fixed_y: Option<i32>) -> Result<IVec2> {
        if let (Some(x), Some(y)) = (fixed_x, fixed_y) {
            return Ok(IVec2::new(x, y));
        }

        let xs = match fixed_x {
            Some(x) => x..x + 1,
            None => 0..self.width,
        };
        let candidates: Vec<IVec2> = xs
            .flat_map(|x| {
                let ys = match fixed_y {
                    Some(y) => y..y + 1,
                    None => 0..self.height,
                };
                ys.map(move |y| IVec2::new(x, y))
            })
            .filter(|cell| self.in_bounds(*cell) && !self.occupied.contains(cell))
            .collect();

        if candidates.is_empty() {
            log::warn!(
                "No free cell (column {:?}, row {:?}, {} occupied)",
                fixed_x,
                fixed_y,
                self.occupied.len()
            );
            return Err(GameError::NoFreeCell);
        }

        let index = self.rng.random_range(0..candidates.len());
        Ok(candidates[index])
    }
}
