//! Actors: player-driven movers and self-moving patrols
//!
//! A patrol is an ordinary actor carrying a `Patrol` policy; there is no
//! separate type for it.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::GridSurface;
use super::items::ItemKind;
use crate::error::{GameError, Result};

/// A single grid step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Axis a patrol moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Which way along its axis a patrol is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    /// Down or right
    Forward,
    /// Up or left
    Backward,
}

impl Heading {
    pub fn reversed(self) -> Self {
        match self {
            Heading::Forward => Heading::Backward,
            Heading::Backward => Heading::Forward,
        }
    }
}

/// Autonomous back-and-forth movement policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub axis: Axis,
    pub heading: Heading,
    /// Set once the game ends; never cleared
    pub stopped: bool,
    /// Game time (seconds) of the last attempted step
    pub last_move: f64,
    /// Seconds between steps
    pub interval: f64,
}

impl Patrol {
    pub fn new(axis: Axis, interval: f64, started_at: f64) -> Self {
        Self {
            axis,
            heading: Heading::Forward,
            stopped: false,
            last_move: started_at,
            interval,
        }
    }

    pub fn direction(&self) -> Direction {
        match (self.axis, self.heading) {
            (Axis::Vertical, Heading::Forward) => Direction::Down,
            (Axis::Vertical, Heading::Backward) => Direction::Up,
            (Axis::Horizontal, Heading::Forward) => Direction::Right,
            (Axis::Horizontal, Heading::Backward) => Direction::Left,
        }
    }
}

/// Which image an actor currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Default,
    /// Shown while holding a transport item
    Replacement,
    /// Overrides both others
    Frozen,
}

/// Image filenames for each visual state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorImages {
    pub default: String,
    pub replacement: Option<String>,
    pub frozen: Option<String>,
}

impl ActorImages {
    pub fn single(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            replacement: None,
            frozen: None,
        }
    }
}

/// A mover on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub pos: IVec2,
    pub frozen: bool,
    /// Collectibles carried since the last depot visit
    pub carrying: u32,
    pub capacity: u32,
    pub score: u32,
    /// Transport item currently held
    pub holding: Option<ItemKind>,
    pub images: ActorImages,
    pub patrol: Option<Patrol>,
    replacement_shown: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>, images: ActorImages, pos: IVec2, capacity: u32) -> Self {
        Self {
            name: name.into(),
            pos,
            frozen: false,
            carrying: 0,
            capacity: capacity.max(1),
            score: 0,
            holding: None,
            images,
            patrol: None,
            replacement_shown: false,
        }
    }

    /// An actor that moves itself along `axis`
    pub fn patrolling(
        name: impl Into<String>,
        images: ActorImages,
        pos: IVec2,
        patrol: Patrol,
    ) -> Self {
        let mut actor = Self::new(name, images, pos, 1);
        actor.patrol = Some(patrol);
        actor
    }

    /// Register this actor's cell; patrols block obstacle-avoiding movers
    pub fn draw(&self, grid: &mut GridSurface) {
        grid.mark(self.pos, self.patrol.is_some());
    }

    /// Try one step. Frozen actors and blocked destinations leave the
    /// position untouched and return false.
    pub fn step(&mut self, direction: Direction, grid: &GridSurface, avoid_obstacles: bool) -> bool {
        if self.frozen {
            return false;
        }
        let dest = self.pos + direction.delta();
        if grid.is_blocked(dest, avoid_obstacles) {
            return false;
        }
        self.pos = dest;
        true
    }

    pub fn move_up(&mut self, grid: &GridSurface, avoid_obstacles: bool) -> bool {
        self.step(Direction::Up, grid, avoid_obstacles)
    }

    pub fn move_down(&mut self, grid: &GridSurface, avoid_obstacles: bool) -> bool {
        self.step(Direction::Down, grid, avoid_obstacles)
    }

    pub fn move_left(&mut self, grid: &GridSurface, avoid_obstacles: bool) -> bool {
        self.step(Direction::Left, grid, avoid_obstacles)
    }

    pub fn move_right(&mut self, grid: &GridSurface, avoid_obstacles: bool) -> bool {
        self.step(Direction::Right, grid, avoid_obstacles)
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn visual(&self) -> Visual {
        if self.frozen {
            Visual::Frozen
        } else if self.replacement_shown {
            Visual::Replacement
        } else {
            Visual::Default
        }
    }

    /// Image filename for the current visual state, falling back to the
    /// default image when no frozen image is configured
    pub fn current_image(&self) -> &str {
        match self.visual() {
            Visual::Frozen => self.images.frozen.as_deref().unwrap_or(&self.images.default),
            Visual::Replacement => self
                .images
                .replacement
                .as_deref()
                .unwrap_or(&self.images.default),
            Visual::Default => &self.images.default,
        }
    }

    /// Take a transport item and show the replacement image
    pub fn pick_up(&mut self, item: ItemKind) -> Result<()> {
        if self.images.replacement.is_none() {
            return Err(GameError::MissingReplacementImage(self.name.clone()));
        }
        self.holding = Some(item);
        self.replacement_shown = true;
        Ok(())
    }

    pub fn set_default_image(&mut self) {
        self.replacement_shown = false;
    }

    /// Let go of the held transport item, if any
    pub fn drop_item(&mut self) -> Option<ItemKind> {
        self.set_default_image();
        self.holding.take()
    }

    pub fn is_holding(&self, item: ItemKind) -> bool {
        self.holding == Some(item)
    }

    pub fn is_full(&self) -> bool {
        self.carrying >= self.capacity
    }

    /// Add one collectible to the load. Refuses (returns false) at capacity.
    pub fn collect(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.carrying += 1;
        true
    }

    /// Empty the load, returning how much was carried
    pub fn deposit(&mut self) -> u32 {
        std::mem::take(&mut self.carrying)
    }

    /// Advance the patrol policy at game time `now`. Returns whether the
    /// actor moved.
    pub fn patrol_tick(&mut self, grid: &GridSurface, now: f64) -> bool {
        let Some(patrol) = self.patrol else {
            return false;
        };
        if patrol.stopped || now - patrol.last_move < patrol.interval {
            return false;
        }

        let moved = self.step(patrol.direction(), grid, false);
        if let Some(patrol) = self.patrol.as_mut() {
            if !moved {
                patrol.heading = patrol.heading.reversed();
            }
            patrol.last_move = now;
        }
        moved
    }

    /// Halt autonomous movement for the rest of the session
    pub fn stop(&mut self) {
        if let Some(patrol) = self.patrol.as_mut() {
            patrol.stopped = true;
        }
    }
}
