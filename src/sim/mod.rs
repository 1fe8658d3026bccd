//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Game time is passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (items and actors keep insertion order)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod grid;
pub mod items;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorImages, Axis, Direction, Heading, Patrol, Visual};
pub use grid::GridSurface;
pub use items::{ItemKind, ItemSet};
pub use state::{GameEvent, GamePhase, GameState, MAUI, MOANA, ally_of, transport_for};
pub use tick::{PlayerInput, TickInput, tick};
