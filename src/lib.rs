//! Shell Hunt - a top-down grid game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid occupancy, actors, interaction rules)
//! - `renderer`: Rendering collaborator (image cache, frame drawing)
//! - `audio`: Fire-and-forget sound requests
//! - `input`: Key bindings for the terminal front end
//! - `settings`: Construction-time configuration

pub mod audio;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Top-left pixel of a grid cell
#[inline]
pub fn cell_to_pixels(cell: IVec2, cell_size: u32) -> Vec2 {
    cell.as_vec2() * cell_size as f32
}
