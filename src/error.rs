//! Error types raised by the simulation and its configuration.

use glam::IVec2;
use thiserror::Error;

/// Errors surfaced by the game core.
///
/// `NotFound` and `MissingReplacementImage` mean the interaction rules were
/// applied out of order; the front end treats them as fatal.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no item at cell {0}")]
    NotFound(IVec2),

    #[error("no free cell available for placement")]
    NoFreeCell,

    #[error("actor {0} has no replacement image configured")]
    MissingReplacementImage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
