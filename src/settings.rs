//! Game configuration
//!
//! Everything here is fixed at construction time; a restart rebuilds the game
//! from the same settings under a fresh seed.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::{ActorImages, Axis};

/// Where a patrol starts and how it moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolSettings {
    /// Pin the starting column (random row when `y` is unset)
    pub x: Option<i32>,
    /// Pin the starting row (random column when `x` is unset)
    pub y: Option<i32>,
    pub axis: Axis,
    /// Seconds between steps
    pub interval: f64,
    pub image: String,
}

impl Default for PatrolSettings {
    fn default() -> Self {
        Self {
            x: Some(7),
            y: None,
            axis: Axis::Vertical,
            interval: 1.0,
            image: "crab.png".into(),
        }
    }
}

/// Image filenames for every item set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemImages {
    pub shell: String,
    pub rock: String,
    pub lava: String,
    pub hook: String,
    pub boat: String,
    pub heart: String,
    pub depot: String,
}

impl Default for ItemImages {
    fn default() -> Self {
        Self {
            shell: "shell.png".into(),
            rock: "rock.png".into(),
            lava: "lava.png".into(),
            hook: "hook.png".into(),
            boat: "boat.png".into(),
            heart: "heart.png".into(),
            depot: "basket.png".into(),
        }
    }
}

/// Sound filenames played on game events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundFiles {
    pub pickup: String,
    pub drop: String,
    pub freeze: String,
    pub rescue: String,
    pub win: String,
    pub lose: String,
}

impl Default for SoundFiles {
    fn default() -> Self {
        Self {
            pickup: "sounds/shell.wav".into(),
            drop: "sounds/oops.wav".into(),
            freeze: "sounds/freeze.wav".into(),
            rescue: "sounds/rescue.wav".into(),
            win: "sounds/ididit.wav".into(),
            lose: "sounds/ohno.wav".into(),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Squares across
    pub grid_width: i32,
    /// Squares down
    pub grid_height: i32,
    /// Pixels per square
    pub cell_size: u32,
    /// Placement seed; unset means the front end picks one from the clock
    pub seed: Option<u64>,

    // === Items ===
    pub shell_count: usize,
    pub rock_count: usize,
    pub lava_count: usize,
    /// Shells an actor can carry before visiting the depot
    pub capacity: u32,

    // === Actors ===
    pub maui_start: IVec2,
    pub moana_start: IVec2,
    pub maui_images: ActorImages,
    pub moana_images: ActorImages,
    pub patrols: Vec<PatrolSettings>,

    // === Assets ===
    pub item_images: ItemImages,
    pub sounds: SoundFiles,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: 15,
            grid_height: 7,
            cell_size: 128,
            seed: None,

            shell_count: 10,
            rock_count: 3,
            lava_count: 2,
            capacity: 8,

            maui_start: IVec2::new(0, 0),
            moana_start: IVec2::new(0, 6),
            maui_images: ActorImages {
                default: "maui.png".into(),
                replacement: Some("maui_hook.png".into()),
                frozen: Some("maui_frozen.png".into()),
            },
            moana_images: ActorImages {
                default: "babymoana.jpg".into(),
                replacement: Some("moana_boat.png".into()),
                frozen: Some("moana_frozen.png".into()),
            },
            patrols: vec![PatrolSettings::default()],

            item_images: ItemImages::default(),
            sounds: SoundFiles::default(),
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({}): {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        (self.grid_width.max(0) as usize) * (self.grid_height.max(0) as usize)
    }

    /// Reject settings no game can be built from
    pub fn validate(&self) -> Result<()> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.cell_size == 0 {
            return Err(GameError::InvalidConfig("cell size must be positive".into()));
        }
        if self.capacity == 0 {
            return Err(GameError::InvalidConfig("capacity must be at least 1".into()));
        }

        let in_bounds = |cell: IVec2| {
            cell.x >= 0 && cell.y >= 0 && cell.x < self.grid_width && cell.y < self.grid_height
        };
        if !in_bounds(self.maui_start) || !in_bounds(self.moana_start) {
            return Err(GameError::InvalidConfig("actor start is off the grid".into()));
        }
        for (i, patrol) in self.patrols.iter().enumerate() {
            if patrol.x.is_some_and(|x| x < 0 || x >= self.grid_width)
                || patrol.y.is_some_and(|y| y < 0 || y >= self.grid_height)
            {
                return Err(GameError::InvalidConfig(format!(
                    "patrol {} is pinned off the grid",
                    i + 1
                )));
            }
            if let (Some(x), Some(y)) = (patrol.x, patrol.y) {
                let start = IVec2::new(x, y);
                if start == self.maui_start || start == self.moana_start {
                    return Err(GameError::InvalidConfig(format!(
                        "patrol {} starts on an actor at {start}",
                        i + 1
                    )));
                }
                let shared = self.patrols[..i]
                    .iter()
                    .any(|other| other.x == Some(x) && other.y == Some(y));
                if shared {
                    return Err(GameError::InvalidConfig(format!(
                        "patrol {} shares its start {start} with another patrol",
                        i + 1
                    )));
                }
            }
        }
        if self.maui_images.replacement.is_none() || self.moana_images.replacement.is_none() {
            return Err(GameError::InvalidConfig(
                "both actors need a replacement image".into(),
            ));
        }

        // Actors, items, the two transport items and the depot all need a cell,
        // plus one spare for the heart
        let needed = 2
            + self.patrols.len()
            + self.shell_count
            + self.rock_count
            + self.lava_count
            + 3
            + 1;
        if needed > self.cell_count() {
            return Err(GameError::InvalidConfig(format!(
                "{needed} cells needed but the grid only has {}",
                self.cell_count()
            )));
        }
        Ok(())
    }
}
