//! Game state and owned entities
//!
//! `GameState` owns the grid, every item set and every actor. A restart
//! throws all of it away and rebuilds from the stored settings.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorImages, Patrol};
use super::grid::GridSurface;
use super::items::{ItemKind, ItemSet};
use crate::error::Result;
use crate::settings::Settings;

/// Index of the hook-carrying actor in `GameState::players`
pub const MAUI: usize = 0;
/// Index of the boat-carrying actor in `GameState::players`
pub const MOANA: usize = 1;

/// The transport item each controllable actor needs to collect shells
pub fn transport_for(player: usize) -> ItemKind {
    if player == MAUI {
        ItemKind::Hook
    } else {
        ItemKind::Boat
    }
}

/// Index of the other controllable actor
pub fn ally_of(player: usize) -> usize {
    1 - player
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Heart reached; terminal
    Won,
    /// Everyone frozen; terminal
    Lost,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    /// Background colour (rgb) for this phase
    pub fn background(&self) -> (u8, u8, u8) {
        match self {
            GamePhase::Playing => (0, 0, 255),
            GamePhase::Won => (0, 255, 0),
            GamePhase::Lost => (255, 0, 0),
        }
    }
}

/// Things that happened during one tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ShellCollected { player: usize },
    /// Picked up over capacity; the shell went back to the field
    ShellDropped { player: usize },
    Frozen { player: usize },
    Rescued { rescuer: usize, rescued: usize },
    ItemTaken { player: usize, item: ItemKind },
    /// Both actors hold their own transport item
    Ready,
    Deposited { player: usize, count: u32 },
    HeartRevealed,
    Won,
    Lost,
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub grid: GridSurface,

    pub shells: ItemSet,
    pub rocks: ItemSet,
    pub lava: ItemSet,
    pub hooks: ItemSet,
    pub boats: ItemSet,
    pub hearts: ItemSet,
    pub depots: ItemSet,

    /// Controllable actors, indexed by `MAUI` and `MOANA`
    pub players: [Actor; 2],
    pub patrols: Vec<Actor>,

    pub phase: GamePhase,
    pub ready: bool,
    pub heart_revealed: bool,
    /// Status line shown under the grid
    pub status: String,
    /// Transient message for this tick (warnings, cheers)
    pub notice: Option<String>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Game time (seconds) of the most recent tick
    pub time: f64,
    /// Placement seed this board was built from
    pub seed: u64,
    /// Quit requested
    pub done: bool,
}

impl GameState {
    /// Build a fresh game at game time `now`.
    ///
    /// An unset seed counts as 0; the front end fills it from the clock.
    pub fn new(settings: Settings, now: f64) -> Result<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_default();
        let mut grid = GridSurface::new(settings.grid_width, settings.grid_height, seed);

        let players = [
            Actor::new(
                "Maui",
                settings.maui_images.clone(),
                settings.maui_start,
                settings.capacity,
            ),
            Actor::new(
                "Moana",
                settings.moana_images.clone(),
                settings.moana_start,
                settings.capacity,
            ),
        ];
        for player in &players {
            player.draw(&mut grid);
        }

        let mut patrols = Vec::with_capacity(settings.patrols.len());
        for (i, config) in settings.patrols.iter().enumerate() {
            let start = grid.random_free_cell(config.x, config.y)?;
            let patrol = Actor::patrolling(
                format!("Crab {}", i + 1),
                ActorImages::single(config.image.clone()),
                start,
                Patrol::new(config.axis, config.interval, now),
            );
            patrol.draw(&mut grid);
            patrols.push(patrol);
        }

        let images = &settings.item_images;
        let mut rocks = ItemSet::new(ItemKind::Rock, images.rock.clone(), true);
        let mut lava = ItemSet::new(ItemKind::Lava, images.lava.clone(), false);
        let mut shells = ItemSet::new(ItemKind::Shell, images.shell.clone(), false);
        let mut hooks = ItemSet::new(ItemKind::Hook, images.hook.clone(), false);
        let mut boats = ItemSet::new(ItemKind::Boat, images.boat.clone(), false);
        let mut depots = ItemSet::new(ItemKind::Depot, images.depot.clone(), false);
        let hearts = ItemSet::new(ItemKind::Heart, images.heart.clone(), false);

        rocks.place_randomly(&mut grid, settings.rock_count)?;
        lava.place_randomly(&mut grid, settings.lava_count)?;
        shells.place_randomly(&mut grid, settings.shell_count)?;
        hooks.place_randomly(&mut grid, 1)?;
        boats.place_randomly(&mut grid, 1)?;
        depots.place_randomly(&mut grid, 1)?;

        log::info!(
            "New game (seed {seed}): {}x{} grid, {} shells, {} rocks, {} lava, {} patrols",
            settings.grid_width,
            settings.grid_height,
            shells.count(),
            rocks.count(),
            lava.count(),
            patrols.len()
        );

        let mut state = Self {
            settings,
            grid,
            shells,
            rocks,
            lava,
            hooks,
            boats,
            hearts,
            depots,
            players,
            patrols,
            phase: GamePhase::Playing,
            ready: false,
            heart_revealed: false,
            status: String::new(),
            notice: None,
            events: Vec::new(),
            time: now,
            seed,
            done: false,
        };
        state.update_status();
        Ok(state)
    }

    /// Discard every entity and rebuild from the stored settings with a
    /// fresh seed drawn from the current board
    pub fn rebuild(&mut self, now: f64) -> Result<()> {
        let seed = self.grid.next_seed();
        let mut settings = self.settings.clone();
        settings.seed = Some(seed);
        *self = Self::new(settings, now)?;
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted with seed: {seed}");
        Ok(())
    }

    /// Item sets in draw order (bottom first)
    pub fn item_sets(&self) -> [&ItemSet; 7] {
        [
            &self.depots,
            &self.lava,
            &self.rocks,
            &self.shells,
            &self.hooks,
            &self.boats,
            &self.hearts,
        ]
    }

    /// The field holding items of `kind`, together with the grid, so callers
    /// can place into it
    pub fn field_mut(&mut self, kind: ItemKind) -> (&mut ItemSet, &mut GridSurface) {
        let set = match kind {
            ItemKind::Shell => &mut self.shells,
            ItemKind::Rock => &mut self.rocks,
            ItemKind::Lava => &mut self.lava,
            ItemKind::Hook => &mut self.hooks,
            ItemKind::Boat => &mut self.boats,
            ItemKind::Heart => &mut self.hearts,
            ItemKind::Depot => &mut self.depots,
        };
        (set, &mut self.grid)
    }

    /// Put one item of `kind` back somewhere free on the field
    pub fn return_to_field(&mut self, kind: ItemKind) -> Result<()> {
        let (set, grid) = self.field_mut(kind);
        set.place_randomly(grid, 1)?;
        log::debug!("{} returned to the field", kind.as_str());
        Ok(())
    }

    /// Register every entity's cell for this tick
    pub fn draw_all(&mut self) {
        self.grid.reset();
        for set in [
            &self.depots,
            &self.lava,
            &self.rocks,
            &self.shells,
            &self.hooks,
            &self.boats,
            &self.hearts,
        ] {
            set.draw(&mut self.grid);
        }
        self.draw_actors();
    }

    /// Register where every actor stands now. Called again once movement is
    /// done so items returned to the field never land under an actor.
    pub fn draw_actors(&mut self) {
        for actor in self.patrols.iter().chain(self.players.iter()) {
            actor.draw(&mut self.grid);
        }
    }

    pub fn total_score(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    /// Recompute the status line
    pub fn update_status(&mut self) {
        self.status = match self.phase {
            GamePhase::Won => format!(
                "You found the heart! Score {}. Press R to play again.",
                self.total_score()
            ),
            GamePhase::Lost => "Everyone is frozen! Press R to try again.".to_string(),
            GamePhase::Playing => {
                let players = self
                    .players
                    .iter()
                    .map(|p| format!("{} {} ({}/{})", p.name, p.score, p.carrying, p.capacity))
                    .collect::<Vec<_>>()
                    .join(" | ");
                let mut status = if self.heart_revealed {
                    format!("{players} | Find the heart!")
                } else {
                    format!("{players} | Shells left: {}", self.shells.count())
                };
                if let Some(notice) = &self.notice {
                    status.push_str(" | ");
                    status.push_str(notice);
                }
                status
            }
        };
    }
}
