//! Per-tick simulation
//!
//! One call to `tick` per rendered frame. Order within a tick:
//! occupancy rebuild, player moves, patrol steps, interaction rules,
//! status line.

use glam::IVec2;

use super::actor::Direction;
use super::items::ItemKind;
use super::state::{GameEvent, GamePhase, GameState, ally_of, transport_for};
use crate::error::Result;

/// Direction keys currently held for one controllable actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PlayerInput {
    pub fn only(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    /// Held directions, in the order they are applied
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        [
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.left, Direction::Left),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed like `GameState::players`
    pub players: [PlayerInput; 2],
    pub quit: bool,
    pub restart: bool,
}

/// Advance the game by one tick at game time `now` (seconds).
///
/// Errors mean the rules tried to remove an item that was not there or
/// similar; the caller should treat them as fatal.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> Result<()> {
    state.events.clear();
    state.notice = None;

    if input.quit {
        state.done = true;
        return Ok(());
    }
    if input.restart {
        state.rebuild(now)?;
        return Ok(());
    }

    state.time = now;
    state.draw_all();

    // Terminal states only accept restart/quit
    if state.phase.is_terminal() {
        state.update_status();
        return Ok(());
    }

    // Player movement
    for (player, keys) in state.players.iter_mut().zip(input.players.iter()) {
        for direction in keys.directions() {
            player.step(direction, &state.grid, true);
        }
    }

    // Patrols
    let mut stepped = Vec::new();
    for patrol in &mut state.patrols {
        if patrol.patrol_tick(&state.grid, now) {
            stepped.push(patrol.pos);
        }
    }

    // Items returned to the field below must not land under anyone
    state.draw_actors();

    resolve_interactions(state, &stepped)?;
    state.update_status();
    Ok(())
}

/// Apply the interaction rules in precedence order. `stepped` holds the
/// cells patrols moved onto this tick.
fn resolve_interactions(state: &mut GameState, stepped: &[IVec2]) -> Result<()> {
    resolve_hazards(state, stepped)?;
    resolve_rescues(state)?;

    if state.players.iter().all(|p| p.frozen) {
        enter_terminal(state, GamePhase::Lost);
        return Ok(());
    }

    resolve_transport_pickups(state)?;
    resolve_shell_pickups(state)?;
    resolve_depots(state);
    resolve_heart(state)?;
    Ok(())
}

/// Lava or a patrol freezes whoever it touches; a held transport item goes
/// back to the field.
///
/// A patrol only strikes on the tick it steps onto someone. An actor thawed
/// while a patrol still rests on its cell is left alone until it moves.
fn resolve_hazards(state: &mut GameState, stepped: &[IVec2]) -> Result<()> {
    for i in 0..state.players.len() {
        let pos = state.players[i].pos;
        let on_lava = state.lava.has(pos);
        let hit_patrol = stepped.contains(&pos);
        if !on_lava && !hit_patrol {
            continue;
        }
        if on_lava {
            state.lava.remove(pos)?;
        }

        let player = &mut state.players[i];
        if !player.frozen {
            player.freeze();
            log::info!("{} is frozen", player.name);
            state.events.push(GameEvent::Frozen { player: i });
        }
        if let Some(item) = state.players[i].drop_item() {
            state.return_to_field(item)?;
            state.ready = false;
        }
    }
    Ok(())
}

/// Finding a frozen ally's transport item thaws the ally
fn resolve_rescues(state: &mut GameState) -> Result<()> {
    for rescuer in 0..state.players.len() {
        let rescued = ally_of(rescuer);
        let item = transport_for(rescued);
        let pos = state.players[rescuer].pos;
        if !state.players[rescued].frozen {
            continue;
        }
        let (field, _) = state.field_mut(item);
        if !field.has(pos) {
            continue;
        }
        field.remove(pos)?;

        state.players[rescued].unfreeze();
        log::info!(
            "{} rescued {}",
            state.players[rescuer].name,
            state.players[rescued].name
        );
        state.events.push(GameEvent::Rescued { rescuer, rescued });

        // The finder keeps the item if their hands are free, otherwise it goes
        // straight back to its owner
        let keeper = if state.players[rescuer].holding.is_none() {
            rescuer
        } else {
            rescued
        };
        take_item(state, keeper, item)?;
    }
    Ok(())
}

/// Standing on one's own transport item takes it
fn resolve_transport_pickups(state: &mut GameState) -> Result<()> {
    for i in 0..state.players.len() {
        let own = transport_for(i);
        let player = &state.players[i];
        if player.frozen || player.is_holding(own) {
            continue;
        }
        let pos = player.pos;
        let (field, _) = state.field_mut(own);
        if !field.has(pos) {
            continue;
        }
        field.remove(pos)?;
        take_item(state, i, own)?;

        let ally = ally_of(i);
        if state.players[ally].is_holding(transport_for(ally)) && !state.ready {
            state.ready = true;
            state.notice = Some("Ready to sail!".into());
            state.events.push(GameEvent::Ready);
        }
    }
    Ok(())
}

/// Shells can only be gathered while holding one's own transport item
fn resolve_shell_pickups(state: &mut GameState) -> Result<()> {
    for i in 0..state.players.len() {
        let player = &state.players[i];
        let pos = player.pos;
        if player.frozen || !player.is_holding(transport_for(i)) || !state.shells.has(pos) {
            continue;
        }
        state.shells.remove(pos)?;

        let player = &mut state.players[i];
        if player.collect() {
            player.score += 1;
            log::debug!("{} found a shell ({}/{})", player.name, player.carrying, player.capacity);
            state.events.push(GameEvent::ShellCollected { player: i });
        } else {
            let name = player.name.clone();
            log::warn!("{name} is full; shell dropped back on the field");
            state.return_to_field(ItemKind::Shell)?;
            state.notice = Some(format!("{name} can't carry any more! Empty the basket first."));
            state.events.push(GameEvent::ShellDropped { player: i });
        }
    }
    Ok(())
}

/// The depot empties the load; score was already counted at pickup
fn resolve_depots(state: &mut GameState) {
    for i in 0..state.players.len() {
        let player = &mut state.players[i];
        if player.frozen || player.carrying == 0 || !state.depots.has(player.pos) {
            continue;
        }
        let count = player.deposit();
        log::debug!("{} emptied {count} shells", player.name);
        state.events.push(GameEvent::Deposited { player: i, count });
    }
}

/// Reveal the heart once the shells are gone; reaching it wins
fn resolve_heart(state: &mut GameState) -> Result<()> {
    if !state.heart_revealed && state.shells.is_empty() {
        state.return_to_field(ItemKind::Heart)?;
        state.heart_revealed = true;
        state.notice = Some("The heart has appeared!".into());
        state.events.push(GameEvent::HeartRevealed);
        log::info!("All shells found; heart revealed");
    }

    let reached = state
        .players
        .iter()
        .any(|p| state.hearts.has(p.pos));
    if reached {
        enter_terminal(state, GamePhase::Won);
    }
    Ok(())
}

/// Give `item` to `player`, returning anything they held before
fn take_item(state: &mut GameState, player: usize, item: ItemKind) -> Result<()> {
    if let Some(previous) = state.players[player].holding {
        if previous != item {
            state.players[player].drop_item();
            state.return_to_field(previous)?;
        }
    }
    state.players[player].pick_up(item)?;
    log::debug!("{} took the {}", state.players[player].name, item.as_str());
    state.events.push(GameEvent::ItemTaken { player, item });
    Ok(())
}

fn enter_terminal(state: &mut GameState, phase: GamePhase) {
    state.phase = phase;
    for patrol in &mut state.patrols {
        patrol.stop();
    }
    state.events.push(match phase {
        GamePhase::Won => GameEvent::Won,
        _ => GameEvent::Lost,
    });
    log::info!("Game over: {phase:?} with score {}", state.total_score());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{PatrolSettings, Settings};
    use crate::sim::state::{MAUI, MOANA};
    use crate::sim::{Actor, ActorImages, Axis, Heading, Patrol};

    /// 15x7 board with nothing placed randomly except two spare shells in
    /// the far corner, so the heart stays hidden
    fn empty_board() -> GameState {
        let settings = Settings {
            shell_count: 0,
            rock_count: 0,
            lava_count: 0,
            patrols: Vec::new(),
            ..Default::default()
        };
        let mut state = GameState::new(settings, 0.0).unwrap();
        state.hooks.clear();
        state.boats.clear();
        state.depots.clear();
        place(&mut state, ItemKind::Shell, IVec2::new(14, 3));
        place(&mut state, ItemKind::Shell, IVec2::new(14, 4));
        state
    }

    fn place(state: &mut GameState, kind: ItemKind, cell: IVec2) {
        let (set, grid) = state.field_mut(kind);
        set.place_at(grid, cell);
    }

    fn move_maui(direction: Direction) -> TickInput {
        TickInput {
            players: [PlayerInput::only(direction), PlayerInput::default()],
            ..Default::default()
        }
    }

    #[test]
    fn test_shell_needs_transport_item() {
        let mut state = empty_board();
        place(&mut state, ItemKind::Shell, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert_eq!(state.players[MAUI].pos, IVec2::new(1, 0));
        assert!(state.shells.has(IVec2::new(1, 0)));
        assert_eq!(state.players[MAUI].score, 0);
        assert_eq!(state.players[MAUI].carrying, 0);
    }

    #[test]
    fn test_shell_pickup_with_hook() {
        let mut state = empty_board();
        state.players[MAUI].pick_up(ItemKind::Hook).unwrap();
        state.players[MAUI].carrying = 7;
        place(&mut state, ItemKind::Shell, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert!(!state.shells.has(IVec2::new(1, 0)));
        assert_eq!(state.players[MAUI].carrying, 8);
        assert_eq!(state.players[MAUI].score, 1);
        assert!(state.events.contains(&GameEvent::ShellCollected { player: MAUI }));
    }

    #[test]
    fn test_shell_at_capacity_is_dropped_elsewhere() {
        let mut state = empty_board();
        state.players[MAUI].pick_up(ItemKind::Hook).unwrap();
        state.players[MAUI].carrying = 8;
        place(&mut state, ItemKind::Shell, IVec2::new(1, 0));
        let before = state.shells.count();

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert!(!state.shells.has(IVec2::new(1, 0)));
        assert_eq!(state.shells.count(), before);
        assert_eq!(state.players[MAUI].carrying, 8);
        assert_eq!(state.players[MAUI].score, 0);
        assert!(state.events.contains(&GameEvent::ShellDropped { player: MAUI }));
        assert!(state.notice.is_some());
        assert!(state.status.contains("can't carry"));
    }

    #[test]
    fn test_depot_empties_load_keeps_score() {
        let mut state = empty_board();
        state.players[MAUI].carrying = 5;
        state.players[MAUI].score = 5;
        place(&mut state, ItemKind::Depot, IVec2::new(0, 1));

        tick(&mut state, &move_maui(Direction::Down), 0.1).unwrap();
        assert_eq!(state.players[MAUI].carrying, 0);
        assert_eq!(state.players[MAUI].score, 5);
        assert!(state.events.contains(&GameEvent::Deposited { player: MAUI, count: 5 }));
        // Depot stays put
        assert!(state.depots.has(IVec2::new(0, 1)));
    }

    #[test]
    fn test_lava_freezes_and_returns_item() {
        let mut state = empty_board();
        state.players[MAUI].pick_up(ItemKind::Hook).unwrap();
        place(&mut state, ItemKind::Lava, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        let maui = &state.players[MAUI];
        assert!(maui.frozen);
        assert!(maui.holding.is_none());
        assert!(state.lava.is_empty());
        assert_eq!(state.hooks.count(), 1);
        assert!(!state.hooks.has(IVec2::new(1, 0)));
        assert_eq!(state.phase, GamePhase::Playing);

        // Frozen: input is ignored
        tick(&mut state, &move_maui(Direction::Right), 0.2).unwrap();
        assert_eq!(state.players[MAUI].pos, IVec2::new(1, 0));
    }

    #[test]
    fn test_rocks_block_players() {
        let mut state = empty_board();
        place(&mut state, ItemKind::Rock, IVec2::new(1, 0));
        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert_eq!(state.players[MAUI].pos, IVec2::ZERO);
    }

    #[test]
    fn test_both_frozen_is_lost_and_patrols_stop() {
        let mut settings = Settings {
            shell_count: 1,
            rock_count: 0,
            lava_count: 0,
            patrols: vec![PatrolSettings {
                x: Some(10),
                y: Some(0),
                axis: Axis::Vertical,
                interval: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        settings.seed = Some(3);
        let mut state = GameState::new(settings, 0.0).unwrap();
        state.players[MAUI].freeze();
        state.players[MOANA].freeze();

        tick(&mut state, &TickInput::default(), 0.5).unwrap();
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(state.events.contains(&GameEvent::Lost));
        assert_eq!(state.phase.background(), (255, 0, 0));

        let crab = state.patrols[0].pos;
        for t in 1..6 {
            tick(&mut state, &TickInput::default(), t as f64 * 2.0).unwrap();
            assert_eq!(state.patrols[0].pos, crab);
        }
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn test_rescue_via_ally_item() {
        let mut state = empty_board();
        // Maui is frozen on Moana's boat; Moana is frozen too
        state.players[MAUI].pos = IVec2::new(3, 3);
        state.players[MAUI].freeze();
        state.players[MOANA].pos = IVec2::new(5, 5);
        state.players[MOANA].freeze();
        place(&mut state, ItemKind::Boat, IVec2::new(3, 3));

        tick(&mut state, &TickInput::default(), 0.1).unwrap();
        assert!(!state.players[MOANA].frozen);
        assert!(state.players[MAUI].frozen);
        assert!(state.players[MAUI].is_holding(ItemKind::Boat));
        assert!(!state.boats.has(IVec2::new(3, 3)));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::Rescued { rescuer: MAUI, rescued: MOANA }));
    }

    #[test]
    fn test_rescuer_with_full_hands_returns_item_to_owner() {
        let mut state = empty_board();
        state.players[MAUI].pick_up(ItemKind::Hook).unwrap();
        state.players[MOANA].freeze();
        place(&mut state, ItemKind::Boat, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert!(!state.players[MOANA].frozen);
        assert!(state.players[MOANA].is_holding(ItemKind::Boat));
        assert!(state.players[MAUI].is_holding(ItemKind::Hook));
    }

    #[test]
    fn test_own_item_pickup_and_ready() {
        let mut state = empty_board();
        state.players[MOANA].pick_up(ItemKind::Boat).unwrap();
        place(&mut state, ItemKind::Hook, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert!(state.players[MAUI].is_holding(ItemKind::Hook));
        assert!(state.hooks.is_empty());
        assert!(state.ready);
        assert!(state.events.contains(&GameEvent::Ready));
        assert_eq!(state.players[MAUI].current_image(), "maui_hook.png");
    }

    #[test]
    fn test_own_item_replaces_ally_item() {
        let mut state = empty_board();
        state.players[MAUI].pick_up(ItemKind::Boat).unwrap();
        place(&mut state, ItemKind::Hook, IVec2::new(1, 0));

        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert!(state.players[MAUI].is_holding(ItemKind::Hook));
        assert_eq!(state.boats.count(), 1);
    }

    #[test]
    fn test_heart_appears_only_after_last_shell() {
        let mut state = empty_board();
        state.shells.clear();
        place(&mut state, ItemKind::Shell, IVec2::new(1, 0));
        state.players[MAUI].pick_up(ItemKind::Hook).unwrap();

        tick(&mut state, &TickInput::default(), 0.1).unwrap();
        assert!(state.hearts.is_empty());
        assert!(!state.heart_revealed);

        tick(&mut state, &move_maui(Direction::Right), 0.2).unwrap();
        assert!(state.shells.is_empty());
        assert_eq!(state.hearts.count(), 1);
        assert!(state.events.contains(&GameEvent::HeartRevealed));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reaching_heart_wins() {
        let mut state = empty_board();
        state.shells.clear();
        state.heart_revealed = true;
        place(&mut state, ItemKind::Heart, IVec2::new(0, 1));

        tick(&mut state, &move_maui(Direction::Down), 0.1).unwrap();
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&GameEvent::Won));
        assert!(state.status.contains("heart"));

        // Won is terminal: movement is ignored
        tick(&mut state, &move_maui(Direction::Down), 0.2).unwrap();
        assert_eq!(state.players[MAUI].pos, IVec2::new(0, 1));
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_patrol_contact_freezes() {
        let settings = Settings {
            shell_count: 1,
            rock_count: 0,
            lava_count: 0,
            patrols: vec![PatrolSettings {
                x: Some(0),
                y: Some(2),
                axis: Axis::Vertical,
                interval: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut state = GameState::new(settings, 0.0).unwrap();
        state.patrols[0].patrol.as_mut().unwrap().heading = Heading::Backward;
        state.players[MAUI].pos = IVec2::new(0, 1);

        tick(&mut state, &TickInput::default(), 1.0).unwrap();
        assert_eq!(state.patrols[0].pos, IVec2::new(0, 1));
        assert!(state.players[MAUI].frozen);
        assert!(state.events.contains(&GameEvent::Frozen { player: MAUI }));
    }

    #[test]
    fn test_rescued_actor_under_resting_patrol_stays_thawed() {
        let mut state = empty_board();
        let crab = Patrol::new(Axis::Vertical, 100.0, 0.0);
        state.patrols.push(Actor::patrolling(
            "Crab",
            ActorImages::single("crab.png"),
            IVec2::new(3, 3),
            crab,
        ));
        state.players[MAUI].pos = IVec2::new(3, 3);
        state.players[MAUI].freeze();
        place(&mut state, ItemKind::Hook, IVec2::new(1, 6));

        let moana_right = TickInput {
            players: [PlayerInput::default(), PlayerInput::only(Direction::Right)],
            ..Default::default()
        };
        tick(&mut state, &moana_right, 0.1).unwrap();
        assert!(!state.players[MAUI].frozen);
        assert!(state.players[MOANA].is_holding(ItemKind::Hook));

        tick(&mut state, &TickInput::default(), 0.2).unwrap();
        assert!(!state.players[MAUI].frozen);
        assert!(!state.events.contains(&GameEvent::Frozen { player: MAUI }));
        assert_eq!(state.patrols[0].pos, IVec2::new(3, 3));
    }

    #[test]
    fn test_heart_never_spawns_under_a_player() {
        let settings = Settings {
            grid_width: 3,
            grid_height: 2,
            shell_count: 0,
            rock_count: 0,
            lava_count: 0,
            moana_start: IVec2::new(0, 1),
            patrols: Vec::new(),
            ..Default::default()
        };
        let both_right = TickInput {
            players: [
                PlayerInput::only(Direction::Right),
                PlayerInput::only(Direction::Right),
            ],
            ..Default::default()
        };
        for seed in 0..60 {
            let mut state = GameState::new(
                Settings {
                    seed: Some(seed),
                    ..settings.clone()
                },
                0.0,
            )
            .unwrap();
            state.hooks.clear();
            state.boats.clear();
            state.depots.clear();
            place(&mut state, ItemKind::Shell, IVec2::new(1, 0));
            state.players[MAUI].pick_up(ItemKind::Hook).unwrap();

            tick(&mut state, &both_right, 0.1).unwrap();
            assert!(state.heart_revealed);
            let heart = state.hearts.cells()[0];
            assert_eq!(heart.x, 2, "seed {seed}: heart at {heart}");
            assert_eq!(state.phase, GamePhase::Playing);
        }
    }

    #[test]
    fn test_players_cannot_walk_into_patrol() {
        let settings = Settings {
            shell_count: 1,
            rock_count: 0,
            lava_count: 0,
            patrols: vec![PatrolSettings {
                x: Some(1),
                y: Some(0),
                axis: Axis::Vertical,
                interval: 100.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut state = GameState::new(settings, 0.0).unwrap();
        tick(&mut state, &move_maui(Direction::Right), 0.1).unwrap();
        assert_eq!(state.players[MAUI].pos, IVec2::ZERO);
        assert!(!state.players[MAUI].frozen);
    }

    #[test]
    fn test_quit_and_restart() {
        let mut state = empty_board();
        state.players[MAUI].score = 3;

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 1.0).unwrap();
        assert_eq!(state.players[MAUI].score, 0);
        assert!(state.events.contains(&GameEvent::Restarted));

        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit, 2.0).unwrap();
        assert!(state.done);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(Settings::default(), 0.0).unwrap();
        let mut b = GameState::new(Settings::default(), 0.0).unwrap();
        let inputs = [
            move_maui(Direction::Right),
            move_maui(Direction::Down),
            TickInput::default(),
            move_maui(Direction::Right),
        ];
        for (i, input) in inputs.iter().cycle().take(40).enumerate() {
            let now = i as f64 * 0.25;
            tick(&mut a, input, now).unwrap();
            tick(&mut b, input, now).unwrap();
        }
        assert_eq!(a.players[MAUI].pos, b.players[MAUI].pos);
        assert_eq!(a.patrols[0].pos, b.patrols[0].pos);
        assert_eq!(a.shells.cells(), b.shells.cells());
        assert_eq!(a.status, b.status);
    }
}
