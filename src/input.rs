//! Key bindings for the terminal front end
//!
//! Maui moves with WASD, Moana with IJKL. A line of keys is treated as the
//! set of keys held for one tick.

use crate::sim::{Direction, MAUI, MOANA, TickInput};

/// A logical action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move { player: usize, direction: Direction },
    Restart,
    Quit,
}

/// Action bound to `key`, if any
pub fn action_for(key: char) -> Option<Action> {
    let movement = |player, direction| Some(Action::Move { player, direction });
    match key.to_ascii_lowercase() {
        'w' => movement(MAUI, Direction::Up),
        's' => movement(MAUI, Direction::Down),
        'a' => movement(MAUI, Direction::Left),
        'd' => movement(MAUI, Direction::Right),
        'i' => movement(MOANA, Direction::Up),
        'k' => movement(MOANA, Direction::Down),
        'j' => movement(MOANA, Direction::Left),
        'l' => movement(MOANA, Direction::Right),
        'r' => Some(Action::Restart),
        'q' | '\u{1b}' => Some(Action::Quit),
        _ => None,
    }
}

/// Fold held actions into one tick's input
pub fn collect_input(actions: impl IntoIterator<Item = Action>) -> TickInput {
    let mut input = TickInput::default();
    for action in actions {
        match action {
            Action::Move { player, direction } => {
                let Some(keys) = input.players.get_mut(player) else {
                    continue;
                };
                match direction {
                    Direction::Up => keys.up = true,
                    Direction::Down => keys.down = true,
                    Direction::Left => keys.left = true,
                    Direction::Right => keys.right = true,
                }
            }
            Action::Restart => input.restart = true,
            Action::Quit => input.quit = true,
        }
    }
    input
}

/// Parse a typed line into one tick's input; unbound keys are ignored
pub fn parse_line(line: &str) -> TickInput {
    collect_input(line.chars().filter_map(action_for))
}

/// Key help shown by the front end
pub const HELP: &str = "Maui: W/A/S/D  Moana: I/J/K/L  R: restart  Q: quit  (press Enter to tick)";
