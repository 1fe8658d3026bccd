//! Shell Hunt entry point
//!
//! Terminal front end: each line typed is one tick's worth of held keys.
//! Patrol timing follows the wall clock between lines. Unless the settings
//! pin a seed, every launch deals a new board.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use shell_hunt::audio::{AudioManager, LogSink};
use shell_hunt::input::{HELP, parse_line};
use shell_hunt::renderer::text::glyph_table;
use shell_hunt::renderer::{ImageCache, TextRenderer, draw_frame};
use shell_hunt::sim::{GameState, tick};
use shell_hunt::{Result, Settings};

fn main() {
    env_logger::init();
    log::info!("Shell Hunt starting...");

    if let Err(err) = run() {
        log::error!("Fatal: {err}");
        eprintln!("shell-hunt: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut settings = match std::env::args().nth(1) {
        Some(path) => load_or_create(Path::new(&path))?,
        None => Settings::default(),
    };
    if settings.seed.is_none() {
        settings.seed = Some(clock_seed());
    }

    let clock = Instant::now();
    let mut state = GameState::new(settings, 0.0)?;
    log::info!("Game initialized with seed: {}", state.seed);

    let mut images = ImageCache::new();
    let glyphs = glyph_table(&state.settings, &mut images);
    let mut renderer = TextRenderer::new(state.grid.width(), state.grid.height(), glyphs);
    let mut audio = AudioManager::new(LogSink, state.settings.sounds.clone());
    audio.set_master_volume(state.settings.master_volume);
    audio.set_muted(state.settings.muted);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP}")?;
    draw_frame(&state, &mut images, &mut renderer);
    write!(out, "{}", renderer.output())?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let input = parse_line(&line?);
        let now = clock.elapsed().as_secs_f64();
        tick(&mut state, &input, now)?;
        if state.done {
            break;
        }

        audio.play_events(&state.events);
        draw_frame(&state, &mut images, &mut renderer);
        write!(out, "{}", renderer.output())?;
        out.flush()?;
    }

    log::info!("Bye! Final score {}", state.total_score());
    Ok(())
}

/// Load settings from `path`, writing the defaults there first if it does not
/// exist yet
fn load_or_create(path: &Path) -> Result<Settings> {
    if !path.exists() {
        let settings = Settings::default();
        settings.save(path)?;
        return Ok(settings);
    }
    Ok(Settings::load(path))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
