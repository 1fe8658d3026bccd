//! Audio requests
//!
//! Fire-and-forget: the game asks for a named sound when something happens
//! and never waits for an answer. Mixing and playback belong to the backend.

use crate::settings::SoundFiles;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shell or transport item picked up
    Pickup,
    /// Shell dropped back on the field (over capacity)
    Drop,
    /// Actor frozen by lava or a patrol
    Freeze,
    /// Frozen ally thawed
    Rescue,
    /// Heart reached (music track)
    Win,
    /// Everyone frozen (music track)
    Lose,
}

impl SoundEffect {
    /// Which sound, if any, a game event triggers
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShellCollected { .. } | GameEvent::ItemTaken { .. } => Some(Self::Pickup),
            GameEvent::ShellDropped { .. } => Some(Self::Drop),
            GameEvent::Frozen { .. } => Some(Self::Freeze),
            GameEvent::Rescued { .. } => Some(Self::Rescue),
            GameEvent::Won => Some(Self::Win),
            GameEvent::Lost => Some(Self::Lose),
            GameEvent::Ready
            | GameEvent::Deposited { .. }
            | GameEvent::HeartRevealed
            | GameEvent::Restarted => None,
        }
    }

    /// Music tracks replace whatever is playing; effects layer on top
    pub fn is_music(&self) -> bool {
        matches!(self, SoundEffect::Win | SoundEffect::Lose)
    }

    pub fn file<'a>(&self, sounds: &'a SoundFiles) -> &'a str {
        match self {
            SoundEffect::Pickup => &sounds.pickup,
            SoundEffect::Drop => &sounds.drop,
            SoundEffect::Freeze => &sounds.freeze,
            SoundEffect::Rescue => &sounds.rescue,
            SoundEffect::Win => &sounds.win,
            SoundEffect::Lose => &sounds.lose,
        }
    }
}

/// Something that can play a named sound file
pub trait AudioSink {
    fn play(&mut self, file: &str, volume: f32, music: bool);
}

/// Sink that only logs what would have played
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, file: &str, volume: f32, music: bool) {
        let kind = if music { "track" } else { "effect" };
        log::info!("Playing {kind} {file} at volume {volume:.2}");
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    sounds: SoundFiles,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, sounds: SoundFiles) -> Self {
        Self {
            sink,
            sounds,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if effect.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        self.master_volume * channel
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        let file = effect.file(&self.sounds);
        self.sink.play(file, vol, effect.is_music());
    }

    /// Play whatever the tick's events call for
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
