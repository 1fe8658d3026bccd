//! Rendering collaborator
//!
//! The simulation never draws. Each frame the front end hands a read-only
//! `GameState` to `draw_frame`, which resolves image filenames to cached
//! handles and issues blits to whatever `Renderer` backs the display.

pub mod text;

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::cell_to_pixels;
use crate::sim::GameState;

pub use text::TextRenderer;

/// Opaque handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(u32);

/// Images cached by filename
#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<String, ImageHandle>,
    names: Vec<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `filename`, loading it on first use
    pub fn get(&mut self, filename: &str) -> ImageHandle {
        if let Some(handle) = self.handles.get(filename) {
            return *handle;
        }
        let handle = ImageHandle(self.names.len() as u32);
        log::debug!("Loading image images/{filename}");
        self.names.push(filename.to_string());
        self.handles.insert(filename.to_string(), handle);
        handle
    }

    pub fn name(&self, handle: ImageHandle) -> Option<&str> {
        self.names.get(handle.0 as usize).map(String::as_str)
    }
}

/// A display surface
pub trait Renderer {
    /// Start a frame filled with `background` (rgb)
    fn begin_frame(&mut self, background: (u8, u8, u8));
    /// Draw `image` at grid `cell`, whose top-left corner is at `pixel`
    fn blit(&mut self, image: ImageHandle, cell: IVec2, pixel: Vec2);
    /// Put `text` in the status area under the grid
    fn show_status(&mut self, text: &str);
    fn present(&mut self);
}

/// Draw one frame: items bottom-up, then patrols, then the players on top
pub fn draw_frame<R: Renderer>(state: &GameState, images: &mut ImageCache, renderer: &mut R) {
    let cell_size = state.settings.cell_size;
    renderer.begin_frame(state.phase.background());

    for set in state.item_sets() {
        let image = images.get(&set.image);
        for cell in set.cells() {
            renderer.blit(image, *cell, cell_to_pixels(*cell, cell_size));
        }
    }
    for actor in state.patrols.iter().chain(state.players.iter()) {
        let image = images.get(actor.current_image());
        renderer.blit(image, actor.pos, cell_to_pixels(actor.pos, cell_size));
    }

    renderer.show_status(&state.status);
    renderer.present();
}
