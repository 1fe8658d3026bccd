//! Terminal renderer: one glyph per grid cell, status line underneath

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use super::{ImageCache, ImageHandle, Renderer};
use crate::settings::Settings;

/// Glyph for every image the settings mention
pub fn glyph_table(settings: &Settings, images: &mut ImageCache) -> HashMap<ImageHandle, char> {
    let items = &settings.item_images;
    let mut table = HashMap::new();
    let mut bind = |name: &str, glyph: char| {
        table.insert(images.get(name), glyph);
    };

    bind(&items.shell, 's');
    bind(&items.rock, '#');
    bind(&items.lava, '~');
    bind(&items.hook, 'j');
    bind(&items.boat, 'b');
    bind(&items.heart, '♥');
    bind(&items.depot, 'u');

    for (actor, glyph) in [(&settings.maui_images, 'M'), (&settings.moana_images, 'O')] {
        bind(&actor.default, glyph);
        if let Some(replacement) = &actor.replacement {
            bind(replacement, glyph);
        }
        if let Some(frozen) = &actor.frozen {
            bind(frozen, glyph.to_ascii_lowercase());
        }
    }
    for patrol in &settings.patrols {
        bind(&patrol.image, 'C');
    }
    table
}

/// Renders frames to a string
#[derive(Debug)]
pub struct TextRenderer {
    width: usize,
    height: usize,
    cells: Vec<char>,
    glyphs: HashMap<ImageHandle, char>,
    background: (u8, u8, u8),
    status: String,
    output: String,
}

impl TextRenderer {
    pub fn new(width: i32, height: i32, glyphs: HashMap<ImageHandle, char>) -> Self {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec!['.'; width * height],
            glyphs,
            background: (0, 0, 0),
            status: String::new(),
            output: String::new(),
        }
    }

    /// The last presented frame
    pub fn output(&self) -> &str {
        &self.output
    }

    fn banner(&self) -> &'static str {
        match self.background {
            (0, 255, 0) => "*** YOU WIN ***",
            (255, 0, 0) => "*** GAME OVER ***",
            _ => "",
        }
    }
}

impl Renderer for TextRenderer {
    fn begin_frame(&mut self, background: (u8, u8, u8)) {
        self.background = background;
        self.cells.fill('.');
        self.status.clear();
    }

    fn blit(&mut self, image: ImageHandle, cell: IVec2, _pixel: Vec2) {
        if cell.x < 0 || cell.y < 0 {
            return;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let glyph = self.glyphs.get(&image).copied().unwrap_or('?');
        self.cells[y * self.width + x] = glyph;
    }

    fn show_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn present(&mut self) {
        let mut output = String::with_capacity((self.width + 1) * (self.height + 3));
        let banner = self.banner();
        if !banner.is_empty() {
            output.push_str(banner);
            output.push('\n');
        }
        for row in self.cells.chunks(self.width.max(1)) {
            output.extend(row.iter());
            output.push('\n');
        }
        output.push_str(&self.status);
        output.push('\n');
        self.output = output;
    }
}
