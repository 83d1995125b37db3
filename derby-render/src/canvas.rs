//! ## derby-render::canvas
//! **In-memory RGB raster**
//!
//! Image assets are not loaded; a sprite is drawn as a solid block in the
//! tint registered for its asset name, or `UNKNOWN_SPRITE` if none was.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::{Rgb, Surface};

const UNKNOWN_SPRITE: Rgb = Rgb(0xff, 0x00, 0xff);

#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<Rgb>,
    sprite_tints: HashMap<String, Rgb>,
    frames: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width as usize * height as usize],
            sprite_tints: HashMap::new(),
            frames: 0,
        }
    }

    /// Registers the colour used to stand in for `asset`.
    pub fn with_sprite_tint(mut self, asset: impl Into<String>, tint: Rgb) -> Self {
        self.sprite_tints.insert(asset.into(), tint);
        self
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Encodes the raster as binary PPM (P6).
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for Rgb(r, g, b) in &self.pixels {
            out.extend_from_slice(&[*r, *g, *b]);
        }
        out
    }

    pub fn write_ppm<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path.as_ref())?;
        file.write_all(&self.to_ppm())?;
        debug!(
            "Wrote {}x{} snapshot to {}",
            self.width,
            self.height,
            path.as_ref().display()
        );
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Surface for Canvas {
    fn repaint_background(&mut self) {
        self.pixels.fill(self.background);
    }

    fn background(&self) -> Rgb {
        self.background
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        // Clip to the raster; anything off-surface is dropped.
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = self.index(x.min(x_end), row);
            let end = self.index(x_end, row);
            self.pixels[start..end].fill(color);
        }
    }

    fn draw_sprite(&mut self, asset: &str, x: u32, y: u32, width: u32, height: u32) {
        let tint = self
            .sprite_tints
            .get(asset)
            .copied()
            .unwrap_or(UNKNOWN_SPRITE);
        self.fill_rect(x, y, width, height, tint);
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
