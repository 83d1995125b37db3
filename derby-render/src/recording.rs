//! Surface that records what was drawn, frame by frame. Used for headless
//! races and for asserting render behaviour in tests.

use std::collections::VecDeque;

use crate::{Rgb, Surface};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    RepaintBackground,
    FillRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgb,
    },
    Sprite {
        asset: String,
        x: u32,
        y: u32,
    },
}

#[derive(Clone, Debug)]
pub struct RecordingSurface {
    background: Rgb,
    pending: Vec<DrawCommand>,
    frames: VecDeque<Vec<DrawCommand>>,
    keep_frames: usize,
    presented: u64,
}

impl RecordingSurface {
    /// Keeps at most `keep_frames` most recent frames.
    pub fn new(keep_frames: usize) -> Self {
        let keep_frames = keep_frames.max(1);
        Self {
            background: Rgb::BLACK,
            pending: Vec::new(),
            frames: VecDeque::with_capacity(keep_frames),
            keep_frames,
            presented: 0,
        }
    }

    /// Retained frames, oldest first.
    pub fn frames(&self) -> &VecDeque<Vec<DrawCommand>> {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCommand]> {
        self.frames.back().map(Vec::as_slice)
    }

    /// Total frames presented, including ones no longer retained.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for RecordingSurface {
    fn repaint_background(&mut self) {
        self.pending.push(DrawCommand::RepaintBackground);
    }

    fn background(&self) -> Rgb {
        self.background
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        self.pending.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_sprite(&mut self, asset: &str, x: u32, y: u32, _width: u32, _height: u32) {
        self.pending.push(DrawCommand::Sprite {
            asset: asset.to_string(),
            x,
            y,
        });
    }

    fn present(&mut self) {
        self.presented += 1;
        if self.frames.len() == self.keep_frames {
            self.frames.pop_front();
        }
        self.frames.push_back(std::mem::take(&mut self.pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_only_recent_frames() {
        let mut surface = RecordingSurface::new(2);
        for x in 0..3 {
            surface.draw_sprite("ship", x, 0, 1, 1);
            surface.present();
        }
        assert_eq!(surface.presented(), 3);
        assert_eq!(surface.frames().len(), 2);
        assert_eq!(
            surface.frames()[0],
            vec![DrawCommand::Sprite {
                asset: "ship".into(),
                x: 1,
                y: 0
            }]
        );
        assert_eq!(
            surface.last_frame(),
            Some(
                &[DrawCommand::Sprite {
                    asset: "ship".into(),
                    x: 2,
                    y: 0
                }][..]
            )
        );
    }

    #[test]
    fn zero_retention_still_keeps_latest_frame() {
        let mut surface = RecordingSurface::new(0);
        surface.repaint_background();
        surface.present();
        surface.present();
        assert_eq!(surface.frames().len(), 1);
        assert_eq!(surface.last_frame(), Some(&[][..]));
    }
}
