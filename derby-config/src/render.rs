//! Render loop and canvas parameters.

use std::collections::HashMap;

use derby_core::style::Rgb;
use derby_render::EraseStrategy;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Target frames per second of the render loop.
    #[serde(default = "default_frame_rate_hz")]
    #[validate(range(min = 1, max = 240))]
    pub frame_rate_hz: u32,

    #[serde(default)]
    pub erase: EraseStrategy,

    /// Canvas height in pixels. The width is the track width.
    #[serde(default = "default_track_height")]
    #[validate(range(min = 1, max = 16_384))]
    pub track_height: u32,

    #[serde(default = "default_background")]
    pub background: Rgb,

    /// Draw the progress bar behind each participant (repaint mode only).
    #[serde(default = "default_true")]
    pub progress_bar: bool,

    /// Stand-in colour per sprite asset name.
    #[serde(default)]
    pub sprite_tints: HashMap<String, Rgb>,
}

fn default_frame_rate_hz() -> u32 {
    60
}

fn default_track_height() -> u32 {
    420
}

fn default_background() -> Rgb {
    Rgb(0x10, 0x10, 0x28)
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        let sprite_tints = [
            ("ship1", Rgb(0xd0, 0x30, 0x30)),
            ("ship2", Rgb(0x30, 0xa0, 0xd0)),
            ("ship3", Rgb(0x40, 0xc0, 0x40)),
        ]
        .into_iter()
        .map(|(asset, tint)| (asset.to_string(), tint))
        .collect();

        Self {
            frame_rate_hz: default_frame_rate_hz(),
            erase: EraseStrategy::default(),
            track_height: default_track_height(),
            background: default_background(),
            progress_bar: default_true(),
            sprite_tints,
        }
    }
}
