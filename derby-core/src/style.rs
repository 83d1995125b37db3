//! Visual style of a participant on the track.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 24-bit colour, written as `#rrggbb` in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const ORANGE: Rgb = Rgb(0xff, 0xa5, 0x00);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| format!("invalid colour '{s}', expected #rrggbb"))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("invalid colour '{s}'"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a participant is drawn: an image asset or a filled rectangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualStyle {
    Sprite {
        asset: String,
        width: u32,
        height: u32,
    },
    Fill { color: Rgb, width: u32, height: u32 },
}

impl VisualStyle {
    pub fn width(&self) -> u32 {
        match self {
            VisualStyle::Sprite { width, .. } | VisualStyle::Fill { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            VisualStyle::Sprite { height, .. } | VisualStyle::Fill { height, .. } => *height,
        }
    }
}

impl Default for VisualStyle {
    fn default() -> Self {
        VisualStyle::Fill {
            color: Rgb::BLACK,
            width: 0,
            height: 0,
        }
    }
}
