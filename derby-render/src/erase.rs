use serde::{Deserialize, Serialize};

/// How the render loop removes the previous frame before drawing the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseStrategy {
    /// Repaint the whole background, then every progress bar and sprite.
    #[default]
    Repaint,
    /// Clear only the rectangle each participant occupied last frame.
    Trail,
}
