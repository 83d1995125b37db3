use std::sync::Arc;

use parking_lot::Mutex;

use crate::Rgb;

/// Drawing primitives the render loop needs.
pub trait Surface: Send {
    /// Fills the whole surface with its background.
    fn repaint_background(&mut self);

    /// Background colour used when erasing a single rectangle.
    fn background(&self) -> Rgb;

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb);

    /// Draws the image `asset` with its top-left corner at `(x, y)`.
    fn draw_sprite(&mut self, asset: &str, x: u32, y: u32, width: u32, height: u32);

    /// Marks the end of a frame.
    fn present(&mut self) {}
}

/// Surface shared between the render task and its owner.
pub type SharedSurface<S> = Arc<Mutex<S>>;
