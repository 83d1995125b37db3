//! # derby-render
//!
//! 2-D drawing surfaces for the race track. Origin is top-left and all
//! coordinates are pixels.
//!
//! ### Components:
//! - `surface`: the `Surface` trait the render loop draws through
//! - `canvas`: in-memory RGB raster with PPM export
//! - `recording`: surface that records draw commands per frame
//! - `erase`: how the previous frame is cleared

pub mod canvas;
pub mod erase;
pub mod recording;
pub mod surface;

pub use canvas::Canvas;
pub use erase::EraseStrategy;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{SharedSurface, Surface};

pub use derby_core::style::{Rgb, VisualStyle};
