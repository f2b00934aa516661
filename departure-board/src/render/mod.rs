//! Board rendering into two-layer monochrome frames.
//!
//! The target panel is a 384×640 tri-colour e-paper display: one layer of
//! black ink and one of highlight ink.

mod bitmap;
mod board;
mod text;

pub use bitmap::Bitmap;
pub use board::BoardRenderer;
pub use text::{display_countdown, format_addr, format_name, wrap};

use crate::domain::{DisplaySnapshot, WeatherSnapshot};
use crate::error::FailureKind;

pub const DISPLAY_WIDTH: u32 = 384;
pub const DISPLAY_HEIGHT: u32 = 640;

/// A rendered frame: black ink plus highlight ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub black: Bitmap,
    pub highlight: Bitmap,
}

impl Frame {
    /// An all-white frame of the panel's size.
    pub fn blank() -> Self {
        Self {
            black: Bitmap::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            highlight: Bitmap::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        }
    }
}

/// Turns snapshots and failures into frames.
pub trait Renderer: Send {
    /// Render the departure board. Without weather the footer is left out.
    fn render(&self, snapshot: &DisplaySnapshot, weather: Option<&WeatherSnapshot>) -> Frame;

    /// Render an error screen. `details` are already redacted.
    fn render_error(&self, message: &str, kind: FailureKind, details: &[String]) -> Frame;
}
