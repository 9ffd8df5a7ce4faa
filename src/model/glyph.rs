//! Positioned text runs produced by the PDF text layer.

use serde::{Deserialize, Serialize};

/// A contiguous span of rendered text with a known origin and advance.
///
/// Coordinates are in the page's device space (PDF user space after the
/// current transformation matrix), with `y` growing upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    /// The decoded text content
    pub text: String,
    /// X position of the run origin (left edge)
    pub x: f32,
    /// Horizontal advance of the whole run
    pub width: f32,
    /// Y position of the baseline
    pub y: f32,
}

impl GlyphRun {
    /// Create a new glyph run.
    pub fn new(text: impl Into<String>, x: f32, width: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            width,
            y,
        }
    }

    /// X coordinate where the run ends.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}
