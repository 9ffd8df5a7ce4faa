//! Document model types shared by extraction and comparison.
//!
//! The model is the hand-off point between the PDF text layer and the diff
//! engine: glyph runs come out of a page source, documents go into a
//! comparison.

mod document;
mod glyph;
mod page;

pub use document::Document;
pub use glyph::GlyphRun;
pub use page::PageText;
