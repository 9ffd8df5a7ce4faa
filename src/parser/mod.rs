//! PDF text extraction.
//!
//! A [`PageSource`] yields positioned glyph runs per page, the reconstructor
//! turns them into reading-order text, and [`build_document`] assembles the
//! pages into a [`Document`](crate::model::Document).

mod backend;
mod builder;
mod content;
mod fonts;
mod options;
mod reconstruct;

pub use backend::{decode_text_simple, ContentOp, LopdfSource, PageSource, PdfValue};
pub use builder::build_document;
pub use content::{scan_glyph_runs, FontResolver, Matrix};
pub use fonts::{FontMetrics, DEFAULT_GLYPH_WIDTH};
pub use options::ExtractOptions;
pub use reconstruct::{reconstruct_text, LINE_BREAK_THRESHOLD, WORD_GAP_THRESHOLD};
