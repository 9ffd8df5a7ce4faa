//! # pdfdiff
//!
//! Compare the text of two PDF documents.
//!
//! The library rebuilds reading-order text from each page's positioned glyph
//! runs, diffs the two versions at word or line granularity, and reports
//! what was added, removed, or left unchanged per page and overall.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdiff::{compare_files, CompareOptions, ExtractOptions};
//!
//! fn main() -> pdfdiff::Result<()> {
//!     let comparison = compare_files(
//!         "contract-v1.pdf",
//!         "contract-v2.pdf",
//!         &ExtractOptions::default(),
//!         &CompareOptions::default(),
//!     )?;
//!
//!     for page in comparison.changed_pages() {
//!         println!("page {}: {} changes", page.page_number, page.stats.total_changes);
//!     }
//!     println!("{:.2}% changed", comparison.stats.change_percentage);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Text reconstruction**: line breaks and word spaces inferred from glyph geometry
//! - **Word and line diffs**: Myers shortest edit script, whitespace preserved
//! - **Statistics**: per-page and combined word counts and change percentage
//! - **Page ranges**: `"1,3,5-8"` style selections
//! - **Parallel processing**: Uses Rayon for the two extractions and per-page diffs
//! - **JSON reports**: pretty or compact

pub mod compare;
pub mod diff;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod select;
pub mod validate;

// Re-export commonly used types
pub use compare::{
    compare_bytes, compare_documents, compare_files, compare_page, compare_text,
    extract_bytes, extract_file, extract_pair, CompareOptions, Comparison, PageDiffResult,
    TextComparison,
};
pub use diff::{
    combine_stats, compute_stats, diff, diff_lines, diff_words, DiffFragment, DiffStats,
    FragmentKind, Granularity,
};
pub use error::{Error, Result, Side};
pub use model::{Document, GlyphRun, PageText};
pub use parser::{build_document, reconstruct_text, ExtractOptions, LopdfSource, PageSource};
pub use report::{ComparisonReport, JsonFormat};
pub use select::{parse_page_spec, PageSelection};
pub use validate::{format_file_size, is_pdf_magic};

use std::path::Path;

/// Extract the reconstructed text of a PDF file, pages separated by a blank line.
///
/// # Example
///
/// ```no_run
/// use pdfdiff::extract_text;
///
/// let text = extract_text("document.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = extract_file(path, &ExtractOptions::default())?;
    Ok(doc.plain_text())
}

/// Compare two PDF files and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use pdfdiff::{to_json, JsonFormat};
///
/// let json = to_json("v1.pdf", "v2.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("diff.json", json).unwrap();
/// ```
pub fn to_json<P, Q>(original: P, modified: Q, format: JsonFormat) -> Result<String>
where
    P: AsRef<Path> + Send,
    Q: AsRef<Path> + Send,
{
    let comparison = compare_files(
        original,
        modified,
        &ExtractOptions::default(),
        &CompareOptions::default(),
    )?;
    report::to_json(&ComparisonReport::new(&comparison), format)
}

/// Builder for extracting and comparing PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfdiff::{Granularity, PageSelection, PdfDiff};
///
/// let comparison = PdfDiff::new()
///     .with_granularity(Granularity::Line)
///     .with_pages(PageSelection::spec("1-3"))
///     .sequential()
///     .compare("v1.pdf", "v2.pdf")?;
/// println!("{} changes", comparison.stats.total_changes);
/// # Ok::<(), pdfdiff::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfDiff {
    extract_options: ExtractOptions,
    compare_options: CompareOptions,
}

impl PdfDiff {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diff granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.compare_options = self.compare_options.with_granularity(granularity);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.compare_options = self.compare_options.with_pages(pages);
        self
    }

    /// Disable parallel per-page diffing.
    pub fn sequential(mut self) -> Self {
        self.compare_options = self.compare_options.sequential();
        self
    }

    /// Skip input validation.
    pub fn unchecked(mut self) -> Self {
        self.extract_options = self.extract_options.unchecked();
        self
    }

    /// Set the maximum input size in bytes.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.extract_options = self.extract_options.with_max_file_size(bytes);
        self
    }

    /// Extraction options in effect.
    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract_options
    }

    /// Comparison options in effect.
    pub fn compare_options(&self) -> &CompareOptions {
        &self.compare_options
    }

    /// Extract both files concurrently.
    pub fn extract<P, Q>(&self, original: P, modified: Q) -> Result<(Document, Document)>
    where
        P: AsRef<Path> + Send,
        Q: AsRef<Path> + Send,
    {
        extract_pair(original, modified, &self.extract_options)
    }

    /// Extract and compare two PDF files page by page.
    pub fn compare<P, Q>(&self, original: P, modified: Q) -> Result<Comparison>
    where
        P: AsRef<Path> + Send,
        Q: AsRef<Path> + Send,
    {
        compare_files(
            original,
            modified,
            &self.extract_options,
            &self.compare_options,
        )
    }

    /// Extract and compare two in-memory PDFs page by page.
    pub fn compare_bytes(&self, original: &[u8], modified: &[u8]) -> Result<Comparison> {
        compare_bytes(
            original,
            modified,
            &self.extract_options,
            &self.compare_options,
        )
    }
}
