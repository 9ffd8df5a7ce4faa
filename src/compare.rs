//! Document comparison.
//!
//! Pairs two extracted documents, diffs them page by page (or as a whole),
//! and aggregates the statistics. Extraction of the two inputs runs
//! concurrently.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diff::{compute_stats, diff, DiffFragment, DiffStats, Granularity};
use crate::error::{Result, Side};
use crate::model::Document;
use crate::parser::{build_document, ExtractOptions, LopdfSource};
use crate::select::PageSelection;
use crate::validate::{validate_bytes, validate_path};

/// Options for comparing two documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Tokenization unit of the diff
    pub granularity: Granularity,

    /// Pages to compare
    pub pages: PageSelection,

    /// Diff pages on the rayon thread pool
    pub parallel: bool,
}

impl CompareOptions {
    /// Create new compare options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diff granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Word,
            pages: PageSelection::All,
            parallel: true,
        }
    }
}

/// Diff of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDiffResult {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Diff fragments of the page
    pub fragments: Vec<DiffFragment>,
    /// Word statistics of the page
    pub stats: DiffStats,
}

impl PageDiffResult {
    /// Whether anything on the page changed.
    pub fn has_changes(&self) -> bool {
        self.stats.has_changes() || self.fragments.iter().any(|f| !f.is_unchanged())
    }
}

/// Result of comparing two documents over a page selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Name of the original document
    pub original_name: String,
    /// Name of the modified document
    pub modified_name: String,
    /// Page count of the longer document
    pub total_pages: u32,
    /// Tokenization unit used
    pub granularity: Granularity,
    /// Per-page results in ascending page order
    pub pages: Vec<PageDiffResult>,
    /// Statistics combined across the compared pages
    pub stats: DiffStats,
}

impl Comparison {
    /// Pages with at least one change.
    pub fn changed_pages(&self) -> impl Iterator<Item = &PageDiffResult> {
        self.pages.iter().filter(|p| p.has_changes())
    }

    /// Whether any compared page changed.
    pub fn has_changes(&self) -> bool {
        self.changed_pages().next().is_some()
    }
}

/// Whole-document diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextComparison {
    /// Diff fragments of the full text
    pub fragments: Vec<DiffFragment>,
    /// Word statistics of the full text
    pub stats: DiffStats,
}

/// Compare one page of two documents.
///
/// A page missing from either document compares as empty text.
pub fn compare_page(
    original: &Document,
    modified: &Document,
    page_number: u32,
    granularity: Granularity,
) -> PageDiffResult {
    let fragments = diff(
        original.page_text(page_number),
        modified.page_text(page_number),
        granularity,
    );
    let stats = compute_stats(&fragments);

    log::debug!(
        "page {}: +{} -{} ={}",
        page_number,
        stats.additions,
        stats.deletions,
        stats.unchanged
    );

    PageDiffResult {
        page_number,
        fragments,
        stats,
    }
}

/// Compare two documents page by page.
///
/// The page selection is resolved against the longer document. With
/// `parallel` set, pages are diffed on the rayon pool; results keep page
/// order either way.
pub fn compare_documents(
    original: &Document,
    modified: &Document,
    options: &CompareOptions,
) -> Comparison {
    let total_pages = original.total_pages.max(modified.total_pages);
    let page_numbers = options.pages.resolve(total_pages);
    let granularity = options.granularity;

    let pages: Vec<PageDiffResult> = if options.parallel {
        page_numbers
            .par_iter()
            .map(|&n| compare_page(original, modified, n, granularity))
            .collect()
    } else {
        page_numbers
            .iter()
            .map(|&n| compare_page(original, modified, n, granularity))
            .collect()
    };

    let stats: DiffStats = pages.iter().map(|p| &p.stats).sum();

    log::info!(
        "Compared {} of {} pages: {} changes ({:.2}%)",
        pages.len(),
        total_pages,
        stats.total_changes,
        stats.change_percentage
    );

    Comparison {
        original_name: original.name.clone(),
        modified_name: modified.name.clone(),
        total_pages,
        granularity,
        pages,
        stats,
    }
}

/// Compare the full text of two documents in a single diff.
///
/// Unlike summing per-page statistics, text moving across a page boundary
/// is aligned here.
pub fn compare_text(
    original: &Document,
    modified: &Document,
    granularity: Granularity,
) -> TextComparison {
    let fragments = diff(&original.plain_text(), &modified.plain_text(), granularity);
    let stats = compute_stats(&fragments);
    TextComparison { fragments, stats }
}

/// Extract a document from a PDF file.
///
/// The document is named after the file name.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Document> {
    let path = path.as_ref();
    let path = if options.validate {
        validate_path(path, options.max_file_size)?
    } else {
        path.to_path_buf()
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let source = LopdfSource::load_file(&path)?;
    build_document(name, &source)
}

/// Extract a document from PDF bytes.
pub fn extract_bytes(
    name: impl Into<String>,
    data: &[u8],
    options: &ExtractOptions,
) -> Result<Document> {
    if options.validate {
        validate_bytes(data, options.max_file_size)?;
    }
    let source = LopdfSource::load_bytes(data)?;
    build_document(name, &source)
}

/// Extract both inputs concurrently.
///
/// Errors are attributed to the side they came from; when both fail, the
/// original's error is returned.
pub fn extract_pair<P, Q>(
    original: P,
    modified: Q,
    options: &ExtractOptions,
) -> Result<(Document, Document)>
where
    P: AsRef<Path> + Send,
    Q: AsRef<Path> + Send,
{
    let (original, modified) = rayon::join(
        || extract_file(original, options),
        || extract_file(modified, options),
    );
    join_sides(original, modified)
}

fn join_sides(
    original: Result<Document>,
    modified: Result<Document>,
) -> Result<(Document, Document)> {
    let original = original.map_err(|e| e.with_side(Side::Original))?;
    let modified = modified.map_err(|e| e.with_side(Side::Modified))?;
    Ok((original, modified))
}

/// Extract and compare two PDF files.
pub fn compare_files<P, Q>(
    original: P,
    modified: Q,
    extract: &ExtractOptions,
    options: &CompareOptions,
) -> Result<Comparison>
where
    P: AsRef<Path> + Send,
    Q: AsRef<Path> + Send,
{
    let (original, modified) = extract_pair(original, modified, extract)?;
    Ok(compare_documents(&original, &modified, options))
}

/// Extract and compare two in-memory PDFs.
pub fn compare_bytes(
    original: &[u8],
    modified: &[u8],
    extract: &ExtractOptions,
    options: &CompareOptions,
) -> Result<Comparison> {
    let (original, modified) = rayon::join(
        || extract_bytes("original", original, extract),
        || extract_bytes("modified", modified, extract),
    );
    let (original, modified) = join_sides(original, modified)?;
    Ok(compare_documents(&original, &modified, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::PageText;

    fn doc(name: &str, pages: &[&str]) -> Document {
        Document::new(
            name,
            pages
                .iter()
                .enumerate()
                .map(|(i, text)| PageText::new(i as u32 + 1, *text))
                .collect(),
        )
    }

    #[test]
    fn test_compare_options_builder() {
        let options = CompareOptions::new()
            .with_granularity(Granularity::Line)
            .with_pages(PageSelection::spec("1-2"))
            .sequential();
        assert_eq!(options.granularity, Granularity::Line);
        assert_eq!(options.pages, PageSelection::Spec("1-2".to_string()));
        assert!(!options.parallel);
        assert!(CompareOptions::default().parallel);
    }

    #[test]
    fn test_compare_page() {
        let a = doc("a", &["The fee is $100."]);
        let b = doc("b", &["The fee is $150."]);
        let result = compare_page(&a, &b, 1, Granularity::Word);
        assert_eq!(result.page_number, 1);
        assert_eq!(result.stats.additions, 1);
        assert_eq!(result.stats.deletions, 1);
        assert_eq!(result.stats.unchanged, 3);
        assert!(result.has_changes());
    }

    #[test]
    fn test_missing_page_is_empty() {
        let a = doc("a", &["one", "two words"]);
        let b = doc("b", &["one"]);
        let result = compare_page(&a, &b, 2, Granularity::Word);
        assert_eq!(result.fragments, vec![DiffFragment::removed("two words")]);
        assert_eq!(result.stats.deletions, 2);
    }

    #[test]
    fn test_compare_documents_all_pages() {
        let a = doc("a.pdf", &["same", "old text"]);
        let b = doc("b.pdf", &["same", "new text", "extra page"]);

        let comparison = compare_documents(&a, &b, &CompareOptions::default());
        assert_eq!(comparison.original_name, "a.pdf");
        assert_eq!(comparison.modified_name, "b.pdf");
        assert_eq!(comparison.total_pages, 3);
        assert_eq!(
            comparison.pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(!comparison.pages[0].has_changes());
        assert_eq!(comparison.changed_pages().count(), 2);

        // 1 + 1 unchanged, "old"/"new" swapped, 2 added on page 3
        assert_eq!(comparison.stats.unchanged, 2);
        assert_eq!(comparison.stats.additions, 3);
        assert_eq!(comparison.stats.deletions, 1);
        assert!((comparison.stats.change_percentage - 4.0 / 6.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let a = doc("a", &["alpha beta", "gamma", "delta epsilon", "zeta"]);
        let b = doc("b", &["alpha", "gamma eta", "delta epsilon", ""]);
        let parallel = compare_documents(&a, &b, &CompareOptions::new());
        let sequential = compare_documents(&a, &b, &CompareOptions::new().sequential());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_compare_documents_page_selection() {
        let a = doc("a", &["1", "2", "3", "4"]);
        let b = doc("b", &["1", "two", "3", "four"]);

        let options = CompareOptions::new().with_pages(PageSelection::spec("4,2,9"));
        let comparison = compare_documents(&a, &b, &options);
        assert_eq!(
            comparison.pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(comparison.stats.total_changes, 4);

        let options = CompareOptions::new().with_pages(PageSelection::spec(""));
        let comparison = compare_documents(&a, &b, &options);
        assert!(comparison.pages.is_empty());
        assert_eq!(comparison.stats, DiffStats::default());
    }

    #[test]
    fn test_compare_empty_documents() {
        let comparison = compare_documents(
            &Document::empty("a"),
            &Document::empty("b"),
            &CompareOptions::default(),
        );
        assert_eq!(comparison.total_pages, 0);
        assert!(comparison.pages.is_empty());
        assert!(!comparison.has_changes());
    }

    #[test]
    fn test_compare_text_across_pages() {
        let a = doc("a", &["one two", "three"]);
        let b = doc("b", &["one", "two three"]);

        let whole = compare_text(&a, &b, Granularity::Word);
        let per_page = compare_documents(&a, &b, &CompareOptions::default());

        // Same words, only the page break moved
        assert_eq!(whole.stats.unchanged, 3);
        assert_eq!(whole.stats.total_changes, 0);
        assert!(per_page.stats.total_changes > 0);
    }

    #[test]
    fn test_join_sides_prefers_original_error() {
        let err = join_sides(
            Err(Error::extraction(1, "left")),
            Err(Error::extraction(2, "right")),
        )
        .unwrap_err();
        assert_eq!(err.side(), Some(Side::Original));

        let err = join_sides(Ok(Document::empty("a")), Err(Error::Encrypted)).unwrap_err();
        assert_eq!(err.side(), Some(Side::Modified));
        assert!(err.to_string().starts_with("Failed to process the modified PDF"));
    }

    #[test]
    fn test_extract_bytes_rejects_non_pdf() {
        let err = extract_bytes("x", b"GIF89a", &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }

    #[test]
    fn test_compare_bytes_attributes_side() {
        let err = compare_bytes(
            b"%PDF-1.4 garbage",
            b"not a pdf",
            &ExtractOptions::default(),
            &CompareOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.side(), Some(Side::Original));
    }
}
