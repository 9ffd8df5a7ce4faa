//! Document assembly from a page source.

use crate::error::{Error, Result};
use crate::model::{Document, PageText};

use super::backend::PageSource;
use super::reconstruct::reconstruct_text;

/// Build a [`Document`] by reconstructing the text of every page in order.
///
/// Pages are processed sequentially. The first page that fails aborts the
/// build; its error is reported as an extraction error for that page and no
/// partial document is returned.
pub fn build_document<S: PageSource + ?Sized>(
    name: impl Into<String>,
    source: &S,
) -> Result<Document> {
    let name = name.into();
    let count = source.page_count();
    let mut pages = Vec::with_capacity(count as usize);

    for page_number in 1..=count {
        let runs = source
            .glyph_runs(page_number)
            .map_err(|e| page_error(page_number, e))?;
        let text = reconstruct_text(&runs);

        log::debug!(
            "{}: page {} -> {} runs, {} chars",
            name,
            page_number,
            runs.len(),
            text.len()
        );
        pages.push(PageText::new(page_number, text));
    }

    log::info!("Extracted {} pages from {}", count, name);
    Ok(Document::new(name, pages))
}

/// Attach the page number to errors that do not carry one yet.
fn page_error(page: u32, err: Error) -> Error {
    match err {
        Error::Extraction { .. } | Error::PageOutOfRange(..) | Error::Side { .. } => err,
        other => Error::extraction(page, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::model::GlyphRun;

    /// In-memory source: one run list per page, optionally failing on a page.
    struct MockSource {
        pages: Vec<Vec<GlyphRun>>,
        fail_on: Option<u32>,
        calls: Cell<u32>,
    }

    impl MockSource {
        fn new(pages: Vec<Vec<GlyphRun>>) -> Self {
            Self {
                pages,
                fail_on: None,
                calls: Cell::new(0),
            }
        }
    }

    impl PageSource for MockSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn glyph_runs(&self, page: u32) -> Result<Vec<GlyphRun>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_on == Some(page) {
                return Err(Error::PdfParse("corrupt stream".to_string()));
            }
            Ok(self.pages[(page - 1) as usize].clone())
        }
    }

    #[test]
    fn test_build_pages_in_order() {
        let source = MockSource::new(vec![
            vec![GlyphRun::new("First", 0.0, 20.0, 700.0)],
            vec![],
            vec![
                GlyphRun::new("Third", 0.0, 20.0, 700.0),
                GlyphRun::new("page", 25.0, 20.0, 700.0),
            ],
        ]);

        let doc = build_document("sample.pdf", &source).unwrap();
        assert_eq!(doc.name, "sample.pdf");
        assert_eq!(doc.total_pages, 3);
        assert_eq!(doc.pages[0], PageText::new(1, "First"));
        assert_eq!(doc.page_text(2), "");
        assert_eq!(doc.page_text(3), "Third page");
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn test_build_empty_source() {
        let doc = build_document("empty.pdf", &MockSource::new(vec![])).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.total_pages, 0);
    }

    #[test]
    fn test_build_aborts_on_failing_page() {
        let mut source = MockSource::new(vec![vec![], vec![], vec![]]);
        source.fail_on = Some(2);

        let err = build_document("broken.pdf", &source).unwrap_err();
        match err {
            Error::Extraction { page, message } => {
                assert_eq!(page, 2);
                assert!(message.contains("corrupt stream"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Page 3 is never requested
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_page_error_keeps_existing_page() {
        let err = page_error(5, Error::extraction(2, "bad"));
        assert!(matches!(err, Error::Extraction { page: 2, .. }));
    }
}
