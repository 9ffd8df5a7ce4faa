//! Document-level types.

use super::PageText;
use serde::{Deserialize, Serialize};

/// An extracted document: a name and its pages in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name (usually the file name)
    pub name: String,

    /// Pages in the document
    pub pages: Vec<PageText>,

    /// Total number of pages, always `pages.len()`
    pub total_pages: u32,
}

impl Document {
    /// Create a document from pages in order.
    pub fn new(name: impl Into<String>, pages: Vec<PageText>) -> Self {
        let total_pages = pages.len() as u32;
        Self {
            name: name.into(),
            pages,
            total_pages,
        }
    }

    /// Create a document with no pages.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.total_pages
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, page_num: u32) -> Option<&PageText> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Text of a page, or an empty string when the page does not exist.
    pub fn page_text(&self, page_num: u32) -> &str {
        self.page(page_num).map(|p| p.text.as_str()).unwrap_or("")
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total number of words across all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(PageText::word_count).sum()
    }
}
