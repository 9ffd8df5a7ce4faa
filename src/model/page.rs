//! Page-level types.

use serde::{Deserialize, Serialize};

/// Reconstructed text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Reading-order text of the page
    pub text: String,
}

impl PageText {
    /// Create a new page.
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }

    /// Check if the page carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of whitespace-separated words on the page.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
