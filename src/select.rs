//! Page selection for range-limited comparisons.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Parse a page specification such as `"1,3,5-8"`.
///
/// Returns the selected pages in ascending order, without duplicates, limited
/// to `1..=max_pages`. Parsing is lenient: tokens that are neither an integer
/// nor an `start-end` range are ignored, as are out-of-range pages. Ranges
/// are clamped to the document; a range whose start exceeds its end selects
/// nothing.
///
/// # Example
///
/// ```
/// use pdfdiff::parse_page_spec;
///
/// assert_eq!(parse_page_spec("1,3,5-8", 10), vec![1, 3, 5, 6, 7, 8]);
/// assert_eq!(parse_page_spec("5-8", 6), vec![5, 6]);
/// assert!(parse_page_spec("", 10).is_empty());
/// ```
pub fn parse_page_spec(spec: &str, max_pages: u32) -> Vec<u32> {
    let max = i64::from(max_pages);
    let mut pages = BTreeSet::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>())
            else {
                log::debug!("Ignoring invalid page range {:?}", part);
                continue;
            };
            for page in start.max(1)..=end.min(max) {
                pages.insert(page as u32);
            }
        } else {
            match part.parse::<i64>() {
                Ok(page) if (1..=max).contains(&page) => {
                    pages.insert(page as u32);
                }
                _ => log::debug!("Ignoring page {:?} (document has {} pages)", part, max_pages),
            }
        }
    }

    pages.into_iter().collect()
}

/// Which pages a comparison covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// A page specification, resolved once the page count is known
    Spec(String),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Selection from a page specification string.
    pub fn spec(spec: impl Into<String>) -> Self {
        PageSelection::Spec(spec.into())
    }

    /// Resolve the selection against a document length.
    ///
    /// The result is sorted, deduplicated and within `1..=max_pages`.
    pub fn resolve(&self, max_pages: u32) -> Vec<u32> {
        match self {
            PageSelection::All => (1..=max_pages).collect(),
            PageSelection::Spec(spec) => parse_page_spec(spec, max_pages),
            PageSelection::Pages(pages) => pages
                .iter()
                .copied()
                .filter(|p| (1..=max_pages).contains(p))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// Check if a page number should be included in a document of
    /// `max_pages` pages.
    pub fn includes(&self, page: u32, max_pages: u32) -> bool {
        match self {
            PageSelection::All => (1..=max_pages).contains(&page),
            PageSelection::Spec(_) => self.resolve(max_pages).contains(&page),
            PageSelection::Pages(pages) => {
                (1..=max_pages).contains(&page) && pages.contains(&page)
            }
        }
    }

    /// Whether every page is selected.
    pub fn is_all(&self) -> bool {
        matches!(self, PageSelection::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed() {
        assert_eq!(parse_page_spec("1,3,5-8", 10), vec![1, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_parse_clamps_range_to_document() {
        assert_eq!(parse_page_spec("5-8", 6), vec![5, 6]);
        assert_eq!(parse_page_spec("0-2", 6), vec![1, 2]);
        assert!(parse_page_spec("8-10", 6).is_empty());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_page_spec("", 10).is_empty());
        assert!(parse_page_spec(" , ,", 10).is_empty());
        assert!(parse_page_spec("1-3", 0).is_empty());
    }

    #[test]
    fn test_parse_dedup_and_sort() {
        assert_eq!(parse_page_spec("7, 2-4, 3, 1-2", 10), vec![1, 2, 3, 4, 7]);
    }

    #[test]
    fn test_parse_ignores_invalid_tokens() {
        assert_eq!(parse_page_spec("abc,2,x-4,4-,0,11,-3", 10), vec![2]);
        assert!(parse_page_spec("5-3", 10).is_empty());
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse_page_spec("  2 ,  4 - 5 ", 10), vec![2, 4, 5]);
    }

    #[test]
    fn test_selection_resolve() {
        assert_eq!(PageSelection::All.resolve(3), vec![1, 2, 3]);
        assert!(PageSelection::All.resolve(0).is_empty());
        assert_eq!(PageSelection::spec("2-9").resolve(4), vec![2, 3, 4]);
        assert_eq!(
            PageSelection::Pages(vec![5, 1, 1, 0, 3]).resolve(4),
            vec![1, 3]
        );
    }

    #[test]
    fn test_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1, 10));
        assert!(!all.includes(11, 10));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1, 10));
        assert!(!pages.includes(2, 10));
        assert!(!pages.includes(7, 5));

        let spec = PageSelection::spec("2-3");
        assert!(spec.includes(3, 10));
        assert!(!spec.includes(4, 10));
    }
}
