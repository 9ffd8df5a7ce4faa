//! Fragment-level diff between two texts.

use serde::{Deserialize, Serialize};

use super::myers::{edit_script, Edit};
use super::tokenize::tokenize;

/// Tokenization unit used by the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Words and the whitespace between them
    #[default]
    Word,
    /// Lines including their terminator
    Line,
}

/// Classification of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentKind {
    /// Present in both texts
    #[default]
    Unchanged,
    /// Only in the new text
    Added,
    /// Only in the old text
    Removed,
}

/// A tagged span of diff output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawFragment", try_from = "RawFragment")]
pub struct DiffFragment {
    /// Text of the span, whitespace included
    pub value: String,
    /// How the span changed
    pub kind: FragmentKind,
}

impl DiffFragment {
    /// Create a fragment.
    pub fn new(value: impl Into<String>, kind: FragmentKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// Create an unchanged fragment.
    pub fn unchanged(value: impl Into<String>) -> Self {
        Self::new(value, FragmentKind::Unchanged)
    }

    /// Create an added fragment.
    pub fn added(value: impl Into<String>) -> Self {
        Self::new(value, FragmentKind::Added)
    }

    /// Create a removed fragment.
    pub fn removed(value: impl Into<String>) -> Self {
        Self::new(value, FragmentKind::Removed)
    }

    /// Whether the span only exists in the new text.
    pub fn is_added(&self) -> bool {
        self.kind == FragmentKind::Added
    }

    /// Whether the span only exists in the old text.
    pub fn is_removed(&self) -> bool {
        self.kind == FragmentKind::Removed
    }

    /// Whether the span exists in both texts.
    pub fn is_unchanged(&self) -> bool {
        self.kind == FragmentKind::Unchanged
    }
}

/// Wire shape of a fragment: `{ value, added, removed }`.
#[derive(Serialize, Deserialize)]
struct RawFragment {
    value: String,
    #[serde(default)]
    added: bool,
    #[serde(default)]
    removed: bool,
}

impl From<DiffFragment> for RawFragment {
    fn from(fragment: DiffFragment) -> Self {
        Self {
            added: fragment.is_added(),
            removed: fragment.is_removed(),
            value: fragment.value,
        }
    }
}

impl TryFrom<RawFragment> for DiffFragment {
    type Error = String;

    fn try_from(raw: RawFragment) -> std::result::Result<Self, Self::Error> {
        let kind = match (raw.added, raw.removed) {
            (false, false) => FragmentKind::Unchanged,
            (true, false) => FragmentKind::Added,
            (false, true) => FragmentKind::Removed,
            (true, true) => {
                return Err("a fragment cannot be both added and removed".to_string());
            }
        };
        Ok(Self::new(raw.value, kind))
    }
}

/// Compute the diff between two texts.
///
/// Unchanged spans are merged into single fragments. Every changed region is
/// a removed fragment followed by an added fragment (either may be absent),
/// never interleaved. Dropping the added fragments reproduces `old`;
/// dropping the removed fragments reproduces `new`.
///
/// # Example
///
/// ```
/// use pdfdiff::diff::{diff, Granularity};
///
/// let fragments = diff("Hello world", "Hello there", Granularity::Word);
/// assert_eq!(fragments.len(), 3);
/// assert!(fragments[1].is_removed());
/// assert_eq!(fragments[2].value, "there");
/// ```
pub fn diff(old: &str, new: &str, granularity: Granularity) -> Vec<DiffFragment> {
    let old_tokens = tokenize(old, granularity);
    let new_tokens = tokenize(new, granularity);
    let edits = edit_script(&old_tokens, &new_tokens);

    log::trace!(
        "diff: {} old tokens, {} new tokens, {} edits",
        old_tokens.len(),
        new_tokens.len(),
        edits.len()
    );

    let mut fragments = Vec::new();
    let mut unchanged = String::new();
    let mut removed = String::new();
    let mut added = String::new();
    let (mut i, mut j) = (0, 0);

    for edit in edits {
        match edit {
            Edit::Equal => {
                flush_change(&mut fragments, &mut removed, &mut added);
                unchanged.push_str(old_tokens[i]);
                i += 1;
                j += 1;
            }
            Edit::Delete => {
                flush_unchanged(&mut fragments, &mut unchanged);
                removed.push_str(old_tokens[i]);
                i += 1;
            }
            Edit::Insert => {
                flush_unchanged(&mut fragments, &mut unchanged);
                added.push_str(new_tokens[j]);
                j += 1;
            }
        }
    }
    flush_change(&mut fragments, &mut removed, &mut added);
    flush_unchanged(&mut fragments, &mut unchanged);

    fragments
}

fn flush_unchanged(fragments: &mut Vec<DiffFragment>, unchanged: &mut String) {
    if !unchanged.is_empty() {
        fragments.push(DiffFragment::unchanged(std::mem::take(unchanged)));
    }
}

fn flush_change(fragments: &mut Vec<DiffFragment>, removed: &mut String, added: &mut String) {
    if !removed.is_empty() {
        fragments.push(DiffFragment::removed(std::mem::take(removed)));
    }
    if !added.is_empty() {
        fragments.push(DiffFragment::added(std::mem::take(added)));
    }
}

/// Word-granularity diff.
pub fn diff_words(old: &str, new: &str) -> Vec<DiffFragment> {
    diff(old, new, Granularity::Word)
}

/// Line-granularity diff.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffFragment> {
    diff(old, new, Granularity::Line)
}

/// Keep only the added fragments.
pub fn filter_additions(fragments: &[DiffFragment]) -> Vec<DiffFragment> {
    fragments.iter().filter(|f| f.is_added()).cloned().collect()
}

/// Keep only the removed fragments.
pub fn filter_removals(fragments: &[DiffFragment]) -> Vec<DiffFragment> {
    fragments.iter().filter(|f| f.is_removed()).cloned().collect()
}

/// Whether any fragment was added or removed.
pub fn has_changes(fragments: &[DiffFragment]) -> bool {
    fragments.iter().any(|f| !f.is_unchanged())
}

/// Rebuild the old text from a fragment sequence.
pub fn reconstruct_old(fragments: &[DiffFragment]) -> String {
    fragments
        .iter()
        .filter(|f| !f.is_added())
        .map(|f| f.value.as_str())
        .collect()
}

/// Rebuild the new text from a fragment sequence.
pub fn reconstruct_new(fragments: &[DiffFragment]) -> String {
    fragments
        .iter()
        .filter(|f| !f.is_removed())
        .map(|f| f.value.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(old: &str, new: &str, granularity: Granularity) {
        let fragments = diff(old, new, granularity);
        assert_eq!(reconstruct_old(&fragments), old, "old side of {:?}", fragments);
        assert_eq!(reconstruct_new(&fragments), new, "new side of {:?}", fragments);
    }

    #[test]
    fn test_identical_text_is_one_fragment() {
        let fragments = diff_words("Same text", "Same text");
        assert_eq!(fragments, vec![DiffFragment::unchanged("Same text")]);
        assert!(!has_changes(&fragments));

        assert!(diff_words("", "").is_empty());
        assert_eq!(
            diff_lines("a\nb\n", "a\nb\n"),
            vec![DiffFragment::unchanged("a\nb\n")]
        );
    }

    #[test]
    fn test_added_words() {
        let fragments = diff_words("Hello", "Hello World");
        assert_eq!(
            fragments,
            vec![
                DiffFragment::unchanged("Hello"),
                DiffFragment::added(" World"),
            ]
        );
    }

    #[test]
    fn test_removed_words() {
        let fragments = diff_words("Hello World", "Hello");
        assert!(fragments.iter().any(|f| f.is_removed()));
        assert!(fragments.iter().all(|f| !f.is_added()));
    }

    #[test]
    fn test_replacement_is_removed_then_added() {
        let fragments = diff_words("the quick brown fox", "the slow brown fox");
        assert_eq!(
            fragments,
            vec![
                DiffFragment::unchanged("the "),
                DiffFragment::removed("quick"),
                DiffFragment::added("slow"),
                DiffFragment::unchanged(" brown fox"),
            ]
        );
    }

    #[test]
    fn test_line_diff() {
        let fragments = diff_lines("Line 1\nLine 2", "Line 1\nLine 2\nLine 3");
        assert!(fragments.iter().any(|f| f.is_added()));
        assert_round_trip("Line 1\nLine 2", "Line 1\nLine 2\nLine 3", Granularity::Line);

        let fragments = diff_lines("Line 1\nLine 2\nLine 3", "Line 1\nLine 2");
        assert!(fragments.iter().any(|f| f.is_removed()));
        assert_eq!(fragments[0], DiffFragment::unchanged("Line 1\n"));
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            ("", "something new"),
            ("something old", ""),
            ("  leading and trailing  ", "leading\tand  trailing\n"),
            ("a b c d e f", "f e d c b a"),
            ("Section 1\n\nThe fee is $100.", "Section 1\n\nThe fee is $150 per month."),
        ];
        for (old, new) in cases {
            assert_round_trip(old, new, Granularity::Word);
            assert_round_trip(old, new, Granularity::Line);
        }
    }

    fn all_strings(alphabet: &[&str], max_len: usize) -> Vec<String> {
        let mut strings = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|s| alphabet.iter().map(move |c| format!("{}{}", s, c)))
                .collect();
            strings.extend(frontier.iter().cloned());
        }
        strings
    }

    #[test]
    fn test_round_trip_exhaustive_small_alphabet() {
        let strings = all_strings(&["a", " ", "b", "\n"], 4);
        assert_eq!(strings.len(), 341);

        for granularity in [Granularity::Word, Granularity::Line] {
            for old in &strings {
                for new in &strings {
                    let fragments = diff(old, new, granularity);
                    assert_eq!(&reconstruct_old(&fragments), old);
                    assert_eq!(&reconstruct_new(&fragments), new);
                    assert!(fragments.iter().all(|f| !f.value.is_empty()));
                    assert_eq!(has_changes(&fragments), old != new);

                    for pair in fragments.windows(2) {
                        assert_ne!(pair[0].kind, pair[1].kind);
                        assert!(!(pair[0].is_added() && pair[1].is_removed()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_empty_fragments() {
        let fragments = diff_words("one two three", "zero one three four");
        assert!(fragments.iter().all(|f| !f.value.is_empty()));
    }

    #[test]
    fn test_filters() {
        let fragments = vec![
            DiffFragment::unchanged("kept"),
            DiffFragment::added("added"),
            DiffFragment::removed("removed"),
        ];
        let additions = filter_additions(&fragments);
        assert_eq!(additions.len(), 1);
        assert_eq!(additions[0].value, "added");

        let removals = filter_removals(&fragments);
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].value, "removed");

        assert!(has_changes(&fragments));
        assert!(filter_additions(&fragments[2..]).is_empty());
    }

    #[test]
    fn test_fragment_serde_shape() {
        let json = serde_json::to_string(&DiffFragment::added("new")).unwrap();
        assert_eq!(json, r#"{"value":"new","added":true,"removed":false}"#);

        let parsed: DiffFragment = serde_json::from_str(r#"{"value":"kept"}"#).unwrap();
        assert!(parsed.is_unchanged());

        let invalid = serde_json::from_str::<DiffFragment>(
            r#"{"value":"x","added":true,"removed":true}"#,
        );
        assert!(invalid.is_err());
    }
}
