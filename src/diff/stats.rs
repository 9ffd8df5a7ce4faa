//! Word-level change statistics.

use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::engine::{DiffFragment, FragmentKind};

/// Word counts of a diff and the share of words that changed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiffStats {
    /// Words only in the new text
    pub additions: usize,
    /// Words only in the old text
    pub deletions: usize,
    /// Words in both texts
    pub unchanged: usize,
    /// `additions + deletions`
    pub total_changes: usize,
    /// Changed words as a percentage of all words, in `[0, 100]`
    pub change_percentage: f64,
}

impl DiffStats {
    /// Build statistics from word counts, deriving the totals.
    pub fn from_counts(additions: usize, deletions: usize, unchanged: usize) -> Self {
        let total_changes = additions + deletions;
        Self {
            additions,
            deletions,
            unchanged,
            total_changes,
            change_percentage: percentage(total_changes, total_changes + unchanged),
        }
    }

    /// All words counted, changed or not.
    pub fn total_words(&self) -> usize {
        self.additions + self.deletions + self.unchanged
    }

    /// Whether any word was added or removed.
    pub fn has_changes(&self) -> bool {
        self.total_changes > 0
    }

    /// Sum a set of statistics and recompute the percentage from the sums.
    ///
    /// Per-item percentages are ignored, so pages with very different word
    /// counts are weighted by their words rather than averaged.
    pub fn combine<'a, I>(stats: I) -> Self
    where
        I: IntoIterator<Item = &'a DiffStats>,
    {
        stats.into_iter().copied().sum()
    }
}

impl Sum for DiffStats {
    fn sum<I: Iterator<Item = DiffStats>>(iter: I) -> Self {
        let mut combined = iter.fold(Self::default(), |mut acc, s| {
            acc.additions += s.additions;
            acc.deletions += s.deletions;
            acc.unchanged += s.unchanged;
            acc.total_changes += s.total_changes;
            acc
        });
        combined.change_percentage = percentage(combined.total_changes, combined.total_words());
        combined
    }
}

impl<'a> Sum<&'a DiffStats> for DiffStats {
    fn sum<I: Iterator<Item = &'a DiffStats>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Number of whitespace-separated words in a fragment value.
pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Compute word statistics for a fragment sequence.
pub fn compute_stats(fragments: &[DiffFragment]) -> DiffStats {
    let mut additions = 0;
    let mut deletions = 0;
    let mut unchanged = 0;

    for fragment in fragments {
        let words = word_count(&fragment.value);
        match fragment.kind {
            FragmentKind::Added => additions += words,
            FragmentKind::Removed => deletions += words,
            FragmentKind::Unchanged => unchanged += words,
        }
    }

    DiffStats::from_counts(additions, deletions, unchanged)
}

/// Combine per-page statistics into totals.
pub fn combine_stats(stats: &[DiffStats]) -> DiffStats {
    DiffStats::combine(stats)
}
