//! Diff engine and change statistics.
//!
//! [`diff`] aligns two texts at word or line granularity and returns tagged
//! fragments; [`compute_stats`] and [`combine_stats`] turn fragments into
//! word counts per page and across pages.

mod engine;
pub mod myers;
mod stats;
pub mod tokenize;

pub use engine::{
    diff, diff_lines, diff_words, filter_additions, filter_removals, has_changes,
    reconstruct_new, reconstruct_old, DiffFragment, FragmentKind, Granularity,
};
pub use stats::{combine_stats, compute_stats, word_count, DiffStats};
