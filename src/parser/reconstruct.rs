//! Reading-order text from positioned glyph runs.

use crate::model::GlyphRun;

/// Vertical distance between consecutive runs above which a line break is
/// emitted. Heuristic, in device units.
pub const LINE_BREAK_THRESHOLD: f32 = 5.0;

/// Horizontal gap between the end of a run and the start of the next above
/// which a space is emitted. Heuristic, in device units.
pub const WORD_GAP_THRESHOLD: f32 = 2.0;

/// Rebuild a page's text from its glyph runs, in extraction order.
///
/// A `'\n'` is inserted before a run whose baseline moved more than
/// [`LINE_BREAK_THRESHOLD`] from the previous run, and a single space after
/// a run followed by a gap wider than [`WORD_GAP_THRESHOLD`]. Runs are never
/// reordered, so multi-column pages come out in the order the text layer
/// produced them.
///
/// Non-finite coordinates never panic: comparisons involving NaN are false,
/// so no break or space is emitted for them.
///
/// # Example
///
/// ```
/// use pdfdiff::{reconstruct_text, GlyphRun};
///
/// let runs = vec![
///     GlyphRun::new("Hello", 0.0, 25.0, 700.0),
///     GlyphRun::new("world", 28.0, 25.0, 700.0),
///     GlyphRun::new("Next", 0.0, 20.0, 686.0),
/// ];
/// assert_eq!(reconstruct_text(&runs), "Hello world\nNext");
/// ```
pub fn reconstruct_text(runs: &[GlyphRun]) -> String {
    let mut text = String::new();
    let mut last_y: Option<f32> = None;

    for (i, run) in runs.iter().enumerate() {
        if let Some(y) = last_y {
            if (run.y - y).abs() > LINE_BREAK_THRESHOLD {
                text.push('\n');
            }
        }
        last_y = Some(run.y);

        text.push_str(&run.text);

        if let Some(next) = runs.get(i + 1) {
            if next.x - run.right() > WORD_GAP_THRESHOLD {
                text.push(' ');
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(reconstruct_text(&[]), "");
    }

    #[test]
    fn test_single_run() {
        let runs = [GlyphRun::new("alone", 10.0, 30.0, 10.0)];
        assert_eq!(reconstruct_text(&runs), "alone");
    }

    #[test]
    fn test_gap_inserts_space() {
        let runs = [
            GlyphRun::new("Hello", 0.0, 10.0, 100.0),
            GlyphRun::new("World", 13.0, 10.0, 100.0),
        ];
        assert_eq!(reconstruct_text(&runs), "Hello World");
    }

    #[test]
    fn test_small_gap_joins() {
        let runs = [GlyphRun::new("Hel", 0.0, 10.0, 100.0), GlyphRun::new("lo", 11.5, 5.0, 100.0)];
        assert_eq!(reconstruct_text(&runs), "Hello");

        // Exactly at the threshold is not a gap
        let runs = [GlyphRun::new("a", 0.0, 10.0, 100.0), GlyphRun::new("b", 12.0, 5.0, 100.0)];
        assert_eq!(reconstruct_text(&runs), "ab");
    }

    #[test]
    fn test_vertical_move_inserts_break() {
        let runs = [
            GlyphRun::new("Line1", 0.0, 10.0, 100.0),
            GlyphRun::new("Line2", 0.0, 10.0, 94.0),
        ];
        assert_eq!(reconstruct_text(&runs), "Line1\nLine2");

        // Small baseline jitter stays on the line
        let runs = [GlyphRun::new("x", 0.0, 10.0, 100.0), GlyphRun::new("2", 10.0, 4.0, 104.0)];
        assert_eq!(reconstruct_text(&runs), "x2");
    }

    #[test]
    fn test_break_and_gap_together() {
        // Next line starts to the right of the previous run's end
        let runs = [
            GlyphRun::new("first", 0.0, 20.0, 100.0),
            GlyphRun::new("second", 40.0, 20.0, 80.0),
        ];
        assert_eq!(reconstruct_text(&runs), "first \nsecond");
    }

    #[test]
    fn test_upward_move_breaks_too() {
        let runs = [
            GlyphRun::new("below", 0.0, 20.0, 50.0),
            GlyphRun::new("above", 0.0, 20.0, 90.0),
        ];
        assert_eq!(reconstruct_text(&runs), "below\nabove");
    }

    #[test]
    fn test_non_finite_coordinates() {
        let runs = [
            GlyphRun::new("a", f32::NAN, 1.0, 100.0),
            GlyphRun::new("b", f32::NAN, 1.0, f32::NAN),
            GlyphRun::new("c", 0.0, f32::NAN, f32::INFINITY),
        ];
        assert_eq!(reconstruct_text(&runs), "abc");
    }
}
