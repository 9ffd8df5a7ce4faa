//! JSON reports of a comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compare::{Comparison, PageDiffResult};
use crate::diff::{DiffStats, Granularity};
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serializable summary of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Name of the original document
    pub original: String,
    /// Name of the modified document
    pub modified: String,
    /// Page count of the longer document
    pub total_pages: u32,
    /// Tokenization unit used
    pub granularity: Granularity,
    /// Statistics across all compared pages
    pub stats: DiffStats,
    /// Per-page results
    pub pages: Vec<PageDiffResult>,
}

impl ComparisonReport {
    /// Build a report stamped with the current time.
    pub fn new(comparison: &Comparison) -> Self {
        Self::at(comparison, Utc::now())
    }

    /// Build a report with an explicit timestamp.
    pub fn at(comparison: &Comparison, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            original: comparison.original_name.clone(),
            modified: comparison.modified_name.clone(),
            total_pages: comparison.total_pages,
            granularity: comparison.granularity,
            stats: comparison.stats,
            pages: comparison.pages.clone(),
        }
    }
}

impl From<&Comparison> for ComparisonReport {
    fn from(comparison: &Comparison) -> Self {
        Self::new(comparison)
    }
}

/// Convert a report to JSON.
pub fn to_json(report: &ComparisonReport, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(report),
        JsonFormat::Compact => serde_json::to_string(report),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::compare::{compare_documents, CompareOptions};
    use crate::model::{Document, PageText};

    fn comparison() -> Comparison {
        let a = Document::new("v1.pdf", vec![PageText::new(1, "Hello world")]);
        let b = Document::new("v2.pdf", vec![PageText::new(1, "Hello there")]);
        compare_documents(&a, &b, &CompareOptions::default())
    }

    #[test]
    fn test_report_fields() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = ComparisonReport::at(&comparison(), when);
        assert_eq!(report.original, "v1.pdf");
        assert_eq!(report.modified, "v2.pdf");
        assert_eq!(report.total_pages, 1);
        assert_eq!(report.stats.total_changes, 2);
        assert_eq!(report.pages.len(), 1);
    }

    #[test]
    fn test_to_json_pretty() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = ComparisonReport::at(&comparison(), when);

        let json = to_json(&report, JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"generated_at\": \"2024-05-01T12:00:00Z\""));
        assert!(json.contains("\"granularity\": \"word\""));
        assert!(json.contains("\"removed\": true"));
    }

    #[test]
    fn test_to_json_compact() {
        let report = ComparisonReport::from(&comparison());
        let json = to_json(&report, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["additions"], 1);
        assert_eq!(value["pages"][0]["page_number"], 1);
        assert_eq!(value["pages"][0]["fragments"][0]["value"], "Hello ");
    }

    #[test]
    fn test_report_round_trip() {
        let report = ComparisonReport::from(&comparison());
        let json = to_json(&report, JsonFormat::Compact).unwrap();
        let parsed: ComparisonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
