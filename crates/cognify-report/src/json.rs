//! JSON report generation.
//!
//! [`JsonGenerator`] serializes a [`ProfileReport`] as compact single-line JSON
//! or pretty-printed for people.
//!
//! # Example
//!
//! ```rust
//! use cognify_report::ProfileReport;
//! use cognify_report::json::JsonGenerator;
//!
//! let report = ProfileReport::builder().learner_name("Ada").build().unwrap();
//! let generator = JsonGenerator::new(&report);
//!
//! let compact = generator.generate().unwrap();
//! assert!(!compact.contains('\n'));
//!
//! // generator.write_to_file(Path::new("cognify-report.json"), true).unwrap();
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{ProfileReport, ReportError, Result};

/// JSON report generator.
pub struct JsonGenerator<'a> {
    report: &'a ProfileReport,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given report.
    #[must_use]
    pub const fn new(report: &'a ProfileReport) -> Self {
        Self { report }
    }

    /// Generates compact JSON output (single line, no extra whitespace).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.report).map_err(ReportError::from)
    }

    /// Generates pretty-printed JSON output with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.report).map_err(ReportError::from)
    }

    /// Writes the JSON report to `path`, replacing any existing file.
    ///
    /// Parent directories must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    /// Returns [`ReportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{QuizRecord, XpSnapshot};
    use chrono::TimeZone;
    use std::io::Read;

    fn sample_report() -> ProfileReport {
        let at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ProfileReport::builder()
            .learner_name("Ada")
            .generated_at(at)
            .xp(XpSnapshot {
                level: 2,
                current_xp: 10,
                xp_to_next_level: 200,
            })
            .quiz(QuizRecord::at_time(at, "1", "sq1", true))
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_compact() {
        let report = sample_report();
        let json = JsonGenerator::new(&report).generate().unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains(r#""xp":{"level":2,"current_xp":10,"xp_to_next_level":200}"#));
    }

    #[test]
    fn test_generate_pretty_snapshot() {
        let report = ProfileReport::builder()
            .learner_name("Ada")
            .generated_at(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .build()
            .unwrap();
        let json = JsonGenerator::new(&report).generate_pretty().unwrap();

        insta::assert_snapshot!(json, @r###"
        {
          "learner_name": "Ada",
          "generated_at": "2024-05-01T12:00:00Z",
          "xp": {
            "level": 1,
            "current_xp": 0,
            "xp_to_next_level": 100
          },
          "quizzes": []
        }
        "###);
    }

    #[test]
    fn test_write_to_file() {
        let report = sample_report();
        let path = std::env::temp_dir().join("cognify_report_test.json");

        JsonGenerator::new(&report)
            .write_to_file(&path, true)
            .expect("write should succeed");

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.contains("\"learner_name\": \"Ada\""));

        let restored: ProfileReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(restored.quizzes.len(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let report = sample_report();
        let path = std::env::temp_dir()
            .join("cognify_missing_dir_for_report")
            .join("report.json");

        let err = JsonGenerator::new(&report)
            .write_to_file(&path, false)
            .unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
