use serde::Serialize;

use super::format::FormatKind;

/// Counts and timings extracted from a single report document.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialSummary {
    pub name: String,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub ignored: u64,
    pub duration_seconds: f64,
    /// ISO-8601 UTC, or empty when the report carries no usable time.
    pub start_time: String,
    pub end_time: String,
    pub format: FormatKind,
}

impl PartialSummary {
    pub fn new(format: FormatKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            ignored: 0,
            duration_seconds: 0.0,
            start_time: String::new(),
            end_time: String::new(),
            format,
        }
    }

    /// `passed = total - (failed + ignored + skipped)`, floored at zero.
    pub fn derive_passed(&mut self) {
        self.passed = self
            .total
            .saturating_sub(self.failed.saturating_add(self.ignored).saturating_add(self.skipped));
    }

    /// `ignored = total - (failed + passed + skipped)`, floored at zero.
    pub fn derive_ignored(&mut self) {
        self.ignored = self
            .total
            .saturating_sub(self.failed.saturating_add(self.passed).saturating_add(self.skipped));
    }
}

/// Run identifiers supplied by the CI context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub build_number: String,
    pub attempt_number: String,
}

/// Outbound summary record, in the shape the reporting service accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub name: String,
    pub passed_tests: u64,
    pub failed_tests: u64,
    pub skipped_tests: u64,
    pub ignored_tests: u64,
    pub blocked_tests: u64,
    pub total_tests: u64,
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
    pub test_type: &'static str,
    pub suites: Vec<serde_json::Value>,
}

impl Summary {
    pub fn new(partial: PartialSummary, run: &RunMetadata) -> Self {
        Self {
            name: format!(
                "{}-{}.{}",
                partial.name, run.build_number, run.attempt_number
            ),
            passed_tests: partial.passed,
            failed_tests: partial.failed,
            skipped_tests: partial.skipped,
            ignored_tests: partial.ignored,
            blocked_tests: 0,
            total_tests: partial.total,
            start_time: partial.start_time,
            end_time: partial.end_time,
            duration: partial.duration_seconds,
            test_type: partial.format.test_type(),
            suites: Vec::new(),
        }
    }
}

/// Wrap a normalized summary for submission. The service always expects a
/// sequence even though one invocation yields exactly one record.
pub fn assemble(partial: PartialSummary, run: &RunMetadata) -> Vec<Summary> {
    vec![Summary::new(partial, run)]
}
