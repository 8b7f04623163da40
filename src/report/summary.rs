use serde::{Deserialize, Serialize};

use super::ReportsById;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub duration_ms: u64,
}

impl ReportSummary {
    /// Count every row: each parameter instantiation is one test run.
    pub fn from_reports(reports_by_id: &ReportsById) -> Self {
        let mut summary = Self::default();
        for report in reports_by_id.values().flatten() {
            summary.duration_ms = summary.duration_ms.saturating_add(report.duration_ms);
            if !report.has_passed {
                summary.failed += 1;
            } else if report.is_skipped() {
                summary.skipped += 1;
            } else {
                summary.passed += 1;
            }
        }
        summary
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse;

    #[test]
    fn test_summary_counts_every_row() {
        let json = r#"{"testsuites": [
            {"name": "A", "testsuite": [
                {"name": "Ok", "classname": "A", "time": "0.010s"},
                {"name": "Skip", "classname": "A", "result": "SKIPPED"},
                {"name": "Bad", "classname": "A", "time": "0.005s",
                 "failures": [{"failure": "a.cc:3\nboom"}]}
            ]},
            {"name": "Inst/P", "testsuite": [
                {"name": "T/0", "classname": "Inst/P", "value_param": "1"},
                {"name": "T/1", "classname": "Inst/P", "value_param": "2"}
            ]}
        ]}"#;
        let summary = ReportSummary::from_reports(&parse(json.as_bytes()).unwrap());
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.duration_ms, 15);
    }

    #[test]
    fn test_summary_duration_saturates() {
        let json = r#"{"testsuites": [
            {"name": "Slow", "testsuite": [
                {"name": "A", "classname": "Slow", "time": "1e300s"},
                {"name": "B", "classname": "Slow", "time": "1e300s"}
            ]}
        ]}"#;
        let summary = ReportSummary::from_reports(&parse(json.as_bytes()).unwrap());
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.duration_ms, u64::MAX);
    }
}
