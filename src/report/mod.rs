pub mod id;
pub mod summary;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexMap;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{Error, Result};

pub use summary::ReportSummary;

/// Test reports grouped by logical test id, in discovery order.
pub type ReportsById = IndexMap<String, Vec<TestReport>>;

/// `path/file.cc:42` at the very start of a failure message.
static LINE_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+:(\d+)").expect("Invalid line number regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFailure {
    /// Failure text exactly as GoogleTest wrote it.
    pub message: String,
    /// Zero-based line of the failing assertion.
    pub line_no: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// One executed test case row of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub name: String,
    pub fixture: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    pub line: u32,
    pub timestamp: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub duration_ms: u64,
    pub has_passed: bool,
    pub failures: Vec<TestFailure>,
}

impl TestReport {
    pub fn is_skipped(&self) -> bool {
        self.result.as_deref() == Some("SKIPPED")
    }

    /// Start time of the test case, if the timestamp is parseable.
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

#[derive(Deserialize)]
struct GTestOutput {
    testsuites: Vec<GTestSuite>,
}

#[derive(Deserialize)]
struct GTestSuite {
    #[serde(default)]
    name: String,
    testsuite: Vec<GTestCase>,
}

#[derive(Deserialize)]
struct GTestCase {
    name: String,
    classname: String,
    #[serde(default)]
    file: String,
    #[serde(default)]
    line: u32,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    value_param: Option<String>,
    #[serde(default)]
    type_param: Option<String>,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    time: String,
    #[serde(default)]
    failures: Option<Vec<GTestFailure>>,
}

#[derive(Deserialize)]
struct GTestFailure {
    failure: String,
}

/// Parse a GoogleTest JSON report (`--gtest_output=json`).
///
/// Every test-case row becomes one [`TestReport`], appended under its
/// logical id in document order. Any structural problem fails the whole
/// report; there are no partial results.
pub fn parse(bytes: &[u8]) -> Result<ReportsById> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::MalformedReport(format!("report is not valid UTF-8: {}", e)))?;
    let output: GTestOutput =
        serde_json::from_str(text).map_err(|e| Error::MalformedReport(e.to_string()))?;

    let mut reports_by_id = ReportsById::new();
    for suite in output.testsuites {
        tracing::debug!("Processing test suite {}", suite.name);
        for case in suite.testsuite {
            let report = create_test_report(case)?;
            reports_by_id
                .entry(report.id.clone())
                .or_default()
                .push(report);
        }
    }

    Ok(reports_by_id)
}

/// Read and parse one report file.
pub async fn load(path: &Path) -> Result<ReportsById> {
    let bytes = tokio::fs::read(path).await?;
    let reports_by_id = parse(&bytes)?;
    for (id, reports) in &reports_by_id {
        tracing::debug!(
            "Test report with id {} passed {}",
            id,
            reports.iter().all(|r| r.has_passed)
        );
    }
    Ok(reports_by_id)
}

/// Read and parse independent reports in parallel. Results keep the order
/// of `paths`; one report failing does not affect the others.
pub fn parse_all(paths: &[PathBuf]) -> Vec<(PathBuf, Result<ReportsById>)> {
    paths
        .par_iter()
        .map(|path| {
            let parsed = std::fs::read(path)
                .map_err(Error::from)
                .and_then(|bytes| parse(&bytes));
            if let Err(ref e) = parsed {
                tracing::warn!("Failed to parse report {}: {}", path.display(), e);
            }
            (path.clone(), parsed)
        })
        .collect()
}

/// Report files directly inside `build_folder` whose name starts with `prefix`.
pub fn discover(build_folder: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !build_folder.is_dir() {
        return Err(Error::ValidationError(format!(
            "Build folder does not exist: {}",
            build_folder.display()
        )));
    }

    let reports = WalkDir::new(build_folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.into_path())
        .collect();

    Ok(reports)
}

fn create_test_report(case: GTestCase) -> Result<TestReport> {
    let value_param = case.value_param.as_deref();
    let type_param = case.type_param.as_deref();
    let parameter = id::parameter_of(value_param, type_param);
    let id = id::test_case_id(&case.classname, &case.name, value_param, type_param);

    let failures = case
        .failures
        .unwrap_or_default()
        .into_iter()
        .map(|f| -> Result<TestFailure> {
            Ok(TestFailure {
                line_no: line_number_from_failure_message(&f.failure)?,
                message: f.failure,
                param: parameter.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestReport {
        name: case.name,
        fixture: case.classname,
        id,
        parameter,
        line: case.line,
        timestamp: case.timestamp,
        file: case.file,
        result: case.result,
        duration_ms: parse_gtest_time(&case.time),
        has_passed: failures.is_empty(),
        failures,
    })
}

/// Zero-based line from the `file:line` header of a failure message.
fn line_number_from_failure_message(message: &str) -> Result<u32> {
    let missing = || Error::MissingLineNumber {
        message: message.to_string(),
    };
    let caps = LINE_NO_RE.captures(message).ok_or_else(missing)?;
    let line: u32 = caps[1].parse().map_err(|_| missing())?;
    line.checked_sub(1).ok_or_else(missing)
}

/// Parse GTest time string (e.g., "0.001s") into milliseconds.
fn parse_gtest_time(time_str: &str) -> u64 {
    let stripped = time_str.trim_end_matches('s');
    let secs: f64 = stripped.parse().unwrap_or(0.0);
    (secs * 1000.0) as u64
}
