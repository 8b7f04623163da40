#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const MATH_REPORT: &str = "test_detail_for_math_test.cc";
pub const PASSING_REPORT: &str = "test_detail_for_passing_test.cc";
pub const TRUNCATED_REPORT: &str = "truncated_report.json";

/// Directory holding the JSON report fixtures.
pub fn reports_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reports")
}

pub fn report_fixture(name: &str) -> PathBuf {
    let path = reports_dir().join(name);
    assert!(path.exists(), "Report fixture not found: {:?}", path);
    path
}

/// Copy the named fixtures into `<root>/build`, returning the build folder.
pub fn build_folder_with(root: &Path, fixtures: &[&str]) -> PathBuf {
    let build = root.join("build");
    std::fs::create_dir_all(&build).unwrap();
    for name in fixtures {
        std::fs::copy(report_fixture(name), build.join(name)).unwrap();
    }
    build
}
