pub mod command;
pub mod evaluate;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::failure::SourceItem;

pub use command::TestCommand;
pub use evaluate::{evaluate, ItemOutcome, OutcomeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A test source file: the root of one test binary's items.
    File,
    Fixture,
    TestCase,
}

/// A node of the discovered test tree.
///
/// Ids of fixtures and test cases use the same shape as the logical test
/// ids of parsed reports, so they are valid `--gtest_filter` patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestItem {
    pub id: String,
    pub file: PathBuf,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TestItem>,
}

impl TestItem {
    pub fn file(file: impl Into<PathBuf>, children: Vec<TestItem>) -> Self {
        let file = file.into();
        Self {
            id: file.to_string_lossy().to_string(),
            file,
            kind: ItemKind::File,
            children,
        }
    }

    pub fn fixture(id: impl Into<String>, file: impl Into<PathBuf>, children: Vec<TestItem>) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
            kind: ItemKind::Fixture,
            children,
        }
    }

    pub fn test_case(id: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
            kind: ItemKind::TestCase,
            children: Vec::new(),
        }
    }

    /// All test-case leaves below (or at) this item, in tree order.
    pub fn test_cases(&self) -> Vec<&TestItem> {
        let mut leaves = Vec::new();
        self.collect_test_cases(&mut leaves);
        leaves
    }

    fn collect_test_cases<'a>(&'a self, leaves: &mut Vec<&'a TestItem>) {
        if self.kind == ItemKind::TestCase {
            leaves.push(self);
        }
        for child in &self.children {
            child.collect_test_cases(leaves);
        }
    }
}

impl SourceItem for TestItem {
    fn source_file(&self) -> &Path {
        &self.file
    }
}

/// `--gtest_filter` expression selecting `items`.
///
/// A whole file selects everything. A fixture with several tests is matched
/// by prefix; anything else by its exact id.
pub fn run_filter(items: &[&TestItem]) -> String {
    if items.iter().any(|item| item.kind == ItemKind::File) {
        tracing::debug!("File item selected, running all tests");
        return "*".to_string();
    }

    let mut filter = String::new();
    for item in items {
        if item.kind == ItemKind::Fixture && item.children.len() > 1 {
            filter.push_str(&format!("{}*:", item.id));
        } else {
            filter.push_str(&format!("{}:", item.id));
        }
        tracing::debug!("Added {} to filter, now {}", item.id, filter);
    }
    filter
}

/// Name of the JSON report written for one test source file.
pub fn report_file_name(source: &Path, prefix: &str) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}{}", prefix, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TestItem {
        TestItem::file(
            "/src/math_test.cc",
            vec![
                TestItem::fixture(
                    "MathTest",
                    "/src/math_test.cc",
                    vec![
                        TestItem::test_case("MathTest.Add", "/src/math_test.cc"),
                        TestItem::test_case("MathTest.Sub", "/src/math_test.cc"),
                    ],
                ),
                TestItem::fixture(
                    "Single",
                    "/src/math_test.cc",
                    vec![TestItem::test_case("Single.Only", "/src/math_test.cc")],
                ),
            ],
        )
    }

    #[test]
    fn test_filter_file_runs_everything() {
        let root = tree();
        let fixture = &root.children[0];
        assert_eq!(run_filter(&[fixture, &root]), "*");
    }

    #[test]
    fn test_filter_fixture_and_cases() {
        let root = tree();
        let multi = &root.children[0];
        let single = &root.children[1];
        let case = &multi.children[1];
        assert_eq!(
            run_filter(&[multi, single, case]),
            "MathTest*:Single:MathTest.Sub:"
        );
    }

    #[test]
    fn test_filter_empty_selection() {
        assert_eq!(run_filter(&[]), "");
    }

    #[test]
    fn test_test_cases_in_tree_order() {
        let root = tree();
        let ids: Vec<&str> = root.test_cases().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["MathTest.Add", "MathTest.Sub", "Single.Only"]);
    }

    #[test]
    fn test_report_file_name() {
        let name = report_file_name(Path::new("/src/tests/math_test.cc"), "test_detail_for_");
        assert_eq!(name, "test_detail_for_math_test.cc");
    }
}
