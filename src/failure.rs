//! Display messages for GoogleTest assertion failures.
//!
//! Failure text is matched against a fixed, ordered set of known assertion
//! shapes. A match yields an expected/actual diff; everything else becomes a
//! plain text message. Both are anchored at the failing line of the owning
//! item's source file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::report::TestFailure;

const VALUE_EQUALITY_TERM: &str = "Expected equality of these values:";

/// An indented value line, optionally followed by its `Which is: ...` line.
static VALUE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s+.+\n?(?:\s+Which is.*\n?)?").expect("Invalid value block regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Anything a failure message can be anchored to.
pub trait SourceItem {
    fn source_file(&self) -> &Path;
}

impl SourceItem for Path {
    fn source_file(&self) -> &Path {
        self
    }
}

impl SourceItem for PathBuf {
    fn source_file(&self) -> &Path {
        self.as_path()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: PathBuf,
    /// Zero-based.
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageBody {
    #[serde(rename_all = "camelCase")]
    Diff {
        expected_term: String,
        expected: String,
        actual: String,
    },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMessage {
    pub body: MessageBody,
    pub location: Location,
}

impl DisplayMessage {
    /// Human-readable rendering with a one-based `file:line` header.
    pub fn render(&self) -> String {
        let header = format!("{}:{}", self.location.file.display(), self.location.line + 1);
        match &self.body {
            MessageBody::Diff {
                expected_term,
                expected,
                actual,
            } => format!(
                "{}: {}\n  expected: {}\n  actual:   {}",
                header, expected_term, expected, actual
            ),
            MessageBody::Text { text } => format!("{}\n{}", header, text),
        }
    }
}

/// Recognised failure message shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePattern {
    /// `EXPECT_TRUE`/`EXPECT_FALSE`: `Value of: ...`, `Actual: ...`, `Expected: ...`.
    AssertTrue,
    /// `EXPECT_EQ`: `Expected equality of these values:` followed by two value blocks.
    ValueEquality,
    /// Binary comparisons: `Expected: (a) != (b), actual: 1 vs 1`.
    Expectation,
}

/// Most specific marker first: equality messages also contain `Expected:`.
const PATTERNS: [(FailurePattern, &str); 3] = [
    (FailurePattern::AssertTrue, "Value of"),
    (FailurePattern::ValueEquality, VALUE_EQUALITY_TERM),
    (FailurePattern::Expectation, "Expected:"),
];

#[derive(Debug, Clone, PartialEq)]
struct DiffParts {
    expected_term: String,
    expected: String,
    actual: String,
}

impl FailurePattern {
    fn extract(self, message: &str) -> Option<DiffParts> {
        match self {
            FailurePattern::AssertTrue => assert_true_parts(message),
            FailurePattern::ValueEquality => value_equality_parts(message),
            FailurePattern::Expectation => expectation_parts(message),
        }
    }
}

/// First pattern whose marker occurs in `message`.
pub fn classify(message: &str) -> Option<FailurePattern> {
    PATTERNS
        .iter()
        .find(|(_, marker)| message.contains(marker))
        .map(|(pattern, _)| *pattern)
}

/// Build the display message for one failure of `owner`. Never fails: a
/// message that does not fit its recognised shape falls back to plain text.
pub fn build<I: SourceItem + ?Sized>(owner: &I, failure: &TestFailure) -> DisplayMessage {
    let location = Location {
        file: owner.source_file().to_path_buf(),
        line: failure.line_no,
        column: 0,
    };

    let diff = classify(&failure.message).and_then(|pattern| {
        let parts = pattern.extract(&failure.message);
        if parts.is_none() {
            tracing::debug!("{:?} failure message is incomplete, using plain text", pattern);
        }
        parts
    });

    let body = match diff {
        Some(parts) => MessageBody::Diff {
            expected_term: parts.expected_term,
            expected: parts.expected,
            actual: parts.actual,
        },
        None => MessageBody::Text {
            text: plain_text(failure),
        },
    };

    DisplayMessage { body, location }
}

fn assert_true_parts(message: &str) -> Option<DiffParts> {
    let lines: Vec<&str> = message.split('\n').collect();
    if lines.len() < 4 {
        return None;
    }
    Some(DiffParts {
        expected_term: lines[1].trim().to_string(),
        actual: lines[2].replacen("Actual:", "", 1).trim().to_string(),
        expected: lines[3].replacen("Expected:", "", 1).trim().to_string(),
    })
}

fn expectation_parts(message: &str) -> Option<DiffParts> {
    let expected_term = message.split('\n').nth(1)?.trim();
    let (expected, actual) = expected_term.split_once(", actual:")?;
    Some(DiffParts {
        expected_term: expected_term.to_string(),
        expected: expected.replacen("Expected:", "", 1).trim().to_string(),
        actual: actual.trim().to_string(),
    })
}

fn value_equality_parts(message: &str) -> Option<DiffParts> {
    let mut blocks = VALUE_BLOCK_RE.find_iter(message);
    let expected = collapse_whitespace(blocks.next()?.as_str());
    let actual = collapse_whitespace(blocks.next()?.as_str());
    Some(DiffParts {
        expected_term: VALUE_EQUALITY_TERM.to_string(),
        expected,
        actual,
    })
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Failure text without its `file:line` header, annotated with the parameter.
fn plain_text(failure: &TestFailure) -> String {
    let mut message = failure.message.clone();
    if let Some(param) = failure.param.as_deref().filter(|p| !p.is_empty()) {
        message.push_str(&format!("\nFailure parameter: {} ", param));
    }
    match message.find('\n') {
        Some(idx) => message[idx + 1..].to_string(),
        None => message,
    }
}
