//! Logical test identifiers.
//!
//! GoogleTest emits one row per parameter instantiation. The display layer
//! works on logical tests, so every instantiation of a parameterized test is
//! folded onto one identifier that doubles as a `--gtest_filter` pattern.

use std::sync::LazyLock;

use regex::Regex;

/// Instantiation prefix of a typed fixture: `MyFixture/` or `Inst/MyFixture/`.
static TYPED_FIXTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_]+/(?:[A-Za-z0-9_]+/)?").expect("Invalid typed fixture regex")
});

/// `Inst/MyFixture` out of a value-parameterized fixture name.
static VALUE_FIXTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_]+/[A-Za-z0-9_]+").expect("Invalid value fixture regex")
});

/// `Test/` out of a value-parameterized test name such as `Test/3`.
static VALUE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_]+/").expect("Invalid value name regex")
});

/// Derive the grouping identifier for one test-case row.
///
/// `type_param` decides the shape before `value_param`, the reverse of the
/// precedence in [`parameter_of`].
pub fn test_case_id(
    fixture: &str,
    name: &str,
    value_param: Option<&str>,
    type_param: Option<&str>,
) -> String {
    if non_empty(type_param).is_some() {
        return match TYPED_FIXTURE_RE.find(fixture) {
            Some(prefix) => format!("{}*.{}", prefix.as_str(), name),
            None => {
                tracing::debug!("Typed fixture '{}' has no instantiation prefix", fixture);
                format!("{}.{}", fixture, name)
            }
        };
    }

    if non_empty(value_param).is_some() {
        let fixture_part = VALUE_FIXTURE_RE
            .find(fixture)
            .map_or(fixture, |m| m.as_str());
        return match VALUE_NAME_RE.find(name) {
            Some(prefix) => format!("{}.{}*", fixture_part, prefix.as_str()),
            None => format!("{}.{}", fixture_part, name),
        };
    }

    format!("{}.{}", fixture, name)
}

/// The parameter a test case ran with: `value_param` wins over `type_param`.
pub fn parameter_of(value_param: Option<&str>, type_param: Option<&str>) -> Option<String> {
    non_empty(value_param)
        .or_else(|| non_empty(type_param))
        .map(str::to_string)
}

fn non_empty(param: Option<&str>) -> Option<&str> {
    param.filter(|p| !p.is_empty())
}
