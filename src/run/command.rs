use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// How to invoke a GoogleTest binary. Spawning it is up to the caller.
#[derive(Debug, Clone)]
pub struct TestCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; the report file is written relative to it.
    pub cwd: PathBuf,
    pub report_name: String,
}

impl TestCommand {
    /// Run the tests matching `filter`, writing the JSON report to `report_name`.
    pub fn for_binary(
        binary: &str,
        build_folder: &Path,
        filter: &str,
        report_name: &str,
    ) -> Result<Self> {
        if filter.is_empty() {
            return Err(Error::ValidationError(
                "No tests selected: the gtest filter is empty".to_string(),
            ));
        }
        if report_name.is_empty() {
            return Err(Error::ValidationError(
                "Report file name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            program: binary.to_string(),
            args: vec![
                format!("--gtest_filter={}", filter),
                format!("--gtest_output=json:{}", report_name),
            ],
            cwd: build_folder.to_path_buf(),
            report_name: report_name.to_string(),
        })
    }

    /// Where the binary will leave its report.
    pub fn report_path(&self) -> PathBuf {
        self.cwd.join(&self.report_name)
    }

    /// Shell-style rendering, for logs and the CLI.
    pub fn display(&self) -> String {
        let mut line = format!("cd {} && {}", self.cwd.display(), self.program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
