use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BUILD_FOLDER: &str = "build";
pub const DEFAULT_REPORT_PREFIX: &str = "test_detail_for_";

/// All configurable settings with their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub build_folder: PathBuf,
    pub report_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            build_folder: PathBuf::from(DEFAULT_BUILD_FOLDER),
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Build folder, resolved against `project_root` when relative.
    pub fn build_folder_in(&self, project_root: &Path) -> PathBuf {
        if self.build_folder.is_absolute() {
            self.build_folder.clone()
        } else {
            project_root.join(&self.build_folder)
        }
    }
}

/// Raw JSON representation: all fields optional for partial overrides.
#[derive(Debug, Deserialize, Default)]
struct SettingsFile {
    #[serde(rename = "build.folder")]
    build_folder: Option<String>,
    #[serde(rename = "report.prefix")]
    report_prefix: Option<String>,
}

/// Resolve settings: defaults → user global → project-local.
pub fn resolve(project_root: Option<&Path>) -> Settings {
    let global_path = dirs::home_dir().map(|h| h.join(".gtest-lens/settings.json"));
    let project_path = project_root.map(|r| r.join(".gtest-lens/settings.json"));
    resolve_with_paths(global_path.as_deref(), project_path.as_deref())
}

fn resolve_with_paths(global_path: Option<&Path>, project_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    if let Some(path) = global_path {
        apply_file(&mut settings, path);
    }
    if let Some(path) = project_path {
        apply_file(&mut settings, path);
    }

    settings
}

fn apply_file(settings: &mut Settings, path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else { return };
    let Ok(file) = serde_json::from_str::<SettingsFile>(&content) else {
        tracing::warn!("Invalid settings file, ignoring: {}", path.display());
        return;
    };
    if let Some(v) = file.build_folder {
        if v.trim().is_empty() {
            tracing::warn!("build.folder is empty, using {}", settings.build_folder.display());
        } else {
            settings.build_folder = PathBuf::from(v);
        }
    }
    if let Some(v) = file.report_prefix {
        if v.is_empty() || v.contains(|c: char| c == '/' || c == '\\') {
            tracing::warn!(
                "report.prefix ({:?}) must be a non-empty file name prefix, using {:?}",
                v, settings.report_prefix
            );
        } else {
            settings.report_prefix = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_files_exist() {
        let settings = resolve_with_paths(None, None);
        assert_eq!(settings.build_folder, PathBuf::from("build"));
        assert_eq!(settings.report_prefix, "test_detail_for_");
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.json");
        let project = dir.path().join("project.json");
        std::fs::write(&global, r#"{"build.folder": "out", "report.prefix": "gtest_"}"#).unwrap();
        std::fs::write(&project, r#"{"build.folder": "cmake-build-debug"}"#).unwrap();

        let settings = resolve_with_paths(Some(&global), Some(&project));
        assert_eq!(settings.build_folder, PathBuf::from("cmake-build-debug"));
        assert_eq!(settings.report_prefix, "gtest_");
    }

    #[test]
    fn test_invalid_json_ignored() {
        let dir = tempdir().unwrap();
        let bad_file = dir.path().join("bad.json");
        std::fs::write(&bad_file, "not json {{{").unwrap();

        let settings = resolve_with_paths(Some(&bad_file), None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_file_ignored() {
        let settings = resolve_with_paths(Some(Path::new("/nonexistent/settings.json")), None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_values_keep_previous() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(&file, r#"{"build.folder": "  ", "report.prefix": "a/b"}"#).unwrap();

        let settings = resolve_with_paths(Some(&file), None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_build_folder_resolution() {
        let settings = Settings::default();
        assert_eq!(
            settings.build_folder_in(Path::new("/proj")),
            PathBuf::from("/proj/build")
        );

        let absolute = Settings {
            build_folder: PathBuf::from("/tmp/out"),
            ..Settings::default()
        };
        assert_eq!(absolute.build_folder_in(Path::new("/proj")), PathBuf::from("/tmp/out"));
    }
}
