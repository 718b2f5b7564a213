//! Report discovery within a build workspace.
//!
//! Resolution first treats the configured pattern as an Ant-style glob. When
//! that yields nothing (or the pattern cannot be compiled) it falls back to
//! the legacy form: a `;`/`:`/`,`-separated list of files and directories,
//! where each directory is searched recursively for `BUILD*.xml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::workspace::Workspace;

/// Pattern used when the step is configured without one.
pub const DEFAULT_PATTERN: &str = "target/invoker-reports/BUILD*.xml";

/// Search applied inside directories named by the legacy pattern form.
pub const LEGACY_REPORT_GLOB: &str = "**/BUILD*.xml";

/// File name of the per-project invoker build log.
pub const BUILD_LOG_FILE: &str = "build.log";

/// A report file discovered in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportLocation(PathBuf);

impl ReportLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Final path component, e.g. `BUILD-foo.xml`.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }
}

impl AsRef<Path> for ReportLocation {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ReportLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn legacy_delimiters() -> &'static Regex {
    static DELIMITERS: OnceLock<Regex> = OnceLock::new();
    DELIMITERS.get_or_init(|| Regex::new(r"\s*[;:,]+\s*").expect("static regex"))
}

/// Split a legacy pattern into path segments. Empty segments are dropped.
pub fn split_legacy_pattern(pattern: &str) -> Vec<&str> {
    legacy_delimiters()
        .split(pattern)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Resolve `pattern` to report locations inside `workspace`.
///
/// Never fails: glob errors degrade to the legacy search, and missing
/// legacy segments are skipped.
pub fn resolve(workspace: &dyn Workspace, pattern: &str) -> Vec<ReportLocation> {
    match workspace.list(pattern) {
        Ok(found) if !found.is_empty() => {
            debug!(pattern = %pattern, count = found.len(), "glob matched reports");
            return found.into_iter().map(ReportLocation::new).collect();
        }
        Ok(_) => debug!(pattern = %pattern, "glob matched nothing, trying legacy search"),
        Err(e) => debug!(pattern = %pattern, error = %e, "glob failed, trying legacy search"),
    }

    let mut locations = Vec::new();
    for segment in split_legacy_pattern(pattern) {
        let path = workspace.child(segment);
        if !workspace.exists(&path) {
            debug!(segment = %segment, "legacy segment does not exist");
            continue;
        }
        if workspace.is_dir(&path) {
            match workspace.list_under(&path, LEGACY_REPORT_GLOB) {
                Ok(found) => locations.extend(found.into_iter().map(ReportLocation::new)),
                Err(e) => debug!(segment = %segment, error = %e, "legacy directory search failed"),
            }
        } else {
            locations.push(ReportLocation::new(path));
        }
    }
    locations
}

/// Locate `{base_path}/build.log` files, e.g. `target/it/*` finds one log
/// per invoker project.
pub fn locate_build_logs(workspace: &dyn Workspace, base_path: &str) -> Result<Vec<PathBuf>> {
    let base = base_path.trim().trim_end_matches(['/', '\\']);
    let includes = if base.is_empty() {
        BUILD_LOG_FILE.to_string()
    } else {
        format!("{base}/{BUILD_LOG_FILE}")
    };
    workspace.list(&includes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FsWorkspace;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn names(root: &Path, locations: &[ReportLocation]) -> Vec<String> {
        locations
            .iter()
            .map(|l| {
                l.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_split_legacy_pattern() {
        assert_eq!(
            split_legacy_pattern("dirA, dirB ; fileC.xml"),
            vec!["dirA", "dirB", "fileC.xml"]
        );
        assert_eq!(
            split_legacy_pattern("dirA,,;: dirB::fileC.xml"),
            vec!["dirA", "dirB", "fileC.xml"]
        );
        assert!(split_legacy_pattern("").is_empty());
        assert_eq!(split_legacy_pattern(", a ,"), vec!["a"]);
    }

    #[test]
    fn test_glob_takes_precedence() {
        let dir = TempDir::new().unwrap();
        for i in 1..=3 {
            touch(dir.path(), &format!("target/invoker-reports/BUILD-{i}.xml"));
        }
        let ws = FsWorkspace::new(dir.path());

        let found = resolve(&ws, DEFAULT_PATTERN);
        assert_eq!(
            names(dir.path(), &found),
            vec![
                "target/invoker-reports/BUILD-1.xml",
                "target/invoker-reports/BUILD-2.xml",
                "target/invoker-reports/BUILD-3.xml",
            ]
        );
    }

    #[test]
    fn test_legacy_directory_recursion() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "reports/sub/BUILD-1.xml");
        touch(dir.path(), "reports/sub/BUILD-2.xml");
        touch(dir.path(), "reports/sub/notes.txt");
        let ws = FsWorkspace::new(dir.path());

        let found = resolve(&ws, "reports");
        assert_eq!(
            names(dir.path(), &found),
            vec!["reports/sub/BUILD-1.xml", "reports/sub/BUILD-2.xml"]
        );
    }

    #[test]
    fn test_legacy_segments_keep_segment_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "dirB/BUILD-b.xml");
        touch(dir.path(), "dirA/x/BUILD-a.xml");
        touch(dir.path(), "fileC.xml");
        let ws = FsWorkspace::new(dir.path());

        let found = resolve(&ws, "dirB ; missing , dirA;fileC.xml");
        assert_eq!(
            names(dir.path(), &found),
            vec!["dirB/BUILD-b.xml", "dirA/x/BUILD-a.xml", "fileC.xml"]
        );
    }

    #[test]
    fn test_missing_segment_skipped() {
        let dir = TempDir::new().unwrap();
        let ws = FsWorkspace::new(dir.path());
        assert!(resolve(&ws, "missing-dir").is_empty());
    }

    #[test]
    fn test_empty_pattern_resolves_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "target/invoker-reports/BUILD-1.xml");
        let ws = FsWorkspace::new(dir.path());
        assert!(resolve(&ws, "").is_empty());
    }

    #[test]
    fn test_bracketed_directory_matches_as_glob() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "odd[dir/BUILD-1.xml");
        touch(dir.path(), "odd[dir/BUILD-2.xml");
        let ws = FsWorkspace::new(dir.path());

        let found = resolve(&ws, "odd[dir/BUILD*.xml");
        assert_eq!(
            names(dir.path(), &found),
            vec!["odd[dir/BUILD-1.xml", "odd[dir/BUILD-2.xml"]
        );
    }

    #[test]
    fn test_bracketed_directory_as_legacy_segment() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "odd[dir/BUILD-1.xml");
        let ws = FsWorkspace::new(dir.path());

        let found = resolve(&ws, "odd[dir");
        assert_eq!(names(dir.path(), &found), vec!["odd[dir/BUILD-1.xml"]);
    }

    #[test]
    fn test_report_location_file_name() {
        let location = ReportLocation::new("target/invoker-reports/BUILD-foo.xml");
        assert_eq!(location.file_name(), Some("BUILD-foo.xml"));
        assert_eq!(ReportLocation::new("/").file_name(), None);
    }

    #[test]
    fn test_resolved_paths_exist() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/BUILD-1.xml");
        touch(dir.path(), "b/BUILD-2.xml");
        let ws = FsWorkspace::new(dir.path());

        for pattern in ["**/BUILD*.xml", "a, b, c", "a/BUILD-1.xml", "nothing"] {
            for location in resolve(&ws, pattern) {
                assert!(location.path().is_file(), "{location} should exist");
            }
        }
    }

    #[test]
    fn test_locate_build_logs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "target/it/alpha/build.log");
        touch(dir.path(), "target/it/beta/build.log");
        touch(dir.path(), "target/it/beta/deep/build.log");
        let ws = FsWorkspace::new(dir.path());

        let logs = locate_build_logs(&ws, "target/it/*/").unwrap();
        let logs: Vec<ReportLocation> = logs.into_iter().map(ReportLocation::new).collect();
        assert_eq!(
            names(dir.path(), &logs),
            vec!["target/it/alpha/build.log", "target/it/beta/build.log"]
        );
    }
}
