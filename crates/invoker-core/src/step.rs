//! Invoker report step: resolve, archive, parse, aggregate.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::action::BuildAction;
use crate::aggregate::{aggregate, ResultSet};
use crate::archive::{archive_build_logs, archive_reports, ArchiveReport};
use crate::config::StepConfig;
use crate::error::Result;
use crate::parser::parse_file;
use crate::resolve::{locate_build_logs, resolve, ReportLocation};
use crate::workspace::Workspace;

/// Directory under the build root that holds archived copies.
pub const ARCHIVE_DIR_NAME: &str = "maven-invoker-plugin-reports";

/// Identity and storage root of the build being recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub build_id: String,
    /// Host-owned per-build metadata directory.
    pub root_dir: PathBuf,
}

impl BuildContext {
    pub fn new(build_id: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_id: build_id.into(),
            root_dir: root_dir.into(),
        }
    }
}

/// `{build_root}/maven-invoker-plugin-reports`
pub fn archive_directory(build_root: &Path) -> PathBuf {
    build_root.join(ARCHIVE_DIR_NAME)
}

/// Parse every location in order. The first failure aborts.
pub fn parse_reports(locations: &[ReportLocation]) -> Result<ResultSet> {
    let records = locations
        .iter()
        .map(|location| {
            debug!(report = %location, "parsing report");
            parse_file(location.path())
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate(records))
}

/// A configured Maven Invoker report step.
#[derive(Debug, Clone)]
pub struct InvokerReportStep {
    config: StepConfig,
}

impl InvokerReportStep {
    pub fn new(config: StepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Record invoker results for one build.
    ///
    /// Archiving is best-effort and only logged on failure. A report that
    /// cannot be read or parsed fails the whole run and no action is produced.
    pub fn run(&self, workspace: &dyn Workspace, build: &BuildContext) -> Result<BuildAction> {
        let pattern = self.config.filename_pattern.as_str();
        info!(build_id = %build.build_id, pattern = %pattern, "recording Maven Invoker reports");

        let locations = resolve(workspace, pattern);
        info!(count = locations.len(), "found reports");

        let archive_dir = archive_directory(&build.root_dir);
        let mut archive = archive_reports(&archive_dir, &locations);
        if let Some(base) = self.config.build_logs.as_deref() {
            match locate_build_logs(workspace, base) {
                Ok(logs) => archive.merge(archive_build_logs(&archive_dir, &logs)),
                Err(e) => warn!(base = %base, error = %e, "could not locate build logs"),
            }
        }
        log_archive_failures(&archive);

        let results = parse_reports(&locations)?;
        info!(
            records = results.len(),
            "finished parsing Maven Invoker results"
        );

        Ok(BuildAction::new(build.build_id.clone(), pattern, results, archive))
    }
}

fn log_archive_failures(archive: &ArchiveReport) {
    for failure in &archive.failures {
        warn!(
            source = %failure.source.display(),
            reason = %failure.reason,
            "failed to archive file"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvokerError;
    use crate::workspace::FsWorkspace;
    use std::fs;

    fn report(name: &str, result: &str) -> String {
        format!(
            "<buildJob><name>{name}</name><project>{name}/pom.xml</project>\
             <result>{result}</result><time>1.0</time></buildJob>"
        )
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_archive_directory() {
        assert_eq!(
            archive_directory(Path::new("/builds/7")),
            PathBuf::from("/builds/7/maven-invoker-plugin-reports")
        );
    }

    #[test]
    fn test_run_without_reports_yields_empty_action() {
        let ws_dir = tempfile::tempdir().unwrap();
        let build_dir = tempfile::tempdir().unwrap();
        let step = InvokerReportStep::new(StepConfig::default());

        let action = step
            .run(
                &FsWorkspace::new(ws_dir.path()),
                &BuildContext::new("1", build_dir.path()),
            )
            .expect("run");
        assert!(action.results.is_empty());
        assert!(action.archive.is_complete());
        assert_eq!(action.build_id, "1");
    }

    #[test]
    fn test_run_archives_build_logs() {
        let ws_dir = tempfile::tempdir().unwrap();
        let build_dir = tempfile::tempdir().unwrap();
        write(
            ws_dir.path(),
            "target/invoker-reports/BUILD-a.xml",
            &report("a", "success"),
        );
        write(
            ws_dir.path(),
            "target/it/a/build.log",
            "[INFO] BUILD SUCCESS",
        );

        let step = InvokerReportStep::new(StepConfig::default().with_build_logs("target/it/*"));
        let action = step
            .run(
                &FsWorkspace::new(ws_dir.path()),
                &BuildContext::new("2", build_dir.path()),
            )
            .expect("run");

        assert_eq!(action.archive.archived.len(), 2);
        let archive_dir = archive_directory(build_dir.path());
        assert!(archive_dir.join("maven-invoker-result.xml").is_file());
        assert!(archive_dir.join("a-build.log").is_file());
    }

    #[test]
    fn test_parse_reports_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ok.xml", &report("ok", "success"));
        write(dir.path(), "bad.xml", "<buildJob><name>bad</name>");
        let locations = vec![
            ReportLocation::new(dir.path().join("ok.xml")),
            ReportLocation::new(dir.path().join("bad.xml")),
        ];

        match parse_reports(&locations) {
            Err(InvokerError::Parse { location, .. }) => assert!(location.ends_with("bad.xml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
