//! The per-build artifact handed back to the host.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{ResultSet, ResultSummary};
use crate::archive::ArchiveReport;
use crate::error::Result;

/// File written next to the build's own metadata by [`BuildAction::persist`].
pub const RESULTS_FILE_NAME: &str = "maven-invoker-results.json";

pub const SCHEMA_VERSION: &str = "1.0";

/// Aggregated invoker results for one build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildAction {
    pub schema_version: String,
    pub build_id: String,
    pub filename_pattern: String,
    pub generated_at: DateTime<Utc>,
    pub results: ResultSet,
    pub archive: ArchiveReport,
}

impl BuildAction {
    pub fn new(
        build_id: impl Into<String>,
        filename_pattern: impl Into<String>,
        results: ResultSet,
        archive: ArchiveReport,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            build_id: build_id.into(),
            filename_pattern: filename_pattern.into(),
            generated_at: Utc::now(),
            results,
            archive,
        }
    }

    pub fn summary(&self) -> ResultSummary {
        self.results.summary()
    }

    /// Write `{build_root}/maven-invoker-results.json` as pretty JSON.
    pub fn persist(&self, build_root: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(build_root)?;
        let path = build_root.join(RESULTS_FILE_NAME);
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Read back an action written by [`BuildAction::persist`].
    pub fn load(build_root: &Path) -> Result<Self> {
        let json = std::fs::read(build_root.join(RESULTS_FILE_NAME))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::error::InvokerError;
    use crate::record::{BuildJobRecord, BuildResult};
    use serde_json::json;

    fn sample() -> BuildAction {
        BuildAction::new(
            "build-42",
            "target/invoker-reports/BUILD*.xml",
            aggregate(vec![BuildJobRecord {
                name: "foo".to_string(),
                project: "bar".to_string(),
                description: None,
                failure_message: None,
                result: BuildResult::Success,
                time: 12.5,
                job_type: None,
            }]),
            ArchiveReport::default(),
        )
    }

    #[test]
    fn test_serialized_results_shape() {
        let v = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(
            v["results"],
            json!([{
                "name": "foo",
                "project": "bar",
                "description": null,
                "failureMessage": null,
                "result": "SUCCESS",
                "time": 12.5,
            }])
        );
        assert_eq!(v["buildId"], "build-42");
        assert_eq!(v["schemaVersion"], SCHEMA_VERSION);
        assert!(v.get("generatedAt").is_some());
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let action = sample();

        let path = action.persist(dir.path()).expect("persist");
        assert_eq!(path, dir.path().join(RESULTS_FILE_NAME));

        let loaded = BuildAction::load(dir.path()).expect("load");
        assert_eq!(loaded, action);
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BuildAction::load(dir.path()),
            Err(InvokerError::Io(_))
        ));
    }
}
