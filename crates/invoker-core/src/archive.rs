//! Durable per-build copies of discovered reports and build logs.
//!
//! Copies are streamed into a temporary file inside the archive directory,
//! hashed, and renamed into place, so a reader never observes a half-written
//! archive entry.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::InvokerError;

/// Base name for archived report copies.
pub const REPORT_BASENAME: &str = "maven-invoker-result";

/// Suffix for archived build logs.
pub const BUILD_LOG_SUFFIX: &str = "-build.log";

/// A successfully archived file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchivedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// SHA-256 hex of the copied bytes.
    pub sha256: String,
}

/// A source that could not be archived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveFailure {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub reason: String,
}

/// Outcome of one archive call. Partial success is normal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveReport {
    pub archived: Vec<ArchivedFile>,
    pub failures: Vec<ArchiveFailure>,
}

impl ArchiveReport {
    /// True when every source was copied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one, keeping order.
    pub fn merge(&mut self, other: ArchiveReport) {
        self.archived.extend(other.archived);
        self.failures.extend(other.failures);
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &Path> {
        self.failures.iter().map(|f| f.source.as_path())
    }

    fn fail_all<P: AsRef<Path>>(sources: &[P], reason: &str) -> Self {
        Self {
            archived: Vec::new(),
            failures: sources
                .iter()
                .map(|s| ArchiveFailure {
                    source: s.as_ref().to_path_buf(),
                    destination: None,
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }

    fn record(
        &mut self,
        source: &Path,
        destination: PathBuf,
        outcome: Result<String, InvokerError>,
    ) {
        match outcome {
            Ok(sha256) => self.archived.push(ArchivedFile {
                source: source.to_path_buf(),
                destination,
                sha256,
            }),
            Err(e) => self.failures.push(ArchiveFailure {
                source: source.to_path_buf(),
                destination: Some(destination),
                reason: e.to_string(),
            }),
        }
    }
}

/// Archive name for the `index`-th report: `maven-invoker-result.xml`,
/// then `maven-invoker-result-1.xml`, `maven-invoker-result-2.xml`, ...
pub fn report_archive_name(index: usize) -> String {
    if index == 0 {
        format!("{REPORT_BASENAME}.xml")
    } else {
        format!("{REPORT_BASENAME}-{index}.xml")
    }
}

/// Archive name for a build log, derived from its containing directory.
pub fn build_log_archive_name(source: &Path) -> Option<String> {
    let parent = source.parent()?.file_name()?.to_str()?;
    Some(format!("{parent}{BUILD_LOG_SUFFIX}"))
}

/// Copy `source` byte-for-byte to `destination` through a temp file in the
/// destination directory. Returns the SHA-256 hex of the copied bytes.
fn copy_atomic(source: &Path, destination: &Path) -> Result<String, InvokerError> {
    let wrap = |e: std::io::Error| InvokerError::Archive {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        reason: e.to_string(),
    };

    let dir = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut input = File::open(source).map_err(wrap)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(wrap)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = input.read(&mut buf).map_err(wrap)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        tmp.write_all(&buf[..n]).map_err(wrap)?;
    }
    tmp.flush().map_err(wrap)?;
    tmp.persist(destination).map_err(|e| wrap(e.error))?;

    Ok(hex::encode(hasher.finalize()))
}

/// Copy reports into `target_dir` under collision-free sequential names.
///
/// Creates `target_dir` if needed. A failed copy is recorded and the
/// remaining sources are still attempted; nothing is rolled back.
pub fn archive_reports<P: AsRef<Path>>(target_dir: &Path, sources: &[P]) -> ArchiveReport {
    if let Err(e) = fs::create_dir_all(target_dir) {
        return ArchiveReport::fail_all(
            sources,
            &format!("cannot create {}: {e}", target_dir.display()),
        );
    }

    let mut report = ArchiveReport::default();
    for (index, source) in sources.iter().enumerate() {
        let source = source.as_ref();
        let destination = target_dir.join(report_archive_name(index));
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "archiving report"
        );
        let outcome = copy_atomic(source, &destination);
        report.record(source, destination, outcome);
    }
    report
}

/// Copy build logs into `target_dir` as `{parentDirName}-build.log`.
pub fn archive_build_logs<P: AsRef<Path>>(target_dir: &Path, sources: &[P]) -> ArchiveReport {
    if let Err(e) = fs::create_dir_all(target_dir) {
        return ArchiveReport::fail_all(
            sources,
            &format!("cannot create {}: {e}", target_dir.display()),
        );
    }

    let mut report = ArchiveReport::default();
    for source in sources {
        let source = source.as_ref();
        let Some(name) = build_log_archive_name(source) else {
            report.failures.push(ArchiveFailure {
                source: source.to_path_buf(),
                destination: None,
                reason: "build log has no parent directory name".to_string(),
            });
            continue;
        };
        let destination = target_dir.join(name);
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "archiving build log"
        );
        let outcome = copy_atomic(source, &destination);
        report.record(source, destination, outcome);
    }
    report
}
