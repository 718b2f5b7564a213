//! Build workspace handle.
//!
//! The host hands the step a [`Workspace`] per invocation. [`FsWorkspace`]
//! is the local-filesystem implementation; listing follows Ant include
//! semantics so patterns written for the original recorder keep working.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{InvokerError, Result};

/// Root directory abstraction borrowed from the host for one invocation.
pub trait Workspace: Send + Sync {
    /// Workspace root directory.
    fn root(&self) -> &Path;

    /// List regular files under `base` matching Ant-style `includes`,
    /// in a deterministic order.
    fn list_under(&self, base: &Path, includes: &str) -> Result<Vec<PathBuf>>;

    /// List regular files under the root matching `includes`.
    fn list(&self, includes: &str) -> Result<Vec<PathBuf>> {
        self.list_under(self.root(), includes)
    }

    /// Resolve `relative` against the root. Absolute paths replace the root.
    fn child(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Workspace backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list_under(&self, base: &Path, includes: &str) -> Result<Vec<PathBuf>> {
        let Some(matcher) = build_include_set(includes)? else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for entry in WalkDir::new(base).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable workspace entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(base) else {
                continue;
            };
            if matcher.is_match(relative) {
                matches.push(entry.into_path());
            }
        }
        Ok(matches)
    }
}

/// Normalize one Ant include into glob syntax.
///
/// Backslashes become `/`, a trailing `/` means everything below it, and
/// a leading `./` is dropped. Ant only knows `*`, `?` and `**`, so glob
/// class and alternation characters are escaped to match themselves.
fn normalize_include(include: &str) -> String {
    let mut pattern = include.trim().replace('\\', "/");
    while let Some(stripped) = pattern.strip_prefix("./") {
        pattern = stripped.to_string();
    }
    if pattern.ends_with('/') {
        pattern.push_str("**");
    }

    let mut glob = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '[' | ']' | '{' | '}' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            _ => glob.push(c),
        }
    }
    glob
}

/// Compile a comma-separated Ant include list. Returns `None` when the list
/// holds no patterns at all.
fn build_include_set(includes: &str) -> Result<Option<GlobSet>> {
    let patterns: Vec<String> = includes
        .split(',')
        .map(normalize_include)
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in &patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|e| InvokerError::Pattern {
                pattern: includes.to_string(),
                reason: e.to_string(),
            })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| InvokerError::Pattern {
        pattern: includes.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(set))
}
