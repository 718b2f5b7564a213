//! Step configuration.
//!
//! ```toml
//! filename_pattern = "target/invoker-reports/BUILD*.xml"
//! build_logs = "target/it/*"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolve::DEFAULT_PATTERN;

/// Configuration for one invoker report step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Ant glob, or legacy `;`/`:`/`,` list of files and directories.
    pub filename_pattern: String,

    /// Base path whose `build.log` files are archived with the reports.
    pub build_logs: Option<String>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            filename_pattern: DEFAULT_PATTERN.to_string(),
            build_logs: None,
        }
    }
}

impl StepConfig {
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            filename_pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn with_build_logs(mut self, base_path: impl Into<String>) -> Self {
        self.build_logs = Some(base_path.into());
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
