//! Normalized build job records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvokerError;

/// Outcome of a single Maven Invoker project execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    FailurePreHook,
    FailureBuild,
    FailurePostHook,
    Skipped,
    Error,
}

impl BuildResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::FailurePreHook => "FAILURE_PRE_HOOK",
            BuildResult::FailureBuild => "FAILURE_BUILD",
            BuildResult::FailurePostHook => "FAILURE_POST_HOOK",
            BuildResult::Skipped => "SKIPPED",
            BuildResult::Error => "ERROR",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success)
    }

    /// Any of the failure variants, including hook failures.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BuildResult::Failure
                | BuildResult::FailurePreHook
                | BuildResult::FailureBuild
                | BuildResult::FailurePostHook
        )
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, BuildResult::Skipped)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BuildResult::Error)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildResult {
    type Err = InvokerError;

    /// Accepts Maven's `failure-build` spelling as well as `FAILURE_BUILD`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "SUCCESS" => Ok(BuildResult::Success),
            "FAILURE" => Ok(BuildResult::Failure),
            "FAILURE_PRE_HOOK" => Ok(BuildResult::FailurePreHook),
            "FAILURE_BUILD" => Ok(BuildResult::FailureBuild),
            "FAILURE_POST_HOOK" => Ok(BuildResult::FailurePostHook),
            "SKIPPED" => Ok(BuildResult::Skipped),
            "ERROR" => Ok(BuildResult::Error),
            _ => Err(InvokerError::parse(format!("unknown build result '{s}'"))),
        }
    }
}

/// One parsed report file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildJobRecord {
    /// Display name of the integration test.
    pub name: String,

    /// Project path relative to the invoker projects directory.
    pub project: String,

    pub description: Option<String>,

    pub failure_message: Option<String>,

    pub result: BuildResult,

    /// Execution time in seconds.
    pub time: f64,

    /// Invoker job type (`normal`, `setup`, `direct`) when the report carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}
