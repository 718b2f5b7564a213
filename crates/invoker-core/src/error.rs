//! Error taxonomy for report discovery, parsing and archiving.

use std::path::{Path, PathBuf};

/// Location label used for reports parsed from an in-memory string.
pub const INLINE_REPORT: &str = "<inline>";

/// Errors produced by the invoker report pipeline.
///
/// Only [`InvokerError::Parse`] and [`InvokerError::Io`] abort a step run.
/// Pattern errors are absorbed by the resolver's legacy fallback, and archive
/// errors are folded into an [`crate::archive::ArchiveReport`].
#[derive(Debug, thiserror::Error)]
pub enum InvokerError {
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("malformed report {location}: {reason}")]
    Parse { location: String, reason: String },

    #[error("failed to archive {} to {}: {reason}", .from.display(), .to.display())]
    Archive {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("invalid step configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("build step already registered: {0}")]
    DuplicateStep(String),

    #[error("unknown build step: {0}")]
    UnknownStep(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InvokerError {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            location: INLINE_REPORT.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach a file path to a parse error raised against in-memory content.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Parse { reason, .. } => Self::Parse {
                location: path.display().to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Whether this error must abort the step rather than be logged.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Pattern { .. } | Self::Archive { .. })
    }
}

/// Result type for invoker report operations.
pub type Result<T> = std::result::Result<T, InvokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = InvokerError::parse("missing <result>");
        let msg = err.to_string();
        assert!(msg.contains(INLINE_REPORT));
        assert!(msg.contains("missing <result>"));
    }

    #[test]
    fn test_parse_error_at_path() {
        let err = InvokerError::parse("bad time").at_path(Path::new("it/BUILD-a.xml"));
        match err {
            InvokerError::Parse { location, reason } => {
                assert_eq!(location, "it/BUILD-a.xml");
                assert_eq!(reason, "bad time");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_at_path_leaves_other_kinds_alone() {
        let err = InvokerError::UnknownStep("x".to_string()).at_path(Path::new("a.xml"));
        assert!(matches!(err, InvokerError::UnknownStep(_)));
    }

    #[test]
    fn test_fatality() {
        assert!(InvokerError::parse("x").is_fatal());
        assert!(!InvokerError::Pattern {
            pattern: "[".to_string(),
            reason: "unclosed".to_string(),
        }
        .is_fatal());
        assert!(!InvokerError::Archive {
            from: PathBuf::from("a"),
            to: PathBuf::from("b"),
            reason: "denied".to_string(),
        }
        .is_fatal());
    }
}
