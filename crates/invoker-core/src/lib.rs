//! Invoker Core - Maven Invoker report recording
//!
//! Post-processes a build that ran Maven Invoker integration tests:
//! - Discovers `BUILD*.xml` reports in the build workspace
//! - Archives durable copies under the build's own root directory
//! - Parses each report into a [`BuildJobRecord`]
//! - Aggregates records, in discovery order, into a [`BuildAction`]

pub mod action;
pub mod aggregate;
pub mod archive;
pub mod config;
pub mod error;
pub mod parser;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod step;
pub mod telemetry;
pub mod workspace;

pub use action::{BuildAction, RESULTS_FILE_NAME};
pub use aggregate::{aggregate, ResultSet, ResultSummary};
pub use archive::{
    archive_build_logs, archive_reports, ArchiveFailure, ArchiveReport, ArchivedFile,
};
pub use config::StepConfig;
pub use error::{InvokerError, Result};
pub use parser::{parse, parse_bytes, parse_file};
pub use record::{BuildJobRecord, BuildResult};
pub use registry::{register_builtin_steps, StepDescriptor, StepRegistry, INVOKER_STEP_ID};
pub use resolve::{locate_build_logs, resolve, ReportLocation, DEFAULT_PATTERN};
pub use step::{archive_directory, BuildContext, InvokerReportStep, ARCHIVE_DIR_NAME};
pub use telemetry::{init_tracing, LogFormat};
pub use workspace::{FsWorkspace, Workspace};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
