//! Startup error taxonomy.
//!
//! [`StartupError`] is what the hydration coordinator fails with. Its three
//! families map onto [`ErrorKind`]: a store that could not be read or
//! parsed, a migration that did not complete, and anything else. The
//! application shell never sees the error itself, only an [`ErrorReport`]
//! rendered from it.
//!
//! Display strings describe only their own layer. Causes are reached through
//! `source()`, which is what [`ErrorReport`] walks to build its trace.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use exilence_storage::StorageError;

use crate::store::StoreName;

/// Boxed error returned by migration step bodies.
pub type StepError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a single store failed to hydrate.
#[derive(Debug, Error)]
pub enum HydrationError {
    /// Reading the record from storage failed.
    #[error("storage read failed")]
    Storage(#[from] StorageError),

    /// The record exists but its payload does not parse.
    #[error("payload does not parse")]
    Parse(#[from] serde_json::Error),
}

/// Errors produced by the migration runner and plan construction.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A step body returned an error.
    #[error("migration step {version} ({description}) failed")]
    Step {
        version: u32,
        description: String,
        #[source]
        source: StepError,
    },

    /// The step ran but the new version could not be recorded.
    #[error("failed to record migration version {version}")]
    Record {
        version: u32,
        #[source]
        source: StorageError,
    },

    /// The migration record could not be serialized.
    #[error("failed to serialize migration record")]
    Serialization(#[from] serde_json::Error),

    /// Two steps in a plan share a version.
    #[error("duplicate migration step version {version}")]
    DuplicateStep { version: u32 },

    /// Version 0 means "nothing applied" and cannot name a step.
    #[error("migration step version must be greater than zero")]
    ZeroVersion,
}

impl MigrationError {
    /// The version the failure is attributed to, when there is one.
    pub fn version(&self) -> Option<u32> {
        match self {
            MigrationError::Step { version, .. }
            | MigrationError::Record { version, .. }
            | MigrationError::DuplicateStep { version } => Some(*version),
            MigrationError::Serialization(_) | MigrationError::ZeroVersion => None,
        }
    }
}

/// Errors that end startup in the failed state.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A named store could not be hydrated.
    #[error("failed to hydrate store '{store}'")]
    Hydration {
        store: StoreName,
        #[source]
        source: HydrationError,
    },

    /// The migration runner stopped before reaching the latest version.
    #[error(transparent)]
    MigrationStep(#[from] MigrationError),

    /// Anything else caught at the top level.
    #[error("unexpected startup failure: {0}")]
    Unknown(String),
}

impl StartupError {
    pub fn hydration(store: StoreName, source: impl Into<HydrationError>) -> Self {
        StartupError::Hydration {
            store,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StartupError::Hydration { .. } => ErrorKind::HydrationFailure,
            StartupError::MigrationStep(_) => ErrorKind::MigrationStepFailure,
            StartupError::Unknown(_) => ErrorKind::UnknownFailure,
        }
    }
}

/// Coarse classification carried into the error view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    HydrationFailure,
    MigrationStepFailure,
    UnknownFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::HydrationFailure => "HydrationFailure",
            ErrorKind::MigrationStepFailure => "MigrationStepFailure",
            ErrorKind::UnknownFailure => "UnknownFailure",
        };
        f.write_str(label)
    }
}

/// What the error view renders: the failure message plus its cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    /// `source()` chain below `message`, outermost first.
    pub trace: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(kind: ErrorKind, error: &(dyn StdError + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }
        ErrorReport {
            kind,
            message: error.to_string(),
            trace,
        }
    }
}

impl From<&StartupError> for ErrorReport {
    fn from(error: &StartupError) -> Self {
        ErrorReport::from_error(error.kind(), error)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind, self.message)?;
        for (depth, cause) in self.trace.iter().enumerate() {
            writeln!(f, "  {depth}: caused by: {cause}")?;
        }
        Ok(())
    }
}
