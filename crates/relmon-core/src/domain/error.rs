//! Domain-level error taxonomy for relmon.

use relmon_state::StorageError;

/// relmon domain errors.
#[derive(Debug, thiserror::Error)]
pub enum RelmonError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("invalid correlation for build {build_id}: {value}")]
    InvalidCorrelation { build_id: u64, value: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relmon domain operations.
pub type Result<T> = std::result::Result<T, RelmonError>;

/// Failure reported by an external collaborator (validator, builder,
/// notifier, patcher).
///
/// One type serves every collaborator. Builders may attach the captured
/// process output and, when the build was already submitted before the
/// failure, its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
    pub trace: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub build_id: Option<u64>,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn with_output(mut self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self.stderr = Some(stderr.into());
        self
    }

    /// Mark the failure as happening after the build was submitted.
    pub fn with_build_id(mut self, build_id: u64) -> Self {
        self.build_id = Some(build_id);
        self
    }
}

/// Result type for every collaborator call.
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;
