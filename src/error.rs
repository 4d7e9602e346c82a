//! Unified error hierarchy for RunPlan
//!
//! All failures are deterministic functions of input: the core performs
//! no I/O of its own, so there are no transient error kinds to retry
//! besides storage conflicts.

use thiserror::Error;

/// Top-level error type for all RunPlan operations
#[derive(Debug, Error)]
pub enum RunPlanError {
    /// Malformed or missing profile/entry fields
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced runner, plan, or workout does not exist
    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Concurrent plan write detected; caller must reload and retry
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage collaborator errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors (config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation failures, naming the first offending field
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Required field absent
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Field present but outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Personal record time string could not be parsed
    #[error("Unparseable time for {field}: {input}")]
    UnparseableTime { field: &'static str, input: String },

    /// Operation not allowed in the entity's current state
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
}

/// Missing-entity errors
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("Runner not found: {runner_id}")]
    Runner { runner_id: String },

    #[error("No training plan for runner: {runner_id}")]
    Plan { runner_id: String },

    #[error("Workout not found: {workout_id}")]
    Workout { workout_id: String },
}

/// Storage collaborator errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for RunPlan operations
pub type Result<T> = std::result::Result<T, RunPlanError>;

impl RunPlanError {
    /// Check if the caller can resolve the error by reloading and retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunPlanError::Conflict(_))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RunPlanError::Validation(_) => ErrorSeverity::Warning,
            RunPlanError::NotFound(_) => ErrorSeverity::Warning,
            RunPlanError::Conflict(_) => ErrorSeverity::Warning,
            RunPlanError::Storage(_) => ErrorSeverity::Error,
            RunPlanError::Io(_) => ErrorSeverity::Error,
            RunPlanError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RunPlanError::Validation(ValidationError::MissingField { field }) => {
                format!("Please fill in the {} field.", field)
            }
            RunPlanError::Validation(ValidationError::UnparseableTime { field, input }) => {
                format!(
                    "Could not read \"{}\" as a time for {}. Use mm:ss or h:mm:ss.",
                    input, field
                )
            }
            RunPlanError::NotFound(NotFoundError::Plan { .. }) => {
                "No training plan yet. Generate one first.".to_string()
            }
            RunPlanError::Conflict(_) => {
                "Your plan changed while this request was running. Please retry.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = RunPlanError::Validation(ValidationError::MissingField { field: "age" });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = RunPlanError::Internal("test".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_retryable() {
        let err = RunPlanError::Conflict("plan version moved".to_string());
        assert!(err.is_retryable());

        let err = RunPlanError::Validation(ValidationError::MissingField { field: "age" });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = RunPlanError::Validation(ValidationError::UnparseableTime {
            field: "five_k",
            input: "fast".to_string(),
        });
        assert!(err.user_message().contains("mm:ss"));

        let err = RunPlanError::NotFound(NotFoundError::Plan {
            runner_id: "r1".to_string(),
        });
        assert!(err.user_message().contains("Generate one first"));
    }
}
