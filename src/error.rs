use thiserror::Error;

/// Result type for DQN operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the learning core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DqnError {
    /// Buffer holds fewer transitions than a sample asked for
    #[error("Insufficient data: requested {requested} transitions, buffer holds {available}")]
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// A state vector or parameter tensor has the wrong shape
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: String,
        actual: String,
    },

    /// Out-of-range hyperparameter
    #[error("Invalid configuration '{name}': {reason}")]
    InvalidConfiguration {
        name: String,
        reason: String,
    },

    /// Action index outside the action set
    #[error("Invalid action {action}: must be less than {num_actions}")]
    InvalidAction {
        action: usize,
        num_actions: usize,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DqnError {
    fn from(err: std::io::Error) -> Self {
        DqnError::Io(err.to_string())
    }
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl DqnError {
    pub fn shape_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_configuration<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
