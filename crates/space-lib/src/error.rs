//! Error types for capacity estimation

use thiserror::Error;

/// Errors that can abort an invocation
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("remote query failed: {0}")]
    TransientQuery(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to publish metric: {0}")]
    Publish(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EstimateError {
    pub fn cluster_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "cluster",
            id: id.into(),
        }
    }

    pub fn service_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "service",
            id: id.into(),
        }
    }

    pub fn task_definition_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "task definition",
            id: id.into(),
        }
    }

    pub fn instance_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "container instance",
            id: id.into(),
        }
    }

    /// Short label for log fields and failure counters
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::TransientQuery(_) => "transient_query",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Publish(_) => "publish",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type EstimateResult<T> = Result<T, EstimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = EstimateError::cluster_not_found("prod");
        assert_eq!(err.to_string(), "cluster not found: prod");
        assert_eq!(err.kind(), "not_found");
    }
}
