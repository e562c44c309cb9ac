//! Service layer error types
//!
//! Services abstract over the HTTP boundary; every failure surfaces to
//! the UI as one blocking notification and the operation aborts. There
//! is no retry logic anywhere in this layer.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::ports::ApiError;

/// Errors that can occur in service operations
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The HTTP boundary failed (transport or non-success status)
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Response arrived but was not the shape we expected
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl ServiceError {
    /// The message shown to the user for this failure.
    pub fn user_message(&self, operation: &str) -> String {
        tracing::warn!("{operation} failed: {self}");
        format!("{operation} failed: {self}")
    }
}

/// Decode a JSON value into the expected response type.
pub fn parse_value<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| ServiceError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_mismatch_is_parse_error() {
        let result: Result<i64, _> = parse_value(Value::String("nope".to_string()));
        assert!(matches!(result, Err(ServiceError::Parse(_))));
    }

    #[test]
    fn test_api_error_converts() {
        let err: ServiceError = ApiError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::Api(ApiError::Status { status: 502, .. })));
    }
}
