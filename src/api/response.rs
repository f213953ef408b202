//! Error responses for the payroll API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required field '{}' was not provided in the request", field),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 500 response.
    pub fn internal(error: ApiError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            EngineError::ConfigurationMissing { .. } | EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
            EngineError::DataSource { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("DATA_SOURCE_ERROR", "Data source unavailable", message),
            ),
            EngineError::RunAlreadyExists { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "RUN_ALREADY_EXISTS",
                    message,
                    "Reject the existing run before initiating a new one for the same period",
                ),
            ),
            EngineError::RunNotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("RUN_NOT_FOUND", message))
            }
            EngineError::SigningBonusNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("SIGNING_BONUS_NOT_FOUND", message),
            ),
            EngineError::TerminationBenefitNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("TERMINATION_BENEFIT_NOT_FOUND", message),
            ),
            EngineError::InvalidStateTransition { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_STATE_TRANSITION", message),
            ),
            EngineError::ConcurrentModification { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "CONCURRENT_MODIFICATION",
                    message,
                    "Reload the run and retry",
                ),
            ),
            EngineError::NotPending { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("NOT_PENDING", message))
            }
            EngineError::InvalidUpdate { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response: ApiErrorResponse = EngineError::RunAlreadyExists {
            period: "2025-03".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "RUN_ALREADY_EXISTS");
        assert!(response.error.message.contains("2025-03"));
    }

    #[test]
    fn test_invalid_transition_maps_to_400() {
        let response: ApiErrorResponse = EngineError::InvalidStateTransition {
            run_id: Uuid::nil(),
            transition: "lock".to_string(),
            status: "UNDER_REVIEW".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_STATE_TRANSITION");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response: ApiErrorResponse = EngineError::SigningBonusNotFound {
            id: "sb_9".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
