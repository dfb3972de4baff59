/// Error handling for the API server
///
/// One unified error type maps every failure to an HTTP response. Handlers
/// return `Result<T, ApiError>`; lower-level errors (stores, auth, pipeline)
/// convert in via `From` so classification happens exactly once.
///
/// Two rules shape the mapping:
///
/// - `Unauthorized` never says *why*: expired, forged, and missing
///   credentials share one response body.
/// - Internal detail goes to the operational log, never to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use scribeflow_pipeline::error::PipelineError;
use scribeflow_shared::auth::jwt::TokenError;
use scribeflow_shared::auth::middleware::AuthError;
use scribeflow_shared::auth::password::PasswordError;
use scribeflow_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): invalid payload, malformed id, fatal input stage
    BadRequest(String),

    /// Unauthorized (401); the inner detail is logged, not echoed
    Unauthorized(String),

    /// Conflict (409), e.g. duplicate email
    Conflict(String),

    /// Not found (404)
    NotFound(String),

    /// Field-level validation failures (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Article generation failed (500)
    GenerationFailed(String),

    /// SEO post-processing failed (500)
    PostProcessFailed(String),

    /// Store or required configuration missing (503)
    ServiceUnavailable(String),

    /// Unexpected failure (500); detail logged, generic message returned
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            ApiError::PostProcessFailed(msg) => write!(f, "Post-processing failed: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(detail) => {
                // One body for every authentication failure mode.
                tracing::debug!(detail = %detail, "Unauthorized request");
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Invalid authentication credentials".to_string(),
                    None,
                )
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::GenerationFailed(detail) => {
                tracing::error!(detail = %detail, "Article generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "generation_failed",
                    "Blog generation failed".to_string(),
                    None,
                )
            }
            ApiError::PostProcessFailed(detail) => {
                tracing::error!(detail = %detail, "SEO post-processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "post_process_failed",
                    "Blog post-processing failed".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::InternalError(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => ApiError::Conflict("Resource already exists".to_string()),
            StoreError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            StoreError::Backend(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert pipeline errors to API errors per the stage failure table
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => {
                ApiError::BadRequest(format!("URL validation failed: {}", msg))
            }
            PipelineError::ExtractionFailed(msg) => {
                ApiError::BadRequest(format!("Content extraction failed: {}", msg))
            }
            PipelineError::NoContent => {
                ApiError::BadRequest("No usable content found after cleaning".to_string())
            }
            PipelineError::AnalysisFailed(msg) => {
                ApiError::BadRequest(format!("Content analysis failed: {}", msg))
            }
            PipelineError::GenerationFailed(msg) => ApiError::GenerationFailed(msg),
            PipelineError::PostProcessFailed(msg) => ApiError::PostProcessFailed(msg),
            PipelineError::Storage(err) => err.into(),
        }
    }
}

/// Convert identity middleware errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(format!("{:?}", err))
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::CreateError(msg) => ApiError::InternalError(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert credential hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Credential operation failed: {}", err))
    }
}

/// Convert validator failures to field-level details
pub fn validation_details(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Blog not found".to_string());
        assert_eq!(err.to_string(), "Not found: Blog not found");
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::ValidationError(vec![]), StatusCode::BAD_REQUEST),
            (
                ApiError::GenerationFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_fatal_input_stages_map_to_400() {
        for err in [
            PipelineError::InvalidInput("bad".into()),
            PipelineError::ExtractionFailed("bad".into()),
            PipelineError::NoContent,
            PipelineError::AnalysisFailed("bad".into()),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_generation_stages_map_to_500() {
        for err in [
            PipelineError::GenerationFailed("bad".into()),
            PipelineError::PostProcessFailed("bad".into()),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let api: ApiError = StoreError::Duplicate.into();
        assert_eq!(api.into_response().status(), StatusCode::CONFLICT);
    }
}
