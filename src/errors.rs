// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Translation error: {0}")]
    TranslationError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl From<csv::Error> for LeadError {
    fn from(e: csv::Error) -> Self {
        LeadError::ExportError(e.to_string())
    }
}

/// Convert LeadError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for LeadError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            LeadError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            LeadError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            LeadError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            LeadError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            LeadError::ExternalApiError(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR"),
            LeadError::TranslationError(_) => (StatusCode::BAD_GATEWAY, "TRANSLATION_ERROR"),
            LeadError::ExportError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            LeadError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LeadError::ValidationError(_) => StatusCode::BAD_REQUEST,
            LeadError::Unauthorized => StatusCode::UNAUTHORIZED,
            LeadError::Forbidden => StatusCode::FORBIDDEN,
            LeadError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            LeadError::TranslationError(_) => StatusCode::BAD_GATEWAY,
            LeadError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
