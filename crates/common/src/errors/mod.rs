//! Error types for ReviewFlow services
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::phase::{PaperPhase, TrackPhase};

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    NoBidders,

    // Authentication errors (2xxx)
    Unauthorized,

    // Authorization errors (3xxx)
    Forbidden,

    // Resource errors (4xxx)
    NotFound,
    TrackNotFound,
    PaperNotFound,
    SubmissionNotFound,
    ReviewNotFound,

    // Workflow conflicts (5xxx)
    WrongTrackPhase,
    WrongPaperPhase,
    ConflictOfInterest,
    ReviewsNotUnanimous,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // External service errors (8xxx)
    UpstreamError,
    UpstreamPayload,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
    NothingToFinalize,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::NoBidders => 1002,

            // Auth (2xxx)
            ErrorCode::Unauthorized => 2001,

            // Authz (3xxx)
            ErrorCode::Forbidden => 3001,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::TrackNotFound => 4002,
            ErrorCode::PaperNotFound => 4003,
            ErrorCode::SubmissionNotFound => 4004,
            ErrorCode::ReviewNotFound => 4005,

            // Workflow conflicts (5xxx)
            ErrorCode::WrongTrackPhase => 5001,
            ErrorCode::WrongPaperPhase => 5002,
            ErrorCode::ConflictOfInterest => 5003,
            ErrorCode::ReviewsNotUnanimous => 5004,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            // External (8xxx)
            ErrorCode::UpstreamError => 8001,
            ErrorCode::UpstreamPayload => 8002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
            ErrorCode::NothingToFinalize => 9004,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Automatic assignment requires at least one bid per paper
    #[error("Paper {paper_id} has no bidders; assign manually")]
    NoBidders { paper_id: i64 },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // Authorization errors
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Track not found: conference {conference_id}, track {track_id}")]
    TrackNotFound { conference_id: i64, track_id: i64 },

    #[error("Paper not found: {id}")]
    PaperNotFound { id: i64 },

    #[error("Submission not found: {id}")]
    SubmissionNotFound { id: i64 },

    #[error("Review not found: paper {paper_id}, reviewer {reviewer_id}")]
    ReviewNotFound { paper_id: i64, reviewer_id: i64 },

    // Workflow conflicts
    #[error("Track is in phase {actual:?}, operation requires {required}")]
    WrongTrackPhase { required: String, actual: TrackPhase },

    #[error("Paper is in phase {actual:?}, operation requires {required}")]
    WrongPaperPhase { required: String, actual: PaperPhase },

    #[error("Reviewer {reviewer_id} has a conflict of interest with paper {paper_id}")]
    ConflictOfInterest { reviewer_id: i64, paper_id: i64 },

    #[error("Reviews for paper {paper_id} are not all positive nor all negative")]
    ReviewsNotUnanimous { paper_id: i64 },

    /// A paper in discussion with zero reviews should not exist; this is a
    /// broken-state error, not a caller mistake
    #[error("Paper {paper_id} has no reviews to finalize")]
    NothingToFinalize { paper_id: i64 },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // External service errors
    #[error("External service error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// An external system answered with a payload this service cannot use,
    /// e.g. an unknown role name or a non-success status.
    #[error("Unusable upstream response from {service}: {message}")]
    UpstreamPayload { service: String, message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::NoBidders { .. } => ErrorCode::NoBidders,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::TrackNotFound { .. } => ErrorCode::TrackNotFound,
            AppError::PaperNotFound { .. } => ErrorCode::PaperNotFound,
            AppError::SubmissionNotFound { .. } => ErrorCode::SubmissionNotFound,
            AppError::ReviewNotFound { .. } => ErrorCode::ReviewNotFound,
            AppError::WrongTrackPhase { .. } => ErrorCode::WrongTrackPhase,
            AppError::WrongPaperPhase { .. } => ErrorCode::WrongPaperPhase,
            AppError::ConflictOfInterest { .. } => ErrorCode::ConflictOfInterest,
            AppError::ReviewsNotUnanimous { .. } => ErrorCode::ReviewsNotUnanimous,
            AppError::NothingToFinalize { .. } => ErrorCode::NothingToFinalize,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::UpstreamPayload { .. } => ErrorCode::UpstreamPayload,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } | AppError::NoBidders { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::TrackNotFound { .. }
            | AppError::PaperNotFound { .. }
            | AppError::SubmissionNotFound { .. }
            | AppError::ReviewNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::WrongTrackPhase { .. }
            | AppError::WrongPaperPhase { .. }
            | AppError::ConflictOfInterest { .. }
            | AppError::ReviewsNotUnanimous { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::NothingToFinalize { .. }
            | AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::UpstreamPayload { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                details: None,
                request_id: None, // Should be filled by middleware
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::PaperNotFound { id: 42 };
        assert_eq!(err.code(), ErrorCode::PaperNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_phase_conflict_is_409() {
        let err = AppError::WrongTrackPhase {
            required: "BIDDING".into(),
            actual: TrackPhase::Assigning,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_coi_is_409() {
        let err = AppError::ConflictOfInterest {
            reviewer_id: 7,
            paper_id: 12,
        };
        assert_eq!(err.code(), ErrorCode::ConflictOfInterest);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_no_bidders_is_400() {
        let err = AppError::NoBidders { paper_id: 3 };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_finalize_is_server_error() {
        // A paper in discussion always has reviews; finalizing one without
        // any is a broken state, not a request conflict.
        let err = AppError::NothingToFinalize { paper_id: 3 };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_upstream_payload_is_server_error() {
        let err = AppError::UpstreamPayload {
            service: "users".into(),
            message: "unknown role name: Janitor".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }
}
