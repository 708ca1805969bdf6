//! Response types for the Browo Engine API.
//!
//! This module defines the success bodies returned by the endpoints, the
//! error response structures, and the mapping from [`EngineError`] to HTTP
//! status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{CarryoverResult, LevelTitle};
use crate::error::EngineError;
use crate::models::{AuditStep, XpSource};

/// Response body for `POST /xp/grant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGrantResponse {
    /// The ID of the appended XP event.
    pub event_id: Uuid,
    /// The user who received the XP.
    pub user_id: String,
    /// XP granted.
    pub xp_amount: u64,
    /// The subsystem credited with the grant.
    pub source: XpSource,
    /// XP total before the grant.
    pub prior_total_xp: u64,
    /// XP total after the grant.
    pub new_total_xp: u64,
    /// Level before the grant.
    pub prior_level: u32,
    /// Level after the grant.
    pub new_level: u32,
    /// Whether the grant crossed a level boundary.
    pub leveled_up: bool,
    /// Title for the new level.
    pub title: LevelTitle,
    /// Progress towards the level after `new_level`, in percent.
    pub progress_percent: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Response body for `GET /xp/:user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpStatusResponse {
    /// The user the status belongs to.
    pub user_id: String,
    /// Cumulative XP.
    pub total_xp: u64,
    /// Level derived from the total.
    pub level: u32,
    /// Title for the level.
    pub title: LevelTitle,
    /// Progress towards the next level, in percent.
    pub progress_percent: Decimal,
    /// XP still missing before the next level.
    pub xp_to_next_level: u64,
}

/// Response body for `POST /vacation/carryover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryoverResponse {
    /// The projection itself.
    #[serde(flatten)]
    pub result: CarryoverResult,
    /// The moment the projection was evaluated at.
    pub evaluated_at: NaiveDateTime,
    /// Days until carryover expires; absent once expired.
    pub days_until_expiry: Option<i64>,
    /// The expiry date formatted for the requested locale.
    pub expiry_date_formatted: String,
    /// Whether the requested days would dip into carryover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub would_use_carryover_days: Option<bool>,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the service is serving requests.
    pub status: String,
    /// The crate version.
    pub version: String,
}

/// API error response structure.
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

    /// Creates an unknown XP action error response.
    pub fn reward_not_found(action: &str) -> Self {
        Self::with_details(
            "REWARD_NOT_FOUND",
            format!("XP reward not found for action: {}", action),
            format!("The action '{}' does not grant XP", action),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { field, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Invalid configuration",
                    format!("{}: {}", field, message),
                ),
            },
            EngineError::InvalidArgument { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_ARGUMENT",
                    format!("Invalid argument '{}': {}", field, message),
                    "The request contains an invalid value",
                ),
            },
            EngineError::RewardNotFound { action } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::reward_not_found(&action),
            },
        }
    }
}
