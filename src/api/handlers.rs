//! HTTP request handlers for the Browo Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    XpAction, evaluate_carryover, format_expiry_date, level_title, progress_to_next_level,
    xp_to_next_level,
};
use crate::error::EngineError;
use crate::models::{VacationBalance, XpEvent, XpSource};

use super::request::{CarryoverRequest, GrantXpRequest};
use super::response::{
    ApiError, ApiErrorResponse, CarryoverResponse, HealthResponse, XpGrantResponse,
    XpStatusResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/xp/grant", post(grant_xp_handler))
        .route("/xp/:user_id", get(xp_status_handler))
        .route("/xp/:user_id/events", get(xp_events_handler))
        .route("/vacation/carryover", post(carryover_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for POST /xp/grant.
///
/// Grants either an explicit XP amount or the configured reward for an
/// action, and returns the new balance together with the level change.
async fn grant_xp_handler(
    State(state): State<AppState>,
    payload: Result<Json<GrantXpRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing XP grant request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    if let Err(err) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Invalid XP grant request");
        return engine_error_response(err);
    }

    let (xp_amount, source, default_reason) = match request.action.as_deref() {
        Some(action_name) => {
            let action: XpAction = match action_name.parse() {
                Ok(action) => action,
                Err(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        action = %action_name,
                        "Unknown XP action"
                    );
                    return engine_error_response(err);
                }
            };
            let reward = state.config().xp_reward(action);
            (
                i64::try_from(reward).unwrap_or(i64::MAX),
                action.source(),
                action.to_string(),
            )
        }
        None => (
            request.xp_amount.unwrap_or_default(),
            XpSource::System,
            "manual_grant".to_string(),
        ),
    };
    let reason = request.reason.unwrap_or(default_reason);

    let start_time = Instant::now();
    let grant = match state
        .store()
        .grant_xp(&request.user_id, xp_amount, &reason, source, Utc::now())
        .await
    {
        Ok(grant) => grant,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "XP grant rejected");
            return engine_error_response(err);
        }
    };

    info!(
        correlation_id = %correlation_id,
        user_id = %request.user_id,
        xp_amount = grant.gain.xp_amount,
        new_total_xp = grant.gain.new_total_xp,
        leveled_up = grant.gain.leveled_up,
        duration_us = start_time.elapsed().as_micros(),
        "XP grant completed successfully"
    );

    let gain = grant.gain;
    let body = XpGrantResponse {
        event_id: grant.event.id,
        user_id: request.user_id,
        xp_amount: gain.xp_amount,
        source,
        prior_total_xp: gain.prior_total_xp,
        new_total_xp: gain.new_total_xp,
        prior_level: gain.prior_level,
        new_level: gain.new_level,
        leveled_up: gain.leveled_up,
        title: level_title(gain.new_level),
        progress_percent: progress_to_next_level(gain.new_total_xp, gain.new_level),
        audit_step: gain.audit_step,
    };

    json_response(StatusCode::OK, body)
}

/// Handler for GET /xp/:user_id.
async fn xp_status_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<XpStatusResponse> {
    let xp = state.store().xp_state(&user_id).await;

    Json(XpStatusResponse {
        user_id,
        total_xp: xp.total_xp,
        level: xp.level(),
        title: xp.title(),
        progress_percent: xp.progress_percent(),
        xp_to_next_level: xp_to_next_level(xp.total_xp),
    })
}

/// Handler for GET /xp/:user_id/events.
async fn xp_events_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<XpEvent>> {
    Json(state.store().events_for(&user_id).await)
}

/// Handler for POST /vacation/carryover.
///
/// Projects the given balance against the configured cutoff, at `as_of` or
/// at the current local time.
async fn carryover_handler(
    State(state): State<AppState>,
    payload: Result<Json<CarryoverRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing carryover request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let balance = match VacationBalance::try_from(&request) {
        Ok(balance) => balance,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid vacation balance");
            return engine_error_response(err);
        }
    };

    let evaluated_at = request
        .as_of
        .unwrap_or_else(|| Local::now().naive_local());
    let result = evaluate_carryover(&balance, state.config().carryover(), evaluated_at);

    info!(
        correlation_id = %correlation_id,
        total_available_days = %result.total_available_days,
        carryover_expired = result.carryover_expired,
        days_expiring_soon = %result.days_expiring_soon,
        "Carryover evaluated"
    );

    let body = CarryoverResponse {
        evaluated_at,
        days_until_expiry: result.days_until_expiry(),
        expiry_date_formatted: format_expiry_date(
            result.carryover_expiry_date.date(),
            &request.locale,
        ),
        would_use_carryover_days: request
            .requested_days
            .map(|days| result.would_use_carryover_days(days)),
        result,
    };

    json_response(StatusCode::OK, body)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    json_response(StatusCode::BAD_REQUEST, error)
}
