//! HTTP API module for the Browo Engine.
//!
//! This module provides the REST API endpoints for granting XP, reading a
//! user's level, and projecting vacation carryover.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CarryoverRequest, GrantXpRequest};
pub use response::{
    ApiError, CarryoverResponse, HealthResponse, XpGrantResponse, XpStatusResponse,
};
pub use state::AppState;
