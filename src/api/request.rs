//! Request types for the Browo Engine API.
//!
//! This module defines the JSON request structures for the XP and vacation
//! endpoints.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::VacationBalance;

/// Request body for the `/xp/grant` endpoint.
///
/// Exactly one of `xp_amount` and `action` must be present. With `action`
/// the configured reward for that action is granted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantXpRequest {
    /// The user receiving the XP.
    pub user_id: String,
    /// An explicit XP amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_amount: Option<i64>,
    /// A rewardable action (e.g., "quiz_passed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Why the XP is granted; defaults to the action name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GrantXpRequest {
    /// Checks the fields that serde cannot express.
    pub fn validate(&self) -> EngineResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(EngineError::InvalidArgument {
                field: "user_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        match (&self.xp_amount, &self.action) {
            (Some(_), Some(_)) => Err(EngineError::InvalidArgument {
                field: "xp_amount".to_string(),
                message: "give either xp_amount or action, not both".to_string(),
            }),
            (None, None) => Err(EngineError::InvalidArgument {
                field: "xp_amount".to_string(),
                message: "either xp_amount or action is required".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Request body for the `/vacation/carryover` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarryoverRequest {
    /// Allowance for the current year.
    pub current_year_days: Decimal,
    /// Days left over from the previous year.
    pub previous_year_remaining_days: Decimal,
    /// Evaluate at this local time instead of now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDateTime>,
    /// Days of a planned leave request to check against the allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_days: Option<Decimal>,
    /// Locale for the formatted expiry date.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "de-DE".to_string()
}

impl TryFrom<&CarryoverRequest> for VacationBalance {
    type Error = EngineError;

    fn try_from(req: &CarryoverRequest) -> EngineResult<Self> {
        VacationBalance::new(req.current_year_days, req.previous_year_remaining_days)
    }
}
