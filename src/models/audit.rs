//! Audit models shared by every calculator.
//!
//! Each calculation records an [`AuditStep`] that captures its input, output
//! and a human-readable explanation, so a grant or a carryover projection can
//! be reconstructed after the fact.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// # Example
///
/// ```
/// use browo_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "xp_gain".to_string(),
///     rule_name: "XP Gain".to_string(),
///     input: serde_json::json!({ "xp_amount": 10 }),
///     output: serde_json::json!({ "new_total_xp": 10 }),
///     reasoning: "0 + 10 = 10 XP".to_string(),
/// };
/// assert_eq!(step.rule_id, "xp_gain");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
