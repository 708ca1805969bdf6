//! XP ledger updates.
//!
//! Applying a gain never writes anything: it returns the new total, the
//! derived levels and the audit record the caller is expected to persist
//! together with the new total.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, XpEvent, XpSource};

use super::level_curve::level_from_xp;

/// The outcome of applying an XP gain to a stored total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGain {
    /// XP total before the gain.
    pub prior_total_xp: u64,
    /// XP granted.
    pub xp_amount: u64,
    /// XP total after the gain.
    pub new_total_xp: u64,
    /// Level derived from the prior total.
    pub prior_level: u32,
    /// Level derived from the new total.
    pub new_level: u32,
    /// Whether the gain crossed at least one level boundary.
    pub leveled_up: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl XpGain {
    /// Builds the immutable audit record for this gain.
    pub fn to_event(
        &self,
        user_id: &str,
        reason: &str,
        source: XpSource,
        timestamp: DateTime<Utc>,
    ) -> XpEvent {
        XpEvent {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            xp_amount: self.xp_amount,
            reason: reason.to_string(),
            source,
            prior_level: self.prior_level,
            new_level: self.new_level,
            leveled_up: self.leveled_up,
            timestamp,
        }
    }
}

/// Applies an XP gain to a stored XP total.
///
/// Both levels are derived from the totals, so a stale stored level can never
/// produce a spurious level-up.
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] when `xp_amount` is negative; XP
/// is only ever granted, never deducted.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::apply_xp_gain;
///
/// let gain = apply_xp_gain(0, 50).unwrap();
/// assert_eq!(gain.new_total_xp, 50);
/// assert_eq!(gain.new_level, 2);
/// assert!(gain.leveled_up);
///
/// assert!(apply_xp_gain(10, -1).is_err());
/// ```
pub fn apply_xp_gain(prior_total_xp: u64, xp_amount: i64) -> EngineResult<XpGain> {
    let xp_amount = u64::try_from(xp_amount).map_err(|_| EngineError::InvalidArgument {
        field: "xp_amount".to_string(),
        message: format!("XP can only be granted, got {}", xp_amount),
    })?;

    let new_total_xp = prior_total_xp.saturating_add(xp_amount);
    let prior_level = level_from_xp(prior_total_xp);
    let new_level = level_from_xp(new_total_xp);
    let leveled_up = new_level > prior_level;

    let reasoning = if leveled_up {
        format!(
            "{} + {} = {} XP, level {} -> {}",
            prior_total_xp, xp_amount, new_total_xp, prior_level, new_level
        )
    } else {
        format!(
            "{} + {} = {} XP, level {} unchanged",
            prior_total_xp, xp_amount, new_total_xp, new_level
        )
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "xp_gain".to_string(),
        rule_name: "XP Gain".to_string(),
        input: serde_json::json!({
            "prior_total_xp": prior_total_xp,
            "xp_amount": xp_amount
        }),
        output: serde_json::json!({
            "new_total_xp": new_total_xp,
            "prior_level": prior_level,
            "new_level": new_level,
            "leveled_up": leveled_up
        }),
        reasoning,
    };

    Ok(XpGain {
        prior_total_xp,
        xp_amount,
        new_total_xp,
        prior_level,
        new_level,
        leveled_up,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gain_reaching_level_two_levels_up() {
        let gain = apply_xp_gain(0, 50).unwrap();

        assert_eq!(gain.new_total_xp, 50);
        assert_eq!(gain.prior_level, 1);
        assert_eq!(gain.new_level, 2);
        assert!(gain.leveled_up);
    }

    #[test]
    fn test_gain_below_boundary_keeps_level() {
        let gain = apply_xp_gain(40, 5).unwrap();

        assert_eq!(gain.new_total_xp, 45);
        assert_eq!(gain.new_level, 1);
        assert!(!gain.leveled_up);
    }

    #[test]
    fn test_gain_can_skip_several_levels() {
        let gain = apply_xp_gain(0, 500).unwrap();

        assert_eq!(gain.new_level, 5);
        assert!(gain.leveled_up);
    }

    #[test]
    fn test_zero_gain_is_allowed() {
        let gain = apply_xp_gain(120, 0).unwrap();

        assert_eq!(gain.new_total_xp, 120);
        assert!(!gain.leveled_up);
    }

    #[test]
    fn test_negative_gain_is_invalid_argument() {
        match apply_xp_gain(100, -1) {
            Err(EngineError::InvalidArgument { field, message }) => {
                assert_eq!(field, "xp_amount");
                assert!(message.contains("-1"));
            }
            _ => panic!("Expected InvalidArgument error"),
        }
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let gain = apply_xp_gain(u64::MAX - 1, 10).unwrap();
        assert_eq!(gain.new_total_xp, u64::MAX);
    }

    #[test]
    fn test_audit_step_records_levels() {
        let gain = apply_xp_gain(40, 10).unwrap();

        assert_eq!(gain.audit_step.rule_id, "xp_gain");
        assert_eq!(gain.audit_step.input["prior_total_xp"], 40);
        assert_eq!(gain.audit_step.input["xp_amount"], 10);
        assert_eq!(gain.audit_step.output["new_level"], 2);
        assert_eq!(gain.audit_step.output["leveled_up"], true);
        assert!(gain.audit_step.reasoning.contains("level 1 -> 2"));
    }

    #[test]
    fn test_to_event_copies_gain() {
        let gain = apply_xp_gain(0, 50).unwrap();
        let timestamp = Utc::now();
        let event = gain.to_event("user_001", "Quiz bestanden", XpSource::Learning, timestamp);

        assert_eq!(event.user_id, "user_001");
        assert_eq!(event.xp_amount, 50);
        assert_eq!(event.reason, "Quiz bestanden");
        assert_eq!(event.source, XpSource::Learning);
        assert_eq!(event.prior_level, 1);
        assert_eq!(event.new_level, 2);
        assert!(event.leveled_up);
        assert_eq!(event.timestamp, timestamp);
    }

    proptest! {
        #[test]
        fn prop_negative_gain_always_fails(prior in any::<u64>(), amount in i64::MIN..0) {
            prop_assert!(apply_xp_gain(prior, amount).is_err());
        }

        #[test]
        fn prop_new_level_is_derived_from_new_total(
            prior in 0u64..1_000_000_000,
            amount in 0i64..1_000_000,
        ) {
            let gain = apply_xp_gain(prior, amount).unwrap();
            prop_assert_eq!(gain.new_total_xp, prior + amount as u64);
            prop_assert_eq!(gain.new_level, level_from_xp(gain.new_total_xp));
            prop_assert_eq!(gain.leveled_up, gain.new_level > level_from_xp(prior));
        }
    }
}
