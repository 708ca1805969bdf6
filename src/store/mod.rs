//! In-memory progress store.
//!
//! Holds each user's XP total and the append-only XP event log. A grant
//! updates the total and appends its event while holding one write lock, so
//! readers never see a total without its event (or the reverse) and
//! concurrent grants to the same user cannot lose updates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::calculation::{XpGain, apply_xp_gain};
use crate::error::EngineResult;
use crate::models::{XpEvent, XpSource, XpState};

/// The result of a committed XP grant.
#[derive(Debug, Clone)]
pub struct XpGrant {
    /// The calculated gain.
    pub gain: XpGain,
    /// The audit event appended for the gain.
    pub event: XpEvent,
}

#[derive(Debug, Default)]
struct StoreState {
    balances: HashMap<String, XpState>,
    events: Vec<XpEvent>,
}

/// Shared store of XP balances and their audit trail.
#[derive(Debug, Default)]
pub struct ProgressStore {
    state: RwLock<StoreState>,
}

impl ProgressStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a user's XP state; unknown users start at zero XP.
    pub async fn xp_state(&self, user_id: &str) -> XpState {
        self.state
            .read()
            .await
            .balances
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    /// Returns a user's XP events, oldest first.
    pub async fn events_for(&self, user_id: &str) -> Vec<XpEvent> {
        self.state
            .read()
            .await
            .events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Applies an XP grant and appends its audit event as one unit.
    ///
    /// Nothing is written when the gain is rejected.
    pub async fn grant_xp(
        &self,
        user_id: &str,
        xp_amount: i64,
        reason: &str,
        source: XpSource,
        timestamp: DateTime<Utc>,
    ) -> EngineResult<XpGrant> {
        let mut state = self.state.write().await;

        let prior = state.balances.get(user_id).copied().unwrap_or_default();
        let gain = apply_xp_gain(prior.total_xp, xp_amount)?;
        let event = gain.to_event(user_id, reason, source, timestamp);

        state
            .balances
            .insert(user_id.to_string(), XpState::new(gain.new_total_xp));
        state.events.push(event.clone());
        drop(state);

        debug!(
            user_id = %user_id,
            xp_amount = gain.xp_amount,
            new_total_xp = gain.new_total_xp,
            "XP grant committed"
        );
        if gain.leveled_up {
            info!(
                user_id = %user_id,
                prior_level = gain.prior_level,
                new_level = gain.new_level,
                "User leveled up"
            );
        }

        Ok(XpGrant { gain, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unknown_user_starts_at_zero() {
        let store = ProgressStore::new();

        let state = store.xp_state("nobody").await;
        assert_eq!(state.total_xp, 0);
        assert_eq!(state.level(), 1);
        assert!(store.events_for("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn test_grant_updates_total_and_appends_event() {
        let store = ProgressStore::new();

        let grant = store
            .grant_xp("user_001", 50, "Quiz bestanden", XpSource::Learning, Utc::now())
            .await
            .unwrap();

        assert!(grant.gain.leveled_up);
        assert_eq!(store.xp_state("user_001").await.total_xp, 50);

        let events = store.events_for("user_001").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], grant.event);
        assert_eq!(events[0].new_level, 2);
    }

    #[tokio::test]
    async fn test_grants_accumulate() {
        let store = ProgressStore::new();

        store
            .grant_xp("user_001", 40, "Video", XpSource::Learning, Utc::now())
            .await
            .unwrap();
        let grant = store
            .grant_xp("user_001", 5, "Arbeitstag", XpSource::TimeTracking, Utc::now())
            .await
            .unwrap();

        assert_eq!(grant.gain.prior_total_xp, 40);
        assert_eq!(grant.gain.new_total_xp, 45);
        assert!(!grant.gain.leveled_up);
    }

    #[tokio::test]
    async fn test_rejected_grant_writes_nothing() {
        let store = ProgressStore::new();

        let result = store
            .grant_xp("user_001", -10, "Abzug", XpSource::System, Utc::now())
            .await;

        assert!(matches!(result, Err(EngineError::InvalidArgument { .. })));
        assert_eq!(store.xp_state("user_001").await.total_xp, 0);
        assert!(store.events_for("user_001").await.is_empty());
    }

    #[tokio::test]
    async fn test_events_are_scoped_to_user() {
        let store = ProgressStore::new();

        store
            .grant_xp("user_001", 10, "Video", XpSource::Learning, Utc::now())
            .await
            .unwrap();
        store
            .grant_xp("user_002", 20, "Profil", XpSource::System, Utc::now())
            .await
            .unwrap();

        assert_eq!(store.events_for("user_001").await.len(), 1);
        assert_eq!(store.events_for("user_002").await[0].xp_amount, 20);
    }

    #[tokio::test]
    async fn test_concurrent_grants_do_not_lose_updates() {
        let store = Arc::new(ProgressStore::new());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .grant_xp("user_001", 5, "Arbeitstag", XpSource::TimeTracking, Utc::now())
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.xp_state("user_001").await.total_xp, 250);
        let events = store.events_for("user_001").await;
        assert_eq!(events.len(), 50);
        let leveled_up = events.iter().filter(|event| event.leveled_up).count() as u32;
        assert_eq!(leveled_up, store.xp_state("user_001").await.level() - 1);
    }
}
