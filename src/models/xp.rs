//! XP state and audit event models.
//!
//! A user's progression is stored as a single XP total. The level is never
//! stored alongside it; it is derived from the total on every read so the two
//! can never drift apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{LevelTitle, level_from_xp, level_title, progress_to_next_level};
use rust_decimal::Decimal;

/// The persisted XP record of a single user.
///
/// # Example
///
/// ```
/// use browo_engine::models::XpState;
///
/// let state = XpState::new(50);
/// assert_eq!(state.level(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpState {
    /// Cumulative XP earned by the user.
    pub total_xp: u64,
}

impl XpState {
    /// Creates a state holding the given XP total.
    pub fn new(total_xp: u64) -> Self {
        Self { total_xp }
    }

    /// Returns the level derived from the XP total.
    pub fn level(&self) -> u32 {
        level_from_xp(self.total_xp)
    }

    /// Returns the title for the derived level.
    pub fn title(&self) -> LevelTitle {
        level_title(self.level())
    }

    /// Returns the percentage progress towards the next level.
    ///
    /// Always in `[0, 100)` because the level is recomputed from the total.
    pub fn progress_percent(&self) -> Decimal {
        progress_to_next_level(self.total_xp, self.level())
    }
}

/// The subsystem that granted XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum XpSource {
    /// Granted by the platform itself or an administrator.
    System,
    /// Videos and quizzes.
    Learning,
    /// Worked days and attendance streaks.
    TimeTracking,
    /// Interactions with colleagues.
    Social,
    /// Unlocked achievements.
    Achievement,
}

impl std::fmt::Display for XpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XpSource::System => write!(f, "SYSTEM"),
            XpSource::Learning => write!(f, "LEARNING"),
            XpSource::TimeTracking => write!(f, "TIME_TRACKING"),
            XpSource::Social => write!(f, "SOCIAL"),
            XpSource::Achievement => write!(f, "ACHIEVEMENT"),
        }
    }
}

/// An immutable audit record appended for every XP grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpEvent {
    /// Unique identifier of the event.
    pub id: Uuid,
    /// The user who received the XP.
    pub user_id: String,
    /// The amount of XP granted.
    pub xp_amount: u64,
    /// Why the XP was granted.
    pub reason: String,
    /// Which subsystem granted the XP.
    pub source: XpSource,
    /// Level before the grant.
    pub prior_level: u32,
    /// Level after the grant.
    pub new_level: u32,
    /// Whether the grant crossed at least one level boundary.
    pub leveled_up: bool,
    /// When the grant was recorded.
    pub timestamp: DateTime<Utc>,
}
