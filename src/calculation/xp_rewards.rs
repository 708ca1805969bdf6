//! XP rewards for platform actions.
//!
//! Each rewardable action carries a default XP amount. Deployments can
//! override individual amounts through `xp_rewards.yaml`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::XpSource;

/// An action on the platform that grants XP.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::XpAction;
///
/// assert_eq!(XpAction::QuizPerfect.default_xp(), 30);
/// assert_eq!("quiz_perfect".parse::<XpAction>().unwrap(), XpAction::QuizPerfect);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpAction {
    /// A training video was watched to the end.
    VideoWatched,
    /// A quiz was passed.
    QuizPassed,
    /// A quiz was passed without a single mistake.
    QuizPerfect,
    /// A working day was recorded.
    DayWorked,
    /// Seven consecutive working days were recorded.
    WeekStreak,
    /// A full month of working days was recorded.
    MonthStreak,
    /// The user interacted with their team.
    TeamInteraction,
    /// The user helped a colleague.
    HelpColleague,
    /// An achievement was unlocked.
    AchievementUnlocked,
    /// The profile was filled in completely.
    ProfileComplete,
    /// The user logged in for the first time.
    FirstLogin,
}

impl XpAction {
    /// All actions, in declaration order.
    pub const ALL: [XpAction; 11] = [
        XpAction::VideoWatched,
        XpAction::QuizPassed,
        XpAction::QuizPerfect,
        XpAction::DayWorked,
        XpAction::WeekStreak,
        XpAction::MonthStreak,
        XpAction::TeamInteraction,
        XpAction::HelpColleague,
        XpAction::AchievementUnlocked,
        XpAction::ProfileComplete,
        XpAction::FirstLogin,
    ];

    /// Returns the XP granted when no override is configured.
    pub fn default_xp(&self) -> u64 {
        match self {
            XpAction::VideoWatched => 10,
            XpAction::QuizPassed => 15,
            XpAction::QuizPerfect => 30,
            XpAction::DayWorked => 5,
            XpAction::WeekStreak => 25,
            XpAction::MonthStreak => 100,
            XpAction::TeamInteraction => 5,
            XpAction::HelpColleague => 10,
            XpAction::AchievementUnlocked => 50,
            XpAction::ProfileComplete => 20,
            XpAction::FirstLogin => 10,
        }
    }

    /// Returns the subsystem that grants XP for this action.
    pub fn source(&self) -> XpSource {
        match self {
            XpAction::VideoWatched | XpAction::QuizPassed | XpAction::QuizPerfect => {
                XpSource::Learning
            }
            XpAction::DayWorked | XpAction::WeekStreak | XpAction::MonthStreak => {
                XpSource::TimeTracking
            }
            XpAction::TeamInteraction | XpAction::HelpColleague => XpSource::Social,
            XpAction::AchievementUnlocked => XpSource::Achievement,
            XpAction::ProfileComplete | XpAction::FirstLogin => XpSource::System,
        }
    }

    /// Returns the snake_case identifier used in requests and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            XpAction::VideoWatched => "video_watched",
            XpAction::QuizPassed => "quiz_passed",
            XpAction::QuizPerfect => "quiz_perfect",
            XpAction::DayWorked => "day_worked",
            XpAction::WeekStreak => "week_streak",
            XpAction::MonthStreak => "month_streak",
            XpAction::TeamInteraction => "team_interaction",
            XpAction::HelpColleague => "help_colleague",
            XpAction::AchievementUnlocked => "achievement_unlocked",
            XpAction::ProfileComplete => "profile_complete",
            XpAction::FirstLogin => "first_login",
        }
    }
}

impl std::fmt::Display for XpAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for XpAction {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        XpAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| EngineError::RewardNotFound {
                action: s.to_string(),
            })
    }
}
