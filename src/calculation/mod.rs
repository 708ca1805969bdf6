//! Calculation logic for the Browo Engine.
//!
//! This module contains the pure calculators: the level curve that maps XP to
//! levels and titles, the XP rewards table, the XP ledger update applied on
//! every grant, and the vacation carryover projection.

mod level_curve;
mod vacation_carryover;
mod xp_ledger;
mod xp_rewards;

pub use level_curve::{
    BASE_LEVEL_COST, LevelCosts, LevelTitle, level_from_xp, level_title, progress_to_next_level,
    total_xp_for_level, xp_required_for_level, xp_to_next_level,
};
pub use vacation_carryover::{
    CarryoverResult, EXPIRING_SOON_WINDOW_DAYS, evaluate_carryover, format_expiry_date,
};
pub use xp_ledger::{XpGain, apply_xp_gain};
pub use xp_rewards::XpAction;
