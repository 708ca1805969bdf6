//! Level curve calculations.
//!
//! Advancing from level `n` to `n + 1` costs `floor(50 * 1.5^(n-1))` XP. A
//! user's level is the largest level whose cumulative cost does not exceed
//! their XP total.
//!
//! Costs are computed exactly: `1.5^k` has a finite binary expansion, so the
//! running cost is carried as a whole part plus a fraction over `2^k` in
//! `u128`. Flooring after every step would drift from the closed formula as
//! early as level 5 (252 instead of 253).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// XP needed to advance from level 1 to level 2.
pub const BASE_LEVEL_COST: u64 = 50;

// Every cost from this step on is saturated at u64::MAX.
const SATURATION_STEPS: usize = 128;

/// Iterator over the per-level costs, starting at level 1.
///
/// Yields `xp_required_for_level(1)`, `xp_required_for_level(2)`, ... and
/// saturates at `u64::MAX` once the cost no longer fits.
#[derive(Debug, Clone)]
pub struct LevelCosts {
    whole: u128,
    frac: u128,
    bits: u32,
}

impl LevelCosts {
    /// Starts the sequence at the level 1 cost.
    pub fn new() -> Self {
        Self {
            whole: u128::from(BASE_LEVEL_COST),
            frac: 0,
            bits: 0,
        }
    }

    fn saturated(&self) -> bool {
        self.whole > u128::from(u64::MAX)
    }
}

impl Default for LevelCosts {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for LevelCosts {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.saturated() {
            return Some(u64::MAX);
        }
        let current = self.whole as u64;

        // x * 3 / 2, keeping the fraction exact over 2^(bits + 1).
        let tripled = self.whole * 3;
        let denominator = 1u128 << (self.bits + 1);
        let mut frac = self.frac * 3 + (tripled & 1) * (1u128 << self.bits);
        let mut whole = tripled >> 1;
        while frac >= denominator {
            frac -= denominator;
            whole += 1;
        }
        self.whole = whole;
        self.frac = frac;
        self.bits += 1;

        Some(current)
    }
}

/// Returns the XP needed to advance from `level` to `level + 1`.
///
/// Level 0 is treated as level 1.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::xp_required_for_level;
///
/// assert_eq!(xp_required_for_level(1), 50);
/// assert_eq!(xp_required_for_level(2), 75);
/// assert_eq!(xp_required_for_level(3), 112);
/// ```
pub fn xp_required_for_level(level: u32) -> u64 {
    let index = (level.max(1) - 1) as usize;
    if index >= SATURATION_STEPS {
        return u64::MAX;
    }
    LevelCosts::new().nth(index).unwrap_or(u64::MAX)
}

/// Returns the cumulative XP needed to reach `level` from level 1.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::total_xp_for_level;
///
/// assert_eq!(total_xp_for_level(1), 0);
/// assert_eq!(total_xp_for_level(2), 50);
/// assert_eq!(total_xp_for_level(3), 125);
/// ```
pub fn total_xp_for_level(level: u32) -> u64 {
    let steps = (level.max(1) - 1) as usize;
    LevelCosts::new()
        .take(steps.min(SATURATION_STEPS))
        .fold(0u64, |total, cost| total.saturating_add(cost))
}

/// Returns the largest level whose cumulative XP does not exceed `xp`.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::level_from_xp;
///
/// assert_eq!(level_from_xp(0), 1);
/// assert_eq!(level_from_xp(49), 1);
/// assert_eq!(level_from_xp(50), 2);
/// assert_eq!(level_from_xp(125), 3);
/// ```
pub fn level_from_xp(xp: u64) -> u32 {
    let mut level = 1;
    let mut total: u64 = 0;

    for cost in LevelCosts::new() {
        match total.checked_add(cost) {
            Some(next) if next <= xp => {
                total = next;
                level += 1;
            }
            _ => break,
        }
    }

    level
}

/// Returns the percentage progress from `current_level` towards the next level.
///
/// The result is rounded to two decimal places. It falls outside `[0, 100)`
/// when `current_level` is stale relative to `current_xp`; recompute the level
/// with [`level_from_xp`] first.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::progress_to_next_level;
/// use rust_decimal::Decimal;
///
/// // Level 2 spans 50..125 XP.
/// assert_eq!(progress_to_next_level(80, 2), Decimal::from(40));
/// ```
pub fn progress_to_next_level(current_xp: u64, current_level: u32) -> Decimal {
    let level_start = total_xp_for_level(current_level);
    let level_end = total_xp_for_level(current_level.saturating_add(1));
    let span = Decimal::from(level_end) - Decimal::from(level_start);
    if span.is_zero() {
        return Decimal::ONE_HUNDRED;
    }

    let earned = Decimal::from(current_xp) - Decimal::from(level_start);
    (earned / span * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Returns the XP still missing before `current_xp` reaches the next level.
pub fn xp_to_next_level(current_xp: u64) -> u64 {
    let next_level = level_from_xp(current_xp).saturating_add(1);
    total_xp_for_level(next_level).saturating_sub(current_xp)
}

/// The title shown next to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelTitle {
    /// Levels 1-2.
    Neuling,
    /// Levels 3-4.
    #[serde(rename = "Anfänger")]
    Anfaenger,
    /// Levels 5-9.
    Fortgeschritten,
    /// Levels 10-14.
    Experte,
    /// Levels 15-19.
    Meister,
    /// Level 20 and above.
    Legende,
}

impl std::fmt::Display for LevelTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelTitle::Neuling => write!(f, "Neuling"),
            LevelTitle::Anfaenger => write!(f, "Anfänger"),
            LevelTitle::Fortgeschritten => write!(f, "Fortgeschritten"),
            LevelTitle::Experte => write!(f, "Experte"),
            LevelTitle::Meister => write!(f, "Meister"),
            LevelTitle::Legende => write!(f, "Legende"),
        }
    }
}

/// Returns the title for a level.
pub fn level_title(level: u32) -> LevelTitle {
    match level {
        20.. => LevelTitle::Legende,
        15.. => LevelTitle::Meister,
        10.. => LevelTitle::Experte,
        5.. => LevelTitle::Fortgeschritten,
        3.. => LevelTitle::Anfaenger,
        _ => LevelTitle::Neuling,
    }
}
