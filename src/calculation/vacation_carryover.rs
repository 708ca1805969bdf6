//! Vacation carryover projection.
//!
//! Days left over from the previous year remain usable until the configured
//! cutoff date of the current year. The projection is recomputed from the
//! wall clock on every read and never persisted.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CarryoverConfig;
use crate::models::{AuditStep, VacationBalance};

/// Carryover days are flagged as expiring once the cutoff is this close.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// The projection of a vacation balance at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryoverResult {
    /// Allowance for the current year.
    pub current_year_days: Decimal,
    /// Carryover days still usable (zero once expired).
    pub previous_year_days: Decimal,
    /// Current-year allowance plus usable carryover.
    pub total_available_days: Decimal,
    /// Whether carryover days have been forfeited.
    pub carryover_expired: bool,
    /// The last moment carryover days are usable this year.
    pub carryover_expiry_date: NaiveDateTime,
    /// Carryover days that expire within the warning window.
    pub days_expiring_soon: Decimal,
    /// Whether carryover is enabled and the cutoff has not passed.
    pub is_before_cutoff: bool,
    /// Whole days until the cutoff, rounded up; negative once passed.
    pub days_until_cutoff: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl CarryoverResult {
    /// Returns whether a request for `requested_days` would dip into carryover.
    ///
    /// True only while carryover is active, some carryover remains, and the
    /// request exceeds the current-year allowance.
    pub fn would_use_carryover_days(&self, requested_days: Decimal) -> bool {
        if !self.is_before_cutoff || self.previous_year_days.is_zero() {
            return false;
        }
        requested_days > self.current_year_days
    }

    /// Returns the days left until carryover expires, or `None` once it has.
    pub fn days_until_expiry(&self) -> Option<i64> {
        self.is_before_cutoff.then_some(self.days_until_cutoff)
    }
}

/// Projects a vacation balance against the carryover cutoff at `now`.
///
/// The cutoff is inclusive: at exactly 23:59:59 on the cutoff day carryover
/// is still usable. With carryover disabled there is no grace period at all.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::evaluate_carryover;
/// use browo_engine::config::CarryoverConfig;
/// use browo_engine::models::VacationBalance;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let balance = VacationBalance::new(Decimal::from(10), Decimal::from(5)).unwrap();
/// let config = CarryoverConfig::new(true, 3, 31).unwrap();
///
/// let february = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let result = evaluate_carryover(&balance, &config, february);
/// assert_eq!(result.total_available_days, Decimal::from(15));
/// assert!(!result.carryover_expired);
///
/// let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let result = evaluate_carryover(&balance, &config, april);
/// assert_eq!(result.total_available_days, Decimal::from(10));
/// assert!(result.carryover_expired);
/// ```
pub fn evaluate_carryover(
    balance: &VacationBalance,
    config: &CarryoverConfig,
    now: NaiveDateTime,
) -> CarryoverResult {
    let cutoff = config.cutoff_datetime(now.year());
    let is_before_cutoff = config.enabled() && now <= cutoff;
    let carryover_expired = !is_before_cutoff;

    let previous_year_days = if carryover_expired {
        Decimal::ZERO
    } else {
        balance.previous_year_remaining_days
    };
    let total_available_days = balance.current_year_days + previous_year_days;

    let days_until_cutoff = ceil_days((cutoff - now).num_milliseconds());
    let days_expiring_soon =
        if is_before_cutoff && days_until_cutoff <= EXPIRING_SOON_WINDOW_DAYS {
            balance.previous_year_remaining_days
        } else {
            Decimal::ZERO
        };

    let reasoning = if !config.enabled() {
        format!(
            "Carryover disabled: {} current-year days available",
            total_available_days
        )
    } else if carryover_expired {
        format!(
            "Cutoff {} passed: {} carryover days forfeited, {} days available",
            cutoff, balance.previous_year_remaining_days, total_available_days
        )
    } else {
        format!(
            "{} + {} carryover = {} days available until {}",
            balance.current_year_days, previous_year_days, total_available_days, cutoff
        )
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "vacation_carryover".to_string(),
        rule_name: "Vacation Carryover".to_string(),
        input: serde_json::json!({
            "current_year_days": balance.current_year_days.normalize().to_string(),
            "previous_year_remaining_days": balance.previous_year_remaining_days.normalize().to_string(),
            "enabled": config.enabled(),
            "cutoff_month": config.cutoff_month(),
            "cutoff_day": config.cutoff_day(),
            "now": now.to_string()
        }),
        output: serde_json::json!({
            "total_available_days": total_available_days.normalize().to_string(),
            "carryover_expired": carryover_expired,
            "days_expiring_soon": days_expiring_soon.normalize().to_string(),
            "days_until_cutoff": days_until_cutoff
        }),
        reasoning,
    };

    CarryoverResult {
        current_year_days: balance.current_year_days,
        previous_year_days,
        total_available_days,
        carryover_expired,
        carryover_expiry_date: cutoff,
        days_expiring_soon,
        is_before_cutoff,
        days_until_cutoff,
        audit_step,
    }
}

/// Formats an expiry date for display.
///
/// German locales (`de`, `de-DE`, ...) produce `31. März 2025`, `en-US`
/// produces `March 31, 2025` and every other locale `31 March 2025`.
///
/// # Example
///
/// ```
/// use browo_engine::calculation::format_expiry_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
/// assert_eq!(format_expiry_date(date, "de-DE"), "31. März 2025");
/// assert_eq!(format_expiry_date(date, "en-US"), "March 31, 2025");
/// ```
pub fn format_expiry_date(date: NaiveDate, locale: &str) -> String {
    const GERMAN_MONTHS: [&str; 12] = [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ];

    let locale = locale.to_ascii_lowercase();
    if locale == "de" || locale.starts_with("de-") || locale.starts_with("de_") {
        format!(
            "{:02}. {} {}",
            date.day(),
            GERMAN_MONTHS[date.month0() as usize],
            date.year()
        )
    } else if locale == "en-us" || locale == "en_us" {
        date.format("%B %d, %Y").to_string()
    } else {
        date.format("%d %B %Y").to_string()
    }
}

fn ceil_days(millis: i64) -> i64 {
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn balance(current: &str, previous: &str) -> VacationBalance {
        VacationBalance::new(dec(current), dec(previous)).unwrap()
    }

    fn march_31st() -> CarryoverConfig {
        CarryoverConfig::new(true, 3, 31).unwrap()
    }

    #[test]
    fn test_before_cutoff_includes_carryover() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-02-01", "00:00:00"),
        );

        assert_eq!(result.total_available_days, dec("15"));
        assert_eq!(result.previous_year_days, dec("5"));
        assert!(!result.carryover_expired);
        assert!(result.is_before_cutoff);
        // 58 days and 23:59:59 until the cutoff
        assert_eq!(result.days_until_cutoff, 59);
        assert_eq!(result.days_expiring_soon, Decimal::ZERO);
    }

    #[test]
    fn test_after_cutoff_forfeits_carryover() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-04-01", "00:00:00"),
        );

        assert_eq!(result.total_available_days, dec("10"));
        assert_eq!(result.previous_year_days, Decimal::ZERO);
        assert!(result.carryover_expired);
        assert!(!result.is_before_cutoff);
        assert_eq!(result.days_expiring_soon, Decimal::ZERO);
        assert!(result.days_until_cutoff <= 0);
    }

    #[test]
    fn test_disabled_carryover_never_adds_days() {
        for date in ["2025-01-01", "2025-03-31", "2025-12-31"] {
            let result = evaluate_carryover(
                &balance("10", "5"),
                &CarryoverConfig::disabled(),
                at(date, "12:00:00"),
            );
            assert_eq!(result.total_available_days, dec("10"));
            assert!(result.carryover_expired);
            assert_eq!(result.days_expiring_soon, Decimal::ZERO);
        }
    }

    #[test]
    fn test_cutoff_instant_is_still_before_cutoff() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-03-31", "23:59:59"),
        );

        assert!(!result.carryover_expired);
        assert_eq!(result.total_available_days, dec("15"));
        assert_eq!(result.days_until_cutoff, 0);
    }

    #[test]
    fn test_one_second_after_cutoff_is_expired() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-04-01", "00:00:00"),
        );
        assert!(result.carryover_expired);
    }

    #[test]
    fn test_days_expiring_soon_inside_window() {
        let result = evaluate_carryover(
            &balance("20", "3.5"),
            &march_31st(),
            at("2025-03-15", "12:00:00"),
        );

        assert_eq!(result.days_until_cutoff, 17);
        assert_eq!(result.days_expiring_soon, dec("3.5"));
    }

    #[test]
    fn test_expiring_soon_window_boundary() {
        // Exactly 30 days before the cutoff
        let result = evaluate_carryover(
            &balance("20", "2"),
            &march_31st(),
            at("2025-03-01", "23:59:59"),
        );
        assert_eq!(result.days_until_cutoff, 30);
        assert_eq!(result.days_expiring_soon, dec("2"));

        // One second more rounds up to 31 days
        let result = evaluate_carryover(
            &balance("20", "2"),
            &march_31st(),
            at("2025-03-01", "23:59:58"),
        );
        assert_eq!(result.days_until_cutoff, 31);
        assert_eq!(result.days_expiring_soon, Decimal::ZERO);
    }

    #[test]
    fn test_cutoff_uses_current_year() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2026-10-18", "09:00:00"),
        );

        assert_eq!(result.carryover_expiry_date, at("2026-03-31", "23:59:59"));
        assert!(result.carryover_expired);
    }

    #[test]
    fn test_would_use_carryover_days() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-02-01", "00:00:00"),
        );

        assert!(!result.would_use_carryover_days(dec("10")));
        assert!(result.would_use_carryover_days(dec("10.5")));
    }

    #[test]
    fn test_would_not_use_carryover_when_expired_or_empty() {
        let expired = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-04-02", "00:00:00"),
        );
        assert!(!expired.would_use_carryover_days(dec("12")));

        let empty = evaluate_carryover(
            &balance("10", "0"),
            &march_31st(),
            at("2025-02-01", "00:00:00"),
        );
        assert!(!empty.would_use_carryover_days(dec("12")));
    }

    #[test]
    fn test_days_until_expiry() {
        let active = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-03-30", "23:59:59"),
        );
        assert_eq!(active.days_until_expiry(), Some(1));

        let expired = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-05-01", "00:00:00"),
        );
        assert_eq!(expired.days_until_expiry(), None);
    }

    #[test]
    fn test_audit_step_records_projection() {
        let result = evaluate_carryover(
            &balance("10", "5"),
            &march_31st(),
            at("2025-02-01", "00:00:00"),
        );

        assert_eq!(result.audit_step.rule_id, "vacation_carryover");
        assert_eq!(result.audit_step.input["current_year_days"], "10");
        assert_eq!(result.audit_step.output["total_available_days"], "15");
        assert_eq!(result.audit_step.output["carryover_expired"], false);
        assert!(result.audit_step.reasoning.contains("15 days available"));
    }

    #[test]
    fn test_format_expiry_date_locales() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_expiry_date(date, "de-DE"), "05. März 2025");
        assert_eq!(format_expiry_date(date, "de"), "05. März 2025");
        assert_eq!(format_expiry_date(date, "en-US"), "March 05, 2025");
        assert_eq!(format_expiry_date(date, "en-GB"), "05 March 2025");
    }

    #[test]
    fn test_ceil_days_rounds_towards_positive_infinity() {
        assert_eq!(ceil_days(0), 0);
        assert_eq!(ceil_days(1), 1);
        assert_eq!(ceil_days(MILLIS_PER_DAY), 1);
        assert_eq!(ceil_days(MILLIS_PER_DAY + 1), 2);
        assert_eq!(ceil_days(-1), 0);
        assert_eq!(ceil_days(-MILLIS_PER_DAY - 1), -1);
    }
}
