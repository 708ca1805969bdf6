//! Vacation balance model.
//!
//! Balances are kept as [`Decimal`] so half days stay exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The vacation days an employee can draw on.
///
/// # Example
///
/// ```
/// use browo_engine::models::VacationBalance;
/// use rust_decimal::Decimal;
///
/// let balance = VacationBalance::new(Decimal::from(25), Decimal::new(35, 1)).unwrap();
/// assert_eq!(balance.previous_year_remaining_days, Decimal::new(35, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationBalance {
    /// Allowance for the current year.
    pub current_year_days: Decimal,
    /// Days left over from the previous year.
    pub previous_year_remaining_days: Decimal,
}

impl VacationBalance {
    /// Creates a balance, rejecting negative day counts.
    pub fn new(
        current_year_days: Decimal,
        previous_year_remaining_days: Decimal,
    ) -> EngineResult<Self> {
        let balance = Self {
            current_year_days,
            previous_year_remaining_days,
        };
        balance.validate()?;
        Ok(balance)
    }

    /// Checks that neither day count is negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.current_year_days < Decimal::ZERO {
            return Err(EngineError::InvalidArgument {
                field: "current_year_days".to_string(),
                message: format!("must not be negative, got {}", self.current_year_days),
            });
        }
        if self.previous_year_remaining_days < Decimal::ZERO {
            return Err(EngineError::InvalidArgument {
                field: "previous_year_remaining_days".to_string(),
                message: format!(
                    "must not be negative, got {}",
                    self.previous_year_remaining_days
                ),
            });
        }
        Ok(())
    }
}
