//! Configuration types for the Browo Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated
//! [`CarryoverConfig`] that the vacation calculator consumes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calculation::XpAction;
use crate::error::{EngineError, EngineResult};

/// Metadata about the engine deployment, read from `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// The tenant or deployment name (e.g., "Browo Koordinator").
    pub name: String,
    /// The version of this configuration set.
    pub version: String,
    /// Free-form description of the deployment.
    #[serde(default)]
    pub description: String,
}

/// Raw `carryover.yaml` contents before validation.
///
/// Missing keys fall back to [`CarryoverConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarryoverFile {
    /// Whether carryover is granted at all.
    pub enabled: Option<bool>,
    /// Month of the cutoff date (1-12).
    pub cutoff_month: Option<u32>,
    /// Day of the cutoff date (1-31).
    pub cutoff_day: Option<u32>,
}

/// Raw `xp_rewards.yaml` contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XpRewardsFile {
    /// XP overrides keyed by action.
    #[serde(default)]
    pub rewards: BTreeMap<XpAction, u64>,
}

/// Vacation carryover settings.
///
/// Prior-year vacation days stay usable until the cutoff date of the current
/// year at 23:59:59. The cutoff must exist in every year, so February 29th is
/// rejected.
///
/// # Example
///
/// ```
/// use browo_engine::config::CarryoverConfig;
///
/// let config = CarryoverConfig::new(true, 3, 31).unwrap();
/// assert_eq!(config, CarryoverConfig::default());
///
/// assert!(CarryoverConfig::new(true, 4, 31).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarryoverConfig {
    enabled: bool,
    cutoff_month: u32,
    cutoff_day: u32,
}

impl CarryoverConfig {
    /// Creates validated carryover settings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when the month is outside 1-12
    /// or the day does not exist in that month of a common year.
    pub fn new(enabled: bool, cutoff_month: u32, cutoff_day: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&cutoff_month) {
            return Err(EngineError::InvalidConfig {
                field: "cutoff_month".to_string(),
                message: format!("month must be between 1 and 12, got {}", cutoff_month),
            });
        }
        // 2001 is a common year, so February 29th fails here.
        if NaiveDate::from_ymd_opt(2001, cutoff_month, cutoff_day).is_none() {
            return Err(EngineError::InvalidConfig {
                field: "cutoff_day".to_string(),
                message: format!(
                    "day {} does not exist in month {} of every year",
                    cutoff_day, cutoff_month
                ),
            });
        }

        Ok(Self {
            enabled,
            cutoff_month,
            cutoff_day,
        })
    }

    /// Returns settings with carryover switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether carryover is granted at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Month of the cutoff date.
    pub fn cutoff_month(&self) -> u32 {
        self.cutoff_month
    }

    /// Day of the cutoff date.
    pub fn cutoff_day(&self) -> u32 {
        self.cutoff_day
    }

    /// Returns the last moment carryover days are usable in `year`.
    pub fn cutoff_datetime(&self, year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, self.cutoff_month, self.cutoff_day)
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .expect("cutoff validated against a common year")
    }
}

impl Default for CarryoverConfig {
    /// Carryover enabled until March 31st.
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_month: 3,
            cutoff_day: 31,
        }
    }
}

impl TryFrom<CarryoverFile> for CarryoverConfig {
    type Error = EngineError;

    fn try_from(file: CarryoverFile) -> EngineResult<Self> {
        let defaults = CarryoverConfig::default();
        CarryoverConfig::new(
            file.enabled.unwrap_or(defaults.enabled),
            file.cutoff_month.unwrap_or(defaults.cutoff_month),
            file.cutoff_day.unwrap_or(defaults.cutoff_day),
        )
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Deployment metadata.
    metadata: EngineMetadata,
    /// Vacation carryover settings.
    carryover: CarryoverConfig,
    /// XP overrides by action.
    xp_rewards: BTreeMap<XpAction, u64>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: EngineMetadata,
        carryover: CarryoverConfig,
        xp_rewards: BTreeMap<XpAction, u64>,
    ) -> Self {
        Self {
            metadata,
            carryover,
            xp_rewards,
        }
    }

    /// Returns the deployment metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the carryover settings.
    pub fn carryover(&self) -> &CarryoverConfig {
        &self.carryover
    }

    /// Returns the configured XP overrides.
    pub fn xp_rewards(&self) -> &BTreeMap<XpAction, u64> {
        &self.xp_rewards
    }

    /// Returns the XP granted for `action`, preferring the configured override.
    pub fn xp_reward(&self, action: XpAction) -> u64 {
        self.xp_rewards
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_xp())
    }
}
