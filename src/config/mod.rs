//! Configuration loading and management for the Browo Engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files: deployment metadata, the vacation carryover cutoff and XP reward
//! overrides.
//!
//! # Example
//!
//! ```no_run
//! use browo_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/browo").unwrap();
//! println!("Loaded configuration: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CarryoverConfig, CarryoverFile, EngineConfig, EngineMetadata, XpRewardsFile};
