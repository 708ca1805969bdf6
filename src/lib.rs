//! Browo Engine
//!
//! This crate provides the XP leveling and vacation carryover calculations of
//! the Browo Koordinator HR platform, together with the configuration, storage
//! and HTTP API that serve them.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
