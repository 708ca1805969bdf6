//! Core data models for the Browo Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod vacation;
mod xp;

pub use audit::AuditStep;
pub use vacation::VacationBalance;
pub use xp::{XpEvent, XpSource, XpState};
