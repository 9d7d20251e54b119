//! Shared building blocks for the sprout plant-care tracker: configuration,
//! route constants, the core error type and the recurrence rule.

pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod patch;
pub mod recurrence;
pub mod types;
