//! Business logic for sprout: recurring-task expansion and advancement, the
//! task query and write workflows, plants, accounts and bearer tokens.

pub mod auth;
pub mod error;
pub mod plant;
pub mod task;
