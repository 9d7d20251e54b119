//! Query functions, one module per table family.

pub mod plant;
pub mod task;
pub mod token;
pub mod user;
