//! Plant records owned by a user.

pub mod service;

pub use service::{CreatePlant, UpdatePlant};
