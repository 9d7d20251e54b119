//! Postgres persistence for sprout: schema, migrations, row models and queries.

pub mod db;
pub mod error;
pub mod model;
