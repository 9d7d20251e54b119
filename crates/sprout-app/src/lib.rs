//! HTTP surface of the sprout plant-care tracker.

pub mod app;
pub mod config;
pub mod db_handler;
pub mod error;
pub mod middleware;
