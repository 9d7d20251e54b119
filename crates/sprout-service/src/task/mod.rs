//! Care tasks: recurring-task expansion and advancement, plus the read and
//! write workflows built on them.
//!
//! ## Module Organization
//!
//! - `entry`: persisted and synthetic task entries and their wire shape
//! - `expand`: derives the future occurrences of a recurring task inside a window
//! - `advance`: completes a task and builds the next task of its series
//! - `store`: the persistence seam used by the workflows
//! - `query`: listing and upcoming-task views
//! - `service`: create, update, complete and delete

pub mod advance;
pub mod entry;
pub mod expand;
pub mod query;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod service_tests;

pub use advance::{Advancement, advance};
pub use entry::{SyntheticInstance, TaskEntry, TaskView};
pub use expand::{expand, expand_between};
pub use query::{DateWindow, TaskQuery, list_tasks, upcoming_tasks};
pub use service::{Completion, CreateTask, UpdateTask};
pub use store::{PgTaskStore, TaskStore};
