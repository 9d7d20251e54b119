pub mod plant;
pub mod task;
pub mod user;
