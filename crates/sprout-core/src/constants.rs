/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const AUTH_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);

pub const PLANTS_ROUTE_COMPONENT: &str = "plants";
pub const PLANTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PLANTS_ROUTE_COMPONENT);

pub const TASKS_ROUTE_COMPONENT: &str = "tasks";
pub const TASKS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", TASKS_ROUTE_COMPONENT);

/// Number of days covered by the "upcoming tasks" window, starting today.
pub const UPCOMING_WINDOW_DAYS: u64 = 30;

/// Maximum number of entries returned by the "upcoming tasks" query.
pub const UPCOMING_LIMIT: usize = 10;
