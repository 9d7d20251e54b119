//! Depot helpers for the authenticated user.

use sprout_db::model::user::User;

use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const AUTHENTICATED_USER: &str = "__authenticated_user";
}

/// Get the authenticated user from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no user is found in the depot.
pub fn get_user_from_depot(depot: &salvo::Depot) -> ServiceResult<&User> {
    depot
        .get::<User>(depot_keys::AUTHENTICATED_USER)
        .map_err(|_e| ServiceError::NotAuthenticated)
}
