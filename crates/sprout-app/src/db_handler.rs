//! Makes the database provider available to handlers through the depot.

use std::sync::Arc;

use salvo::async_trait;
use sprout_core::error::CoreError;
use sprout_db::db::DbProvider;

use crate::error::AppResult;

pub type SharedDbProvider = Arc<dyn DbProvider>;

/// Injects a shared [`DbProvider`] into every request's depot.
pub struct DbProviderHandler {
    provider: SharedDbProvider,
}

impl DbProviderHandler {
    pub fn new(provider: impl DbProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

#[async_trait]
impl salvo::Handler for DbProviderHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.provider));
    }
}

/// ## Summary
/// Retrieves the database provider from the depot.
///
/// ## Errors
/// Returns an error if no provider was injected.
pub fn get_db_from_depot(depot: &salvo::Depot) -> AppResult<SharedDbProvider> {
    depot
        .obtain::<SharedDbProvider>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Database provider not found in depot").into())
}
