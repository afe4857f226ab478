use std::sync::Arc;

use salvo::async_trait;

use bastion_core::error::CoreError;
use bastion_service::auth::CredentialStore;

use crate::error::AppResult;

/// Makes the shared credential store available to handlers through the depot.
pub struct StoreHandler {
    pub store: Arc<CredentialStore>,
}

#[async_trait]
impl salvo::Handler for StoreHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Retrieves the credential store from the depot.
///
/// ## Errors
/// Returns an error if `StoreHandler` did not run for this request.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<CredentialStore>> {
    depot
        .obtain::<Arc<CredentialStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Credential store not found in depot").into())
}
