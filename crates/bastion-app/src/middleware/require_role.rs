use std::collections::BTreeSet;

use salvo::Depot;
use salvo::http::{Method, StatusCode};

use bastion_core::types::Role;
use bastion_service::auth::get_principal_from_depot;

use super::{challenge, reject};

/// ## Summary
/// Handler-level role guard, attached with `.hoop(...)` to a single route.
///
/// Runs after the path policy and applies regardless of it, so a handler
/// stays restricted even when the configured rules leave its path open.
/// No principal ends the request with a 401 challenge, a principal holding
/// none of `roles` with a 403. `OPTIONS` passes, as it does through the rest
/// of the chain.
pub struct RequireRole {
    roles: BTreeSet<Role>,
}

impl RequireRole {
    #[must_use]
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }
}

#[salvo::async_trait]
impl salvo::Handler for RequireRole {
    #[tracing::instrument(skip_all, fields(required = ?self.roles))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        if req.method() == Method::OPTIONS {
            return;
        }

        match get_principal_from_depot(depot) {
            None => challenge(res, ctrl),
            Some(principal) if principal.has_any_role(&self.roles) => {}
            Some(principal) => {
                tracing::info!(username = principal.username(), "Denied by handler role guard");
                reject(res, ctrl, StatusCode::FORBIDDEN);
            }
        }
    }
}
