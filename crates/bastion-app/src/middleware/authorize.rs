use std::sync::Arc;

use salvo::Depot;
use salvo::http::{Method, StatusCode};

use bastion_core::pattern::canonical_request_path;
use bastion_service::auth::{AuthDecision, AuthorizationPolicy, DenyReason, get_principal_from_depot};

use super::{challenge, reject};

/// ## Summary
/// Authorization middleware that evaluates the policy for the request path
/// and the principal left in the depot by `AuthenticationMiddleware`.
///
/// `Deny(Unauthenticated)` becomes a 401 challenge, `Deny(InsufficientRole)`
/// a 403. Paths the policy cannot safely match are refused with 400, and a
/// trailing `/` is dropped before evaluation so `/users/` meets the `/users` rule.
pub struct AuthorizationMiddleware {
    policy: Arc<AuthorizationPolicy>,
}

impl AuthorizationMiddleware {
    #[must_use]
    pub const fn new(policy: Arc<AuthorizationPolicy>) -> Self {
        Self { policy }
    }
}

#[salvo::async_trait]
impl salvo::Handler for AuthorizationMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
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

        let path = match canonical_request_path(req.uri().path()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Refusing request path");
                reject(res, ctrl, StatusCode::BAD_REQUEST);
                return;
            }
        };

        match self.policy.evaluate(path, get_principal_from_depot(depot)) {
            AuthDecision::Allow => {}
            AuthDecision::Deny(DenyReason::Unauthenticated) => {
                tracing::debug!("Denied: unauthenticated");
                challenge(res, ctrl);
            }
            AuthDecision::Deny(DenyReason::InsufficientRole) => {
                tracing::info!("Denied: insufficient role");
                reject(res, ctrl, StatusCode::FORBIDDEN);
            }
        }
    }
}
