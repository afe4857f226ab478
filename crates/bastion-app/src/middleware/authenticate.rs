use std::sync::Arc;

use salvo::Depot;
use salvo::http::{Method, StatusCode, header::AUTHORIZATION};

use bastion_service::auth::depot::depot_keys;
use bastion_service::auth::{Credentials, DepotPrincipal, RequestAuthenticator};
use bastion_service::error::ServiceError;

use super::{challenge, reject};

/// ## Summary
/// Authentication middleware that authenticates the request from its HTTP
/// Basic credentials and stores the outcome in the depot.
///
/// A request without an `Authorization` header continues as anonymous and is
/// left to the authorization middleware. Credentials that are present but
/// malformed or wrong end the request with a 401 challenge, whatever the path.
///
/// ## Side Effects
/// Inserts a `DepotPrincipal` into the depot under `AUTHENTICATED_PRINCIPAL`.
pub struct AuthenticationMiddleware {
    authenticator: Arc<RequestAuthenticator>,
}

impl AuthenticationMiddleware {
    #[must_use]
    pub const fn new(authenticator: Arc<RequestAuthenticator>) -> Self {
        Self { authenticator }
    }
}

#[salvo::async_trait]
impl salvo::Handler for AuthenticationMiddleware {
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
        tracing::trace!("Authenticating request");

        if req.method() == Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotPrincipal::Anonymous);
            return;
        }

        let Some(header) = req.headers().get(AUTHORIZATION) else {
            tracing::trace!("No credentials presented");
            depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotPrincipal::Anonymous);
            return;
        };

        let credentials = match header
            .to_str()
            .map_err(|e| ServiceError::MalformedInput(format!("Header is not ASCII: {e}")))
            .and_then(Credentials::from_basic_header)
        {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed credentials");
                challenge(res, ctrl);
                return;
            }
        };

        match self.authenticator.authenticate(&credentials).await {
            Ok(principal) => {
                tracing::debug!(username = principal.username(), "Request authenticated");
                depot.insert(
                    depot_keys::AUTHENTICATED_PRINCIPAL,
                    DepotPrincipal::Authenticated(principal),
                );
            }
            Err(ServiceError::InvalidCredentials) => {
                tracing::info!(username = credentials.username(), "Authentication failed");
                challenge(res, ctrl);
            }
            Err(ServiceError::StoreUnavailable(reason)) => {
                tracing::error!(%reason, "Credential store unavailable");
                reject(res, ctrl, StatusCode::SERVICE_UNAVAILABLE);
            }
            Err(e) => {
                tracing::error!(error = ?e, "Authentication failed with error");
                reject(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
}
