mod admin;
mod healthcheck;
mod users;
mod whoami;

use salvo::http::StatusCode;
use salvo::{Response, Router, handler};

use crate::bootstrap::Security;
use crate::middleware::{
    authenticate::AuthenticationMiddleware, authorize::AuthorizationMiddleware,
    frame_options::FrameOptionsHandler,
};
use crate::store_handler::StoreHandler;

/// ## Summary
/// Constructs the application router.
///
/// The health check answers without credentials. Every other route sits
/// behind authentication then authorization, including paths that match no
/// route, so an unknown path is only reported as 404 to callers the policy
/// lets through. Every response, the health check and denials included,
/// carries `X-Frame-Options`.
#[must_use]
pub fn routes(security: &Security) -> Router {
    Router::new()
        .hoop(FrameOptionsHandler)
        .push(healthcheck::routes())
        .push(
            Router::new()
                .hoop(StoreHandler {
                    store: security.store.clone(),
                })
                .hoop(AuthenticationMiddleware::new(security.authenticator.clone()))
                .hoop(AuthorizationMiddleware::new(security.policy.clone()))
                .push(users::routes())
                .push(admin::routes())
                .push(whoami::routes())
                .push(Router::with_path("{**rest}").goal(not_found)),
        )
}

#[handler]
async fn not_found(res: &mut Response) {
    res.status_code(StatusCode::NOT_FOUND);
}
