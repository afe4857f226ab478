use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use bastion_core::constants::WHOAMI_ROUTE_COMPONENT;
use bastion_service::auth::get_principal_from_depot;

/// ## Summary
/// Returns the authenticated principal as JSON, or `{"status":"anonymous"}`.
#[handler]
async fn whoami(depot: &Depot) -> Json<serde_json::Value> {
    match get_principal_from_depot(depot) {
        Some(principal) => Json(serde_json::to_value(principal).unwrap_or(json!(null))),
        None => Json(json!({"status": "anonymous"})),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(WHOAMI_ROUTE_COMPONENT).get(whoami)
}
