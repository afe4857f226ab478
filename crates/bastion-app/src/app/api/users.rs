use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use bastion_core::constants::USERS_ROUTE_COMPONENT;
use bastion_service::auth::get_principal_from_depot;

/// ## Summary
/// GET /users - greets the caller. Reachable by any principal holding `USER`.
#[handler]
async fn greet(depot: &Depot) -> Json<serde_json::Value> {
    let username = get_principal_from_depot(depot).map(|p| p.username().to_string());
    Json(json!({ "message": "Hello user", "username": username }))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(USERS_ROUTE_COMPONENT).get(greet)
}
