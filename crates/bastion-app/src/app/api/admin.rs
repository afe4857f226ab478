use std::collections::BTreeSet;

use salvo::http::{Method, StatusCode};
use salvo::{Depot, Request, Response, Router, handler, writing::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use bastion_core::constants::ADMIN_ROUTE_COMPONENT;
use bastion_core::types::Role;
use bastion_service::auth::get_principal_from_depot;
use bastion_service::error::ServiceError;

use crate::middleware::require_role::RequireRole;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// Create user request payload
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub roles: BTreeSet<Role>,
}

/// ## Summary
/// User response payload. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

fn admin_greeting(req: &Request, depot: &Depot) -> Json<serde_json::Value> {
    let username = get_principal_from_depot(depot).map(|p| p.username().to_string());
    Json(json!({
        "message": "Hello admin",
        "username": username,
        "path": req.uri().path(),
    }))
}

/// GET /admin
#[handler]
async fn admin_area(req: &mut Request, depot: &Depot) -> Json<serde_json::Value> {
    admin_greeting(req, depot)
}

/// ## Summary
/// POST /admin/users - provisions a new user.
///
/// Guarded twice: by the path policy and by a `RequireRole` hoop that keeps
/// the handler admin-only whatever rules are configured.
///
/// ## Errors
/// Returns HTTP 400 if the body is invalid or the account is malformed
/// Returns HTTP 409 if the username is taken
/// Returns HTTP 503 if the credential store is unavailable
#[handler]
async fn create_user_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let create_req: CreateUserRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = ?e, "Failed to parse create user request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let store = match get_store_from_depot(depot) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = ?e, "Credential store missing from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    if create_req.password.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Password is required");
        return;
    }

    match store
        .create(&create_req.username, &create_req.password, create_req.roles)
        .await
    {
        Ok(record) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(UserResponse {
                username: record.username,
                roles: record.roles,
            }));
        }
        Err(ServiceError::DuplicateUser(username)) => {
            render_error(res, StatusCode::CONFLICT, &format!("User {username} already exists"));
        }
        Err(ServiceError::MalformedInput(reason)) => {
            render_error(res, StatusCode::BAD_REQUEST, &reason);
        }
        Err(ServiceError::StoreUnavailable(reason)) => {
            tracing::error!(%reason, "Credential store unavailable");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Credential store unavailable");
        }
        Err(e) => {
            tracing::error!(error = ?e, "Failed to create user");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

fn render_error(res: &mut Response, status: StatusCode, message: &str) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: message.to_string(),
    }));
}

/// Everything under `/admin` that no other admin route serves.
///
/// Bound with `goal` so every method settles here and the request never
/// reaches the outer catch-all with a second wildcard bound.
#[handler]
async fn admin_fallback(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if req.method() == Method::GET {
        res.render(admin_greeting(req, depot));
    } else {
        render_error(res, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(ADMIN_ROUTE_COMPONENT)
        .get(admin_area)
        .push(
            Router::with_path("users")
                .hoop(RequireRole::new([Role::Admin]))
                .post(create_user_handler),
        )
        .push(Router::with_path("{**rest}").goal(admin_fallback))
}
