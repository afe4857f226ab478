//! Authorization integration tests.
//!
//! Default policy, first match wins:
//! - `/users` requires `USER`
//! - `/admin/**` requires `ADMIN`
//!
//! Paths no rule covers are open to any authenticated principal.

use salvo::http::StatusCode;

use bastion_test::component::config::Settings;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn user_can_reach_users() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("in28minutes");
}

#[test_log::test(tokio::test)]
async fn admin_holding_user_can_reach_users() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn user_is_forbidden_from_admin_area() {
    let service = create_test_service().await;

    for path in ["/admin", "/admin/", "/admin/x", "/admin/reports/2024"] {
        TestRequest::get(path)
            .basic_auth(USER)
            .send(&service)
            .await
            .assert_status(StatusCode::FORBIDDEN)
            .assert_header_absent("www-authenticate");
    }
}

#[test_log::test(tokio::test)]
async fn admin_can_reach_admin_area() {
    let service = create_test_service().await;

    TestRequest::get("/admin/reports")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("Hello admin");

    TestRequest::get("/admin")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn anonymous_admin_request_gets_challenge_not_forbidden() {
    let service = create_test_service().await;

    TestRequest::get("/admin/x")
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn unlisted_path_is_not_found_once_authenticated() {
    let service = create_test_service().await;

    TestRequest::get("/nowhere")
        .send(&service)
        .await
        .assert_challenge();

    TestRequest::get("/nowhere")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn prefix_lookalikes_are_not_covered_by_admin_rule() {
    let service = create_test_service().await;

    // Not under /admin/**, so any authenticated principal may proceed to routing.
    TestRequest::get("/administrator")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn encoded_paths_are_refused() {
    let service = create_test_service().await;

    TestRequest::get("/users%2F..%2Fadmin")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn trailing_slash_does_not_escape_exact_rule() {
    let service = create_test_service().await;

    TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&serde_json::json!({"username": "boss", "password": "pw", "roles": ["ADMIN"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    for path in ["/users", "/users/"] {
        TestRequest::get(path)
            .basic_auth(("boss", "pw"))
            .send(&service)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    TestRequest::get("/users/")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn handler_guard_holds_when_policy_leaves_admin_open() {
    let mut settings = Settings::from_toml(
        r#"
        [[policy.rules]]
        pattern = "/users"
        roles = ["USER"]
        "#,
    )
    .expect("settings should load");
    settings.hasher = test_settings().hasher;
    let service = create_test_service_with(&settings).await;

    // No rule covers /admin, so the path policy lets any principal through.
    TestRequest::get("/admin")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::post("/admin/users")
        .basic_auth(USER)
        .json_body(&serde_json::json!({"username": "mallory", "password": "pw", "roles": ["ADMIN"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::post("/admin/users")
        .json_body(&serde_json::json!({"username": "mallory", "password": "pw", "roles": ["ADMIN"]}))
        .send(&service)
        .await
        .assert_challenge();

    TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&serde_json::json!({"username": "carol", "password": "pw", "roles": ["USER"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
}
