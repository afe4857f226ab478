//! User provisioning through `POST /admin/users`.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn admin_creates_user_who_can_then_log_in() {
    let service = create_test_service().await;

    let created = TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&json!({"username": "carol", "password": "s3cret", "roles": ["USER"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(created.json()["username"], "carol");
    assert!(created.json().get("password_hash").is_none());

    TestRequest::get("/users")
        .basic_auth(("carol", "s3cret"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::get("/admin")
        .basic_auth(("carol", "s3cret"))
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn duplicate_username_conflicts() {
    let service = create_test_service().await;

    TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&json!({"username": "in28minutes", "password": "other", "roles": ["ADMIN"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CONFLICT);

    // The existing account keeps its password and roles.
    TestRequest::get("/admin")
        .basic_auth(("in28minutes", "other"))
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn malformed_accounts_are_bad_requests() {
    let service = create_test_service().await;

    for body in [
        json!({"username": "", "password": "pw", "roles": ["USER"]}),
        json!({"username": "a:b", "password": "pw", "roles": ["USER"]}),
        json!({"username": "dave", "password": "pw", "roles": []}),
        json!({"username": "dave", "password": "pw", "roles": ["OPERATOR"]}),
        json!({"username": "dave", "password": "", "roles": ["USER"]}),
    ] {
        TestRequest::post("/admin/users")
            .basic_auth(ADMIN)
            .json_body(&body)
            .send(&service)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[test_log::test(tokio::test)]
async fn only_admins_can_create_users() {
    let service = create_test_service().await;

    TestRequest::post("/admin/users")
        .basic_auth(USER)
        .json_body(&json!({"username": "mallory", "password": "pw", "roles": ["ADMIN"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    TestRequest::get("/users")
        .basic_auth(("mallory", "pw"))
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn overlong_username_is_a_bad_request() {
    let service = create_test_service().await;

    TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&json!({"username": "x".repeat(60), "password": "pw", "roles": ["USER"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/admin/users")
        .basic_auth(ADMIN)
        .json_body(&json!({"username": "x".repeat(50), "password": "pw", "roles": ["USER"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn anonymous_writes_under_admin_are_challenged() {
    let service = create_test_service().await;

    TestRequest::post("/admin/reports")
        .send(&service)
        .await
        .assert_challenge();

    TestRequest::delete("/admin/reports")
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn unserved_methods_under_admin_are_not_allowed() {
    let service = create_test_service().await;

    TestRequest::post("/admin/reports")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);

    TestRequest::delete("/admin/reports/2024")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);

    TestRequest::delete("/admin/users")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);

    // USER is stopped by the path policy before routing.
    TestRequest::post("/admin/reports")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_log::test(tokio::test)]
async fn get_on_users_collection_falls_back_to_greeting() {
    let service = create_test_service().await;

    let response = TestRequest::get("/admin/users")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("Hello admin");
    assert_eq!(response.json()["path"], "/admin/users");
}
