//! Authentication integration tests.
//!
//! Credentials that are present are always checked, and a failure ends the
//! request with a 401 challenge whatever the path.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn healthcheck_needs_no_credentials() {
    let service = create_test_service().await;

    TestRequest::get("/healthcheck")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("OK");
}

#[test_log::test(tokio::test)]
async fn missing_credentials_on_protected_path_get_challenge() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn wrong_password_gets_challenge() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .basic_auth((USER.0, "wrong"))
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn unknown_user_is_indistinguishable_from_wrong_password() {
    let service = create_test_service().await;

    let unknown = TestRequest::get("/users")
        .basic_auth(("nobody", "dummy"))
        .send(&service)
        .await
        .assert_challenge();
    let wrong = TestRequest::get("/users")
        .basic_auth((USER.0, "wrong"))
        .send(&service)
        .await
        .assert_challenge();

    assert_eq!(unknown.body_string(), wrong.body_string());
}

#[test_log::test(tokio::test)]
async fn usernames_are_case_sensitive() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .basic_auth(("ADMIN", ADMIN.1))
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn malformed_header_gets_challenge() {
    let service = create_test_service().await;

    TestRequest::get("/users")
        .header("Authorization", "Basic !!!not-base64!!!")
        .send(&service)
        .await
        .assert_challenge();

    TestRequest::get("/users")
        .header("Authorization", "Bearer some-token")
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn bad_credentials_are_rejected_even_on_unprotected_paths() {
    let service = create_test_service().await;

    TestRequest::get("/whoami")
        .basic_auth((ADMIN.0, "wrong"))
        .send(&service)
        .await
        .assert_challenge();
}

#[test_log::test(tokio::test)]
async fn whoami_reports_principal_and_roles() {
    let service = create_test_service().await;

    let response = TestRequest::get("/whoami")
        .basic_auth(ADMIN)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["username"], "admin");
    assert_eq!(body["roles"], serde_json::json!(["USER", "ADMIN"]));
    assert!(!response.body_string().contains("argon2"));
}

#[test_log::test(tokio::test)]
async fn options_requests_bypass_the_chain() {
    let service = create_test_service().await;

    let response = TestRequest::options("/admin")
        .send(&service)
        .await;

    assert_ne!(response.status, StatusCode::UNAUTHORIZED);
    assert_ne!(response.status, StatusCode::FORBIDDEN);
}
