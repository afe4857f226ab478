//! Response headers stamped on every response.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn frame_options_on_success_and_denial() {
    let service = create_test_service().await;

    TestRequest::get("/healthcheck")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("x-frame-options", "SAMEORIGIN");

    TestRequest::get("/users")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("x-frame-options", "SAMEORIGIN");

    TestRequest::get("/admin")
        .send(&service)
        .await
        .assert_challenge()
        .assert_header_contains("x-frame-options", "SAMEORIGIN");

    TestRequest::get("/admin")
        .basic_auth(USER)
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_header_contains("x-frame-options", "SAMEORIGIN");
}
