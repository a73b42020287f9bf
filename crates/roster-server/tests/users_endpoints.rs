use axum::http::{header, Method, StatusCode};
use roster_core::{fake_user, fake_users, parse_fake_user_index, User, FAKE_USER_COUNT};

mod support;

use support::{body_string, TestApp};

#[tokio::test]
async fn count_reports_rows_as_brace_text() {
    let app = TestApp::new(fake_users(42));

    let response = app.get("/user/count").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "{count of user: 42}");
}

#[tokio::test]
async fn count_on_empty_table_is_zero() {
    let app = TestApp::new(Vec::new());

    let response = app.get("/user/count").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "{count of user: 0}");
}

#[tokio::test]
async fn count_failure_is_opaque_500() {
    let app = TestApp::new(fake_users(3));
    app.store.set_unavailable(true);

    let response = app.get("/user/count").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Error");
}

#[tokio::test]
async fn random_returns_seeded_user_json() {
    let app = TestApp::new(fake_users(FAKE_USER_COUNT));

    let response = app.get("/user/random").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("content type"),
        "application/json"
    );
    let body = body_string(response).await;
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert!(value.get("Id").is_some_and(serde_json::Value::is_i64));
    let user: User = serde_json::from_value(value).expect("user");
    let index = parse_fake_user_index(&user.name).expect("fake name");
    assert!(index < FAKE_USER_COUNT);
    assert_eq!(user.emails.len(), 2);
    assert_eq!(user.emails[0], format!("fake-master-{index}@email.com"));
    assert_eq!(user.emails[1], format!("fake-slave-{index}@email.com"));
}

#[tokio::test]
async fn random_on_empty_table_is_404_with_empty_body() {
    let app = TestApp::new(Vec::new());

    for _ in 0..10 {
        let response = app.get("/user/random").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.is_empty());
    }
}

#[tokio::test]
async fn random_store_failure_is_internal_error() {
    let app = TestApp::new(vec![fake_user(0)]);
    app.store.set_unavailable(true);

    let response = app.get("/user/random").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "internal error");
}

#[tokio::test]
async fn any_method_reaches_user_handlers() {
    let app = TestApp::new(fake_users(2));

    let response = app.request(Method::POST, "/user/count").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "{count of user: 2}");

    let response = app.request(Method::DELETE, "/user/count").await;
    assert_eq!(response.status(), StatusCode::OK);
}
