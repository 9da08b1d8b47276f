use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use admin_cell::router::admin_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockDataServiceRows, TestConfig, TestStaffUser};

fn create_test_app(config: AppConfig) -> Router {
    admin_routes(Arc::new(config))
}

fn config_for(mock_server: &MockServer) -> AppConfig {
    TestConfig::with_url(&mock_server.uri()).to_app_config()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn count_response(total: i64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-range", format!("0-0/{}", total).as_str())
        .set_body_json(json!([]))
}

#[tokio::test]
async fn dashboard_stats_combine_exact_counts() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let admin = TestStaffUser::admin("reception");
    let token = admin.bearer_token(&config.session_secret);
    let today = Utc::now().date_naive();

    // Specific filters are mounted before the unfiltered total.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.pending"))
        .respond_with(count_response(4))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.confirmed"))
        .respond_with(count_response(11))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("appointment_date", format!("eq.{}", today)))
        .respond_with(count_response(3))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(count_response(17))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config);

    let request = Request::builder()
        .method("GET")
        .uri("/stats")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["total_appointments"], 17);
    assert_eq!(body["pending_appointments"], 4);
    assert_eq!(body["confirmed_appointments"], 11);
    assert_eq!(body["today_appointments"], 3);
}

#[tokio::test]
async fn stats_require_a_session() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(config_for(&mock_server));

    let request = Request::builder()
        .method("GET")
        .uri("/stats")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn settings_are_publicly_readable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .and(query_param("is_active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDataServiceRows::settings_row("Pediatric Clinic")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config_for(&mock_server));

    let request = Request::builder()
        .method("GET")
        .uri("/settings")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["site_title"], "Pediatric Clinic");
}

#[tokio::test]
async fn settings_update_is_admin_only() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let doctor_user = TestStaffUser::doctor("drkerem", uuid::Uuid::new_v4());
    let token = doctor_user.bearer_token(&config.session_secret);

    let app = create_test_app(config);

    let request = Request::builder()
        .method("PUT")
        .uri("/settings")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "site_title": "New Title" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_updates_settings_fields() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let admin = TestStaffUser::admin("reception");
    let token = admin.bearer_token(&config.session_secret);

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDataServiceRows::settings_row("Pediatric Clinic")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDataServiceRows::settings_row("Renamed Clinic")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config);

    let request = Request::builder()
        .method("PUT")
        .uri("/settings")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "site_title": "Renamed Clinic" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["site_title"], "Renamed Clinic");
}
