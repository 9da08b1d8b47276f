use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockDataServiceRows, TestConfig, TestStaffUser};

fn create_test_app(config: AppConfig) -> Router {
    appointment_routes(Arc::new(config))
}

fn config_for(mock_server: &MockServer) -> AppConfig {
    TestConfig::with_url(&mock_server.uri()).to_app_config()
}

fn upcoming_date() -> String {
    (Utc::now().date_naive() + Duration::days(7)).to_string()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn mount_booked_times(mock_server: &MockServer, times: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("select", "appointment_time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(times))
        .mount(mock_server)
        .await;
}

fn booking_body(doctor_id: Uuid, date: &str, time: &str) -> Value {
    json!({
        "full_name": "Ayşe Yılmaz",
        "phone": "532 123 45 67",
        "tc_number": "12345678901",
        "appointment_type": "new",
        "doctor_id": doctor_id,
        "appointment_date": date,
        "appointment_time": time
    })
}

fn post_booking(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn web_booking_creates_pending_appointment() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    mount_booked_times(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockDataServiceRows::appointment_row(&doctor_id.to_string(), &date, "10:00", "pending")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config_for(&mock_server));

    let response = app
        .oneshot(post_booking(&booking_body(doctor_id, &date, "10:00")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["appointment"]["status"], "pending");
    assert_eq!(body["appointment"]["created_by"], "web");
}

#[tokio::test]
async fn taken_slot_is_rejected_at_submission() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    // Another booking completed after the picker was rendered. The stored
    // value carries seconds; the re-check still matches.
    mount_booked_times(&mock_server, json!([ { "appointment_time": "10:00:00" } ])).await;

    let app = create_test_app(config_for(&mock_server));

    let response = app
        .oneshot(post_booking(&booking_body(doctor_id, &date, "10:00")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn uniqueness_rejection_from_data_service_maps_to_conflict() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    // The re-check saw a free slot, but the insert lost the race and hit the
    // unique constraint.
    mount_booked_times(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config_for(&mock_server));

    let response = app
        .oneshot(post_booking(&booking_body(doctor_id, &date, "10:00")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_phone_is_rejected_before_any_remote_call() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    let mut body = booking_body(doctor_id, &date, "10:00");
    body["phone"] = json!("12345");

    let app = create_test_app(config_for(&mock_server));

    let response = app.oneshot(post_booking(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No data-service mock was mounted; a remote call would have failed the
    // test through an unexpected-request error as well.
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_length_identity_number_is_rejected() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    let mut body = booking_body(doctor_id, &date, "10:00");
    body["tc_number"] = json!("123456");

    let app = create_test_app(config_for(&mock_server));

    let response = app.oneshot(post_booking(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn date_outside_booking_window_is_rejected() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    let too_far = (Utc::now().date_naive() + Duration::days(45)).to_string();
    let app = create_test_app(config_for(&mock_server));

    let response = app
        .oneshot(post_booking(&booking_body(doctor_id, &too_far, "10:00")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let past = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let app = create_test_app(config_for(&mock_server));

    let response = app
        .oneshot(post_booking(&booking_body(doctor_id, &past, "10:00")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn manual_booking_defaults_to_confirmed() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let admin = TestStaffUser::admin("reception");
    let token = admin.bearer_token(&config.session_secret);

    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    mount_booked_times(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {
                "id": Uuid::new_v4().to_string(),
                "full_name": "Ayşe Yılmaz",
                "phone": "+905321234567",
                "tc_number": "12345678901",
                "appointment_type": "control",
                "doctor_id": doctor_id.to_string(),
                "appointment_date": date,
                "appointment_time": "11:00",
                "status": "confirmed",
                "created_by": "admin",
                "created_at": Utc::now().to_rfc3339()
            }
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config);

    let request_body = json!({
        "full_name": "Ayşe Yılmaz",
        "phone": "5321234567",
        "tc_number": "12345678901",
        "appointment_type": "control",
        "doctor_id": doctor_id,
        "appointment_date": date,
        "appointment_time": "11:00"
    });

    let request = Request::builder()
        .method("POST")
        .uri("/manual")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(request_body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["created_by"], "admin");
}

#[tokio::test]
async fn manual_booking_requires_a_session() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(config_for(&mock_server));

    let request = Request::builder()
        .method("POST")
        .uri("/manual")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn appointment_listing_filters_by_doctor_and_date() {
    let mock_server = MockServer::start().await;
    let config = config_for(&mock_server);
    let admin = TestStaffUser::admin("reception");
    let token = admin.bearer_token(&config.session_secret);

    let doctor_id = Uuid::new_v4();
    let date = upcoming_date();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("appointment_date", format!("eq.{}", date)))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDataServiceRows::appointment_row(&doctor_id.to_string(), &date, "09:30", "confirmed")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(config);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/?doctor_id={}&date={}", doctor_id, date))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["appointments"][0]["appointment_time"], "09:30");
}
