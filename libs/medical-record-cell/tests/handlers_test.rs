use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medical_record_cell::medical_record_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

fn app(config: &AppConfig) -> Router {
    medical_record_routes(Arc::new(config.clone()))
}

fn authed(method_name: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method_name)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");
    match body {
        Some(b) => builder.body(Body::from(b.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_records_for_patient() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .and(query_param("patient_id", format!("eq.{}", patient.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::medical_record_row(&Uuid::new_v4().to_string(), &patient.id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&config).oneshot(authed("GET", "/", &token, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["records"][0]["record_type"], "lab_result");
}

#[tokio::test]
async fn test_doctor_cannot_list_own_records() {
    let config = TestConfig::default().to_app_config();
    let doctor = TestUser::doctor("doc@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    let response = app(&config).oneshot(authed("GET", "/", &token, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_record_uploads_file() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/medical-records/.+\.pdf$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut stored = MockStoreResponses::medical_record_row(&Uuid::new_v4().to_string(), &patient.id);
    stored["file_url"] = json!(format!(
        "{}/storage/v1/object/public/medical-records/{}/x.pdf",
        mock_server.uri(),
        patient.id
    ));

    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_records"))
        .and(body_partial_json(json!({ "title": "Blood panel", "patient_id": patient.id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(authed(
            "POST",
            "/",
            &token,
            Some(json!({
                "title": "Blood panel",
                "date": "2026-09-01",
                "record_type": "lab_result",
                "file_data": "data:application/pdf;base64,aGVsbG8=",
                "file_type": "application/pdf"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert!(body["file_url"].as_str().unwrap().contains("/medical-records/"));
}

#[tokio::test]
async fn test_create_record_with_bad_file_is_rejected() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);

    let response = app(&config)
        .oneshot(authed(
            "POST",
            "/",
            &token,
            Some(json!({
                "title": "Scan",
                "date": "2026-09-01",
                "file_data": "%%%not-base64%%%",
                "file_type": "image/png"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_record_of_other_patient_is_forbidden() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let record_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::medical_record_row(&record_id, &Uuid::new_v4().to_string())
        ])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(authed("GET", &format!("/{}", record_id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_record_removes_file_and_row() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, &config.jwt_secret, None);
    let record_id = Uuid::new_v4().to_string();

    let mut row = MockStoreResponses::medical_record_row(&record_id, &patient.id);
    row["file_url"] = json!(format!(
        "{}/storage/v1/object/public/medical-records/{}/{}.pdf",
        mock_server.uri(),
        patient.id,
        record_id
    ));

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/storage/v1/object/medical-records/{}/{}.pdf", patient.id, record_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/medical_records"))
        .and(query_param("id", format!("eq.{}", record_id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(authed("DELETE", &format!("/{}", record_id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_doctor_without_appointment_cannot_view_patient_records() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let doctor = TestUser::doctor("doc@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(authed("GET", &format!("/patient/{}", Uuid::new_v4()), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_treating_doctor_views_patient_records() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store(&mock_server.uri()).to_app_config();
    let doctor = TestUser::doctor("doc@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, &config.jwt_secret, None);
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": Uuid::new_v4() }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::medical_record_row(&Uuid::new_v4().to_string(), &patient_id)
        ])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(authed("GET", &format!("/patient/{}", patient_id), &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["total"], 1);
}
