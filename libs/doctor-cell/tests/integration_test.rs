use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

use doctor_cell::router::doctor_routes;
use doctor_cell::error::LOAD_FAILURE_MESSAGE;
use shared_utils::test_utils::{TestConfig, MockDirectoryResponses, DOCTORS_PATH};

async fn create_test_app(mock_server: &MockServer) -> Router {
    doctor_routes(TestConfig::with_base_url(&mock_server.uri()).to_arc())
}

async fn setup_directory_mock(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DOCTORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDirectoryResponses::directory()))
        .mount(mock_server)
        .await;
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: Value = serde_json::from_slice(&body).unwrap();

    (status, json_response)
}

fn ids(json_response: &Value, key: &str) -> Vec<String> {
    json_response[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|doctor| doctor["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_doctors_default_sort_by_fee() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_response["total"], 5);
    assert_eq!(ids(&json_response, "doctors"), vec!["doc-5", "101", "103", "102", "doc-4"]);
    assert_eq!(json_response["query"], "sort=fees");
    assert_eq!(json_response["has_active_filters"], false);
    assert_eq!(json_response["doctors"][3]["fees"], 800.0);
}

#[tokio::test]
async fn test_list_doctors_with_mode_specialties_and_experience_sort() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(
        &app,
        "/?consultationType=inClinic&specialties=Dentist,General%20Physician&sort=experience",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json_response, "doctors"), vec!["103", "101", "doc-4"]);
    assert_eq!(json_response["filters"]["consultation_type"], "inClinic");
    assert_eq!(json_response["filters"]["sort"], "experience");
    assert_eq!(
        json_response["active_filters"],
        json!(["2 Specialties", "In Clinic"])
    );
}

#[tokio::test]
async fn test_list_doctors_with_price_and_availability() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(
        &app,
        "/?availability=true&priceMin=400&priceMax=900&sort=fees-desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json_response, "doctors"), vec!["102", "101"]);
    assert_eq!(
        json_response["query"],
        "sort=fees-desc&priceMin=400&priceMax=900&availability=true"
    );
}

#[tokio::test]
async fn test_canonical_query_replays_price_bound_above_default() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCTORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "cheap", "name": "Dr. Low", "fees": "₹ 500" },
            { "id": "pricey", "name": "Dr. High", "fees": "₹ 6,000" },
            { "id": "premium", "name": "Dr. Top", "fees": "₹ 9,000" }
        ])))
        .mount(&mock_server)
        .await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/?priceMax=8000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json_response, "doctors"), vec!["cheap", "pricey"]);
    assert_eq!(json_response["query"], "sort=fees&priceMax=8000");

    let replay_uri = format!("/?{}", json_response["query"].as_str().unwrap());
    let (_, replayed) = get(&app, &replay_uri).await;
    assert_eq!(ids(&replayed, "doctors"), vec!["cheap", "pricey"]);
    assert_eq!(replayed["filters"], json_response["filters"]);
}

#[tokio::test]
async fn test_blank_search_is_ignored() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/?search=%20%20%20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_response["total"], 5);
    assert_eq!(json_response["has_active_filters"], false);
    assert_eq!(json_response["active_filters"], json!([]));
    assert_eq!(json_response["query"], "sort=fees");
}

#[tokio::test]
async fn test_list_doctors_search_by_location() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/?search=CHENNAI").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json_response, "doctors"), vec!["doc-4"]);
    assert_eq!(json_response["active_filters"], json!(["Search: \"CHENNAI\""]));
}

#[tokio::test]
async fn test_list_specialties() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/specialties").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_response["specialties"],
        json!(["Cosmetologist", "Dentist", "Dermatologist", "General Physician", "Homeopath"])
    );
    assert_eq!(json_response["total"], 5);
}

#[tokio::test]
async fn test_suggestions_default_limit() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/suggestions?q=dr").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json_response, "suggestions"), vec!["101", "102", "103"]);

    let (_, json_response) = get(&app, "/suggestions?q=dr&limit=50").await;
    assert_eq!(json_response["total"], 5);

    let (_, json_response) = get(&app, "/suggestions").await;
    assert_eq!(json_response["total"], 0);
}

#[tokio::test]
async fn test_suggestions_rejects_zero_limit() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/suggestions?q=dr&limit=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_response["error"].is_string());
}

#[tokio::test]
async fn test_get_doctor_detail() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/101").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_response["id"], "101");
    assert_eq!(json_response["name"], "Dr. Asha Rao");
    assert_eq!(json_response["clinic_display_name"], "Dr. Asha Rao's Clinic");
    assert_eq!(json_response["address"], "Bangalore");
    assert_eq!(json_response["offered_services"], json!(["General Consultation"]));
    assert_eq!(json_response["review_summary"]["total"], 2);
    assert_eq!(json_response["review_summary"]["average_rating"], 4.6);
    assert!(json_response["about_text"]
        .as_str()
        .unwrap()
        .starts_with("Dr. Asha Rao is a healthcare professional with 10 years"));
}

#[tokio::test]
async fn test_get_doctor_with_synthetic_id() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/doc-4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_response["name"], "Dr. Ravi Kumar");
    assert_eq!(json_response["fees"], 1200.0);
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mock_server = MockServer::start().await;
    setup_directory_mock(&mock_server).await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_response["error"], "Doctor not found");
}

#[tokio::test]
async fn test_upstream_failure_returns_static_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCTORS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockDirectoryResponses::error_response("upstream exploded"),
        ))
        .mount(&mock_server)
        .await;
    let app = create_test_app(&mock_server).await;

    let (status, json_response) = get(&app, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json_response["error"], LOAD_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_feed_is_fetched_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCTORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDirectoryResponses::directory()))
        .expect(1)
        .mount(&mock_server)
        .await;
    let app = create_test_app(&mock_server).await;

    for uri in ["/", "/specialties", "/suggestions?q=rao", "/101"] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "unexpected status for {}", uri);
    }

    mock_server.verify().await;
}

#[tokio::test]
async fn test_shared_config_arc_builds_router() {
    let config = Arc::new(TestConfig::default().to_app_config());
    let app = doctor_routes(config);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
