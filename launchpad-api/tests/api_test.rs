use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use launchpad_api::{app, AppState};
use launchpad_core::{identity::encode_token, CoreResult, LaunchProvider, Services};
use launchpad_shared::{Launch, LaunchId, Mission, Rocket};
use launchpad_store::{InMemoryUserStore, StaticLaunchProvider};
use serde_json::{json, Value};
use tower::ServiceExt;

fn launch(id: i64) -> Launch {
    Launch {
        id,
        site: Some("KSC LC 39A".to_string()),
        mission: Some(Mission {
            name: Some(format!("Mission {}", id)),
            mission_patch_small: Some(format!("https://patches.example.com/{}-small.png", id)),
            mission_patch_large: Some(format!("https://patches.example.com/{}-large.png", id)),
        }),
        rocket: Some(Rocket {
            id: "falcon9".to_string(),
            name: Some("Falcon 9".to_string()),
            rocket_type: Some("FT".to_string()),
        }),
    }
}

fn test_app() -> (Router, Arc<InMemoryUserStore>) {
    let users = Arc::new(InMemoryUserStore::new());
    let provider = StaticLaunchProvider::new((1..=25).map(launch).collect());
    let services = Services::new(Arc::new(provider), users.clone());
    (app(AppState::new(services)), users)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn ids(launches: &Value) -> Vec<i64> {
    launches.as_array().unwrap().iter().map(|l| l["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_launches_pagination() {
    let (app, _) = test_app();

    let (status, first) = send(&app, Method::GET, "/launches", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&first["launches"]), (6..=25).rev().collect::<Vec<_>>());
    assert_eq!(first["cursor"], "6");
    assert_eq!(first["hasMore"], true);

    let (_, second) = send(&app, Method::GET, "/launches?pageSize=20&after=6", None, None).await;
    assert_eq!(ids(&second["launches"]), vec![5, 4, 3, 2, 1]);
    assert_eq!(second["cursor"], "1");
    assert_eq!(second["hasMore"], false);
}

#[tokio::test]
async fn test_empty_page_has_null_cursor() {
    let (app, _) = test_app();
    let (_, page) = send(&app, Method::GET, "/launches?pageSize=0", None, None).await;
    assert_eq!(page["launches"], json!([]));
    assert_eq!(page["cursor"], Value::Null);
    assert_eq!(page["hasMore"], false);
}

#[tokio::test]
async fn test_launch_by_id_and_patch_size() {
    let (app, _) = test_app();

    let (status, large) = send(&app, Method::GET, "/launches/7", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(large["mission"]["missionPatch"], "https://patches.example.com/7-large.png");
    assert_eq!(large["rocket"]["type"], "FT");
    assert_eq!(large["isBooked"], false);

    let (_, small) = send(&app, Method::GET, "/launches/7?patchSize=SMALL", None, None).await;
    assert_eq!(small["mission"]["missionPatch"], "https://patches.example.com/7-small.png");

    let (status, _) = send(&app, Method::GET, "/launches/404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_and_me() {
    let (app, users) = test_app();

    let (_, anonymous) = send(&app, Method::GET, "/me", None, None).await;
    assert_eq!(anonymous, Value::Null);

    let (status, login) = send(&app, Method::POST, "/login", None, Some(json!({ "email": "daisy@apollographql.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();
    assert_eq!(token, encode_token("daisy@apollographql.com"));

    let (_, me) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(me["email"], "daisy@apollographql.com");
    assert_eq!(me["trips"], json!([]));

    let (_, again) = send(&app, Method::GET, "/me", Some(&format!("Bearer {}", token)), None).await;
    assert_eq!(again["id"], me["id"]);
    assert_eq!(users.user_count().await, 1);
}

#[tokio::test]
async fn test_login_rejects_invalid_email() {
    let (app, users) = test_app();
    let (status, login) = send(&app, Method::POST, "/login", None, Some(json!({ "email": "not-an-email" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token"], Value::Null);
    assert_eq!(users.user_count().await, 0);
}

#[tokio::test]
async fn test_book_and_cancel_trips() {
    let (app, _) = test_app();
    let token = encode_token("daisy@apollographql.com");

    let (status, booked) = send(&app, Method::POST, "/trips", Some(&token), Some(json!({ "launchIds": [1, 2] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booked["success"], true);
    assert_eq!(booked["message"], "trips booked successfully");
    assert_eq!(ids(&booked["launches"]), vec![1, 2]);
    assert!(booked["launches"].as_array().unwrap().iter().all(|l| l["isBooked"] == true));

    let (_, me) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(ids(&me["trips"]), vec![1, 2]);

    let (_, launch) = send(&app, Method::GET, "/launches/2", Some(&token), None).await;
    assert_eq!(launch["isBooked"], true);

    let (_, cancelled) = send(&app, Method::DELETE, "/trips/2", Some(&token), None).await;
    assert_eq!(cancelled["success"], true);
    assert_eq!(cancelled["message"], "trip cancelled");
    assert_eq!(ids(&cancelled["launches"]), vec![2]);
    assert_eq!(cancelled["launches"][0]["isBooked"], false);

    let (_, again) = send(&app, Method::DELETE, "/trips/2", Some(&token), None).await;
    assert_eq!(again["success"], false);
    assert_eq!(again["message"], "failed to cancel trip");
    assert_eq!(again["launches"], json!([]));
}

#[tokio::test]
async fn test_partial_booking() {
    let (app, _) = test_app();
    let token = encode_token("daisy@apollographql.com");

    let (status, result) = send(&app, Method::POST, "/trips", Some(&token), Some(json!({ "launchIds": [1, 2, 99] }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["success"], false);
    assert_eq!(result["message"], "the following launches couldn't be booked: 99");
    assert_eq!(ids(&result["launches"]), vec![1, 2]);
}

#[tokio::test]
async fn test_mutations_require_identity() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::POST, "/trips", None, Some(json!({ "launchIds": [1] }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::DELETE, "/trips/1", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_without_email_reuses_caller_identity() {
    let (app, users) = test_app();

    let (status, login) = send(&app, Method::POST, "/login", Some("YUBhLmE="), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token"], "YUBhLmE=");

    let (status, anonymous) = send(&app, Method::POST, "/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(anonymous, json!({ "token": null }));
    assert_eq!(users.user_count().await, 1);
}

#[tokio::test]
async fn test_malformed_input_is_a_json_bad_request() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/launches/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/launches?pageSize=x", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let token = encode_token("daisy@apollographql.com");
    let (status, body) = send(&app, Method::POST, "/trips", Some(&token), Some(json!({ "launchIds": "1" }))).await;
    assert!(status.is_client_error());
    assert!(body["error"].is_string());
}

struct SlowLaunches;

#[async_trait]
impl LaunchProvider for SlowLaunches {
    async fn fetch_all(&self) -> CoreResult<Vec<Launch>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn fetch_by_id(&self, _id: LaunchId) -> CoreResult<Option<Launch>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let services = Services::new(Arc::new(SlowLaunches), Arc::new(InMemoryUserStore::new()));
    let app = app(AppState::new(services).with_request_timeout(Duration::from_millis(50)));

    let (status, _) = send(&app, Method::GET, "/launches", None, None).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
