use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use doramas::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn spawn_app() -> Router {
    let state = doramas::api::create_app_state(Config::default(), None);
    doramas::api::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, "POST", "/api/dramas", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

#[tokio::test]
async fn test_create_and_list() {
    let app = spawn_app();

    let drama = create(
        &app,
        json!({"title": "Reply 1988", "year": 2015, "status": "watched", "rating": 5}),
    )
    .await;
    assert_eq!(drama["title"], "Reply 1988");
    assert_eq!(drama["status"], "watched");
    assert_eq!(drama["created_at"], drama["updated_at"]);
    assert!(drama["id"].is_string());

    let (status, body) = send(&app, "GET", "/api/dramas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["stats"]["watched"], 1);
    assert_eq!(body["data"]["stats"]["average_rating"], 5.0);
    assert_eq!(body["data"]["has_active_filters"], false);
    assert_eq!(body["data"]["dramas"][0]["id"], drama["id"]);
}

#[tokio::test]
async fn test_create_rejects_invalid_form() {
    let app = spawn_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/dramas",
        Some(json!({"title": "", "year": 1900, "episodes": "many"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["field_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "year", "episodes"]);

    let (_, body) = send(&app, "GET", "/api/dramas", None).await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["empty_state"], "no_records");
}

#[tokio::test]
async fn test_numeric_fields_accept_text() {
    let app = spawn_app();
    let drama = create(
        &app,
        json!({"title": "Goblin", "year": "2016", "rating": "4", "episodes": "16"}),
    )
    .await;
    assert_eq!(drama["year"], 2016);
    assert_eq!(drama["rating"], 4);
    assert_eq!(drama["episodes"], 16);
}

#[tokio::test]
async fn test_filters_via_query() {
    let app = spawn_app();
    create(
        &app,
        json!({"title": "Goblin", "year": 2016, "rating": 3, "country": "Coreia do Sul"}),
    )
    .await;
    create(
        &app,
        json!({"title": "Meteor Garden", "year": 2018, "rating": 5, "opinion": "Amei esse drama", "country": "China"}),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/dramas?rating=4", None).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["dramas"][0]["title"], "Meteor Garden");
    assert_eq!(body["data"]["has_active_filters"], true);

    let (_, body) = send(&app, "GET", "/api/dramas?search=AMEI&status=all", None).await;
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = send(
        &app,
        "GET",
        "/api/dramas?country=Coreia%20do%20Sul&year=2018",
        None,
    )
    .await;
    assert_eq!(body["data"]["count"], 0);
    assert_eq!(body["data"]["empty_state"], "no_matches");
    assert_eq!(body["data"]["stats"]["want_to_watch"], 2);

    let (status, _) = send(&app, "GET", "/api/dramas?year=soon", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let app = spawn_app();
    let drama = create(&app, json!({"title": "Vincenzo", "year": 2020})).await;
    let id = drama["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/dramas/{id}"),
        Some(json!({"title": "Vincenzo", "year": 2021, "status": "watching"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], drama["id"]);
    assert_eq!(body["data"]["created_at"], drama["created_at"]);
    assert_eq!(body["data"]["year"], 2021);

    let (_, body) = send(&app, "GET", "/api/dramas?year=2021", None).await;
    assert_eq!(body["data"]["count"], 1);
    let (_, body) = send(&app, "GET", "/api/dramas?year=2020", None).await;
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let app = spawn_app();
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/dramas/{missing}"),
        Some(json!({"title": "Ghost", "year": 2020})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", &format!("/api/dramas/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/dramas/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = spawn_app();
    let drama = create(&app, json!({"title": "Goblin", "year": 2016})).await;
    let uri = format!("/api/dramas/{}", drama["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], false);

    let (_, body) = send(&app, "GET", "/api/dramas/stats", None).await;
    assert_eq!(body["data"]["average_rating"], 0.0);
}

#[tokio::test]
async fn test_options() {
    let app = spawn_app();
    create(&app, json!({"title": "A", "year": 2015, "genre": "Romance"})).await;
    create(&app, json!({"title": "B", "year": 2019, "genre": "Romance", "country": "Japão"})).await;

    let (status, body) = send(&app, "GET", "/api/dramas/options", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["years"], json!([2019, 2015]));
    assert_eq!(data["genres"], json!(["Romance"]));
    assert_eq!(data["countries"], json!(["Japão"]));
    assert_eq!(data["statuses"].as_array().unwrap().len(), 3);
    assert_eq!(data["statuses"][0]["value"], "want-to-watch");
    assert_eq!(data["ratings"][0]["value"], 5);
    assert_eq!(data["min_year"], 1950);
    assert_eq!(data["catalog_genres"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app();
    create(&app, json!({"title": "Goblin", "year": 2016})).await;

    let (status, body) = send(&app, "GET", "/api/system/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["drama_count"], 1);
    assert_eq!(body["data"]["metrics_enabled"], false);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_whole_number_floats_accepted() {
    let app = spawn_app();
    let drama = create(
        &app,
        json!({"title": "Goblin", "year": 2016.0, "rating": 4.0, "episodes": 16.0}),
    )
    .await;
    assert_eq!(drama["year"], 2016);
    assert_eq!(drama["rating"], 4);

    let (status, body) = send(
        &app,
        "POST",
        "/api/dramas",
        Some(json!({"title": "Goblin", "year": 2016, "rating": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"][0]["field"], "rating");
}

#[tokio::test]
async fn test_malformed_body_uses_envelope() {
    let app = spawn_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/dramas")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"title\": \"Goblin\", \"year\": [2016]}"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/api/dramas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let app = spawn_app();
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
