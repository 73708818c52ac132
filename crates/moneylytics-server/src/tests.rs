//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use moneylytics_core::{db::Database, AppConfig, Utterance};
use tower::ServiceExt;

fn setup_assistant() -> Assistant {
    let db = Database::in_memory().unwrap();
    Assistant::new(db, AppConfig::default())
}

/// Router over an assistant where user 1 has finished onboarding
fn setup_test_app() -> Router {
    let assistant = setup_assistant();
    assistant.handle_utterance(&Utterance::new(1, "Ann", "hi"));
    assistant.handle_utterance(&Utterance::new(1, "Ann", "EUR"));
    create_router(assistant, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn utterance(user_id: i64, text: &str) -> Request<Body> {
    post_json(
        "/api/utterances",
        serde_json::json!({
            "user_id": user_id,
            "text": text,
            "display_name": "Ann"
        }),
    )
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

// ========== Utterance API Tests ==========

#[tokio::test]
async fn test_first_contact_returns_currency_options() {
    let app = setup_test_app();

    let response = app.oneshot(utterance(42, "hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["choices"], "currencies");
    let options = json["options"].as_array().unwrap();
    assert_eq!(options.len(), 4);
    assert_eq!(options[0]["utterance"], "/currency EUR");
}

#[tokio::test]
async fn test_expense_utterance_is_saved() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(utterance(1, "12,50 food pizza"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["text"]
        .as_str()
        .unwrap()
        .contains("your expense has been saved"));
    assert!(json["choices"].is_null());
    assert_eq!(json["options"].as_array().unwrap().len(), 0);

    let response = app.oneshot(get("/api/users/1/expenses")).await.unwrap();
    let json = get_body_json(response).await;
    let expenses = json.as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["amount"], 12.5);
    assert_eq!(expenses[0]["category"], "food");
}

#[tokio::test]
async fn test_malformed_utterance_is_a_reply_not_an_error() {
    let app = setup_test_app();

    let response = app.oneshot(utterance(1, "250")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(
        json["text"],
        "You must provide at least an amount and a category"
    );
}

#[tokio::test]
async fn test_invalid_utterance_body() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/utterances",
            serde_json::json!({ "text": "no user id" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
}

// ========== User API Tests ==========

#[tokio::test]
async fn test_get_user() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/users/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["first_name"], "Ann");
    assert_eq!(json["currency"], "EUR");
}

#[tokio::test]
async fn test_get_unknown_user() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/users/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_expenses_limit() {
    let app = setup_test_app();
    for text in ["1 tea", "2 tea", "3 tea"] {
        app.clone().oneshot(utterance(1, text)).await.unwrap();
    }

    let response = app
        .oneshot(get("/api/users/1/expenses?limit=2"))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    let expenses = json.as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["amount"], 3.0);
}

#[tokio::test]
async fn test_expenses_for_unknown_user() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/users/404/expenses"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Report API Tests ==========

#[tokio::test]
async fn test_today_report() {
    let app = setup_test_app();
    app.clone()
        .oneshot(utterance(1, "10 food pizza"))
        .await
        .unwrap();
    app.clone()
        .oneshot(utterance(1, "3 transport"))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/users/1/reports/today"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["period"], "today");
    assert_eq!(json["summary"]["total"], 13.0);
    assert_eq!(json["summary"]["largest"]["category"], "food");
    assert!(json["text"]
        .as_str()
        .unwrap()
        .contains("Total: 13.00 €"));
}

#[tokio::test]
async fn test_empty_report_has_null_summary() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/users/1/reports/week"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["summary"].is_null());
    assert!(json["text"].as_str().unwrap().contains("7 days"));
}

#[tokio::test]
async fn test_report_unknown_user() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/users/5/reports/month"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_unknown_period() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/users/1/reports/decade"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("decade"));
}

#[tokio::test]
async fn test_report_window_out_of_range() {
    let config = AppConfig {
        week_days: 1_000_000_000,
        ..AppConfig::default()
    };
    let assistant = Assistant::new(Database::in_memory().unwrap(), config);
    assistant.handle_utterance(&Utterance::new(1, "Ann", "hi"));
    assistant.handle_utterance(&Utterance::new(1, "Ann", "EUR"));
    let app = create_router(assistant, ServerConfig::default());

    let response = app
        .clone()
        .oneshot(get("/api/users/1/reports/week"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.oneshot(get("/api/users/1/reports/today")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Concurrency ==========

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_reads_and_writes() {
    let app = setup_test_app();

    let tasks: Vec<_> = (0..24)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let request = match i % 4 {
                    0 => utterance(1, &format!("{} food", i + 1)),
                    1 => get("/api/users/1"),
                    2 => get("/api/users/1/expenses?limit=50"),
                    _ => get("/api/users/1/reports/today"),
                };
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let response = app
        .oneshot(get("/api/users/1/expenses?limit=50"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 6);
}

// ========== Persistence ==========

#[tokio::test]
async fn test_file_backed_router() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.db");
    let db = Database::new_unencrypted(path.to_str().unwrap()).unwrap();
    let app = create_router(Assistant::new(db, AppConfig::default()), ServerConfig::default());

    app.clone().oneshot(utterance(9, "hi")).await.unwrap();
    app.clone().oneshot(utterance(9, "usd")).await.unwrap();

    let reopened = Database::new_unencrypted(path.to_str().unwrap()).unwrap();
    let user = reopened.get_user(9).unwrap().unwrap();
    assert_eq!(user.currency.as_deref(), Some("USD"));
}
