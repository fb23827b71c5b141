//! End-to-end tests of the HTTP query client and a chat session against a
//! stub query endpoint served by axum on a random loopback port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use kete_chat::{ChatSession, HttpQueryClient, QueryClient, QueryError, ResultGrid, SubmitOutcome};
use kete_core::config::{EndpointConfig, SessionConfig};
use kete_core::types::Sender;

// =============================================================================
// Helpers
// =============================================================================

type Seen = Arc<Mutex<Vec<String>>>;

/// Stub endpoint: the reply depends on the received message.
async fn chat(State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>) -> Response {
    let message = params.get("message").cloned().unwrap_or_default();
    seen.lock().unwrap().push(message.clone());

    match message.as_str() {
        "find waka" => Json(json!({
            "responseText": "Here are some waka",
            "results": [
                {"id": 1, "title": "Waka", "representations": [{"previewUrl": "a.jpg", "contentUrl": "a"}]},
                {"id": 2, "title": "Waka model", "representations": []}
            ]
        }))
        .into_response(),
        "buy a print" => Json(json!({
            "responseText": "Confirmed",
            "order": "Order #123"
        }))
        .into_response(),
        "legacy" => Json(json!({
            "response": "Old backend",
            "results": [{"id": 9, "hasRepresentation": [{"previewUrl": "p.jpg", "title": "a;Waka;1900"}]}]
        }))
        .into_response(),
        "explode" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => (StatusCode::OK, "this is not json").into_response(),
        "wrong shape" => Json(json!({"results": []})).into_response(),
        _ => Json(json!({ "responseText": format!("echo: {}", message) })).into_response(),
    }
}

/// Start the stub and return its chat URL plus the list of received messages.
async fn spawn_stub() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/chat", get(chat))
        .with_state(Arc::clone(&seen));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api/chat", addr), seen)
}

fn client_for(url: &str) -> HttpQueryClient {
    HttpQueryClient::new(&EndpointConfig {
        url: url.to_string(),
        query_param: "message".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

// =============================================================================
// HttpQueryClient
// =============================================================================

#[tokio::test]
async fn test_special_characters_reach_endpoint_intact() {
    let (url, seen) = spawn_stub().await;
    let client = client_for(&url);

    let text = "waka & kōrero? #1 100% a+b=c";
    let resp = client.query(text).await.unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), &[text.to_string()]);
    assert_eq!(resp.response_text, format!("echo: {}", text));
}

#[tokio::test]
async fn test_search_payload_parsed() {
    let (url, _) = spawn_stub().await;
    let resp = client_for(&url).query("find waka").await.unwrap();

    assert_eq!(resp.response_text, "Here are some waka");
    assert!(resp.order.is_none());
    let results = resp.results.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.as_slice()[0].representations[0].preview_url, "a.jpg");
}

#[tokio::test]
async fn test_legacy_payload_keys_accepted() {
    let (url, _) = spawn_stub().await;
    let resp = client_for(&url).query("legacy").await.unwrap();
    assert_eq!(resp.response_text, "Old backend");

    let mut grid = ResultGrid::new();
    grid.replace(resp.results.unwrap());
    let tiles = grid.tiles();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].id, 9);
    assert_eq!(tiles[0].title, "Waka / 1900");
    assert_eq!(tiles[0].link_url, "https://collections.tepapa.govt.nz/object/9");
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let (url, _) = spawn_stub().await;
    let err = client_for(&url).query("explode").await.unwrap_err();
    assert_eq!(
        err,
        QueryError::Status {
            status: 500,
            body: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_unknown_route_is_status_error() {
    let (url, _) = spawn_stub().await;
    let wrong = url.replace("/api/chat", "/api/missing");
    let err = client_for(&wrong).query("hello").await.unwrap_err();
    assert!(matches!(err, QueryError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let (url, _) = spawn_stub().await;
    let err = client_for(&url).query("garbled").await.unwrap_err();
    assert!(matches!(err, QueryError::Decode(_)));
}

#[tokio::test]
async fn test_missing_response_text_is_decode_error() {
    let (url, _) = spawn_stub().await;
    let err = client_for(&url).query("wrong shape").await.unwrap_err();
    assert!(matches!(err, QueryError::Decode(_)));
}

// =============================================================================
// ChatSession over HTTP
// =============================================================================

#[tokio::test]
async fn test_session_round_trips_over_http() {
    let (url, seen) = spawn_stub().await;
    let mut session = ChatSession::new(Arc::new(client_for(&url)), SessionConfig::default());
    let mut events = session.subscribe();
    let mut grid = ResultGrid::new();

    // Search.
    let outcome = session.submit("find waka").await.unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Answered {
            order_opened: false,
            results_changed: true
        }
    );
    while let Ok(event) = events.try_recv() {
        grid.apply(&event);
    }
    assert_eq!(grid.results().len(), 2);
    assert_eq!(grid.tiles().len(), 1);
    assert_eq!(grid.tiles()[0].link_url, "a");

    // Order: modal opens, results untouched.
    session.submit("buy a print").await.unwrap();
    while let Ok(event) = events.try_recv() {
        grid.apply(&event);
    }
    assert_eq!(session.modal().content().unwrap().as_str(), "Order #123");
    assert_eq!(grid.results().len(), 2);

    // Failure: notice appended, modal and results untouched.
    let outcome = session.submit("explode").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    while let Ok(event) = events.try_recv() {
        grid.apply(&event);
    }
    assert!(session.modal().is_open());
    assert_eq!(grid.results().len(), 2);
    assert_eq!(session.transcript().last().unwrap().sender(), Sender::Bot);

    // Still usable.
    session.submit("hello").await.unwrap();
    assert_eq!(session.transcript().last().unwrap().text(), "echo: hello");
    assert_eq!(session.transcript().len(), 8);

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[
            "find waka".to_string(),
            "buy a print".to_string(),
            "explode".to_string(),
            "hello".to_string()
        ]
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_keeps_session_usable() {
    let mut session = ChatSession::new(
        Arc::new(client_for("http://127.0.0.1:1/api/chat")),
        SessionConfig::default(),
    );
    let outcome = session.submit("find waka").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Failed(QueryError::Transport(_))));
    assert_eq!(session.transcript().len(), 2);
    assert!(!session.is_in_flight());

    let outcome = session.submit("find waka").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(session.transcript().len(), 4);
}
