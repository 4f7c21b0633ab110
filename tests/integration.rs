use portfolio_ai::{
    ai::GeminiClient,
    client::{
        Page, ProxyClient, Sender, Session, UiEvent, Viewport, CONNECTION_ERROR_FALLBACK,
        NO_RESPONSE_FALLBACK,
    },
    proxy::{self, ProxyState},
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash-preview-05-20";
const UPSTREAM_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";

fn demo_page() -> Page {
    Page::from_file(&Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/page.json")).unwrap()
}

/// Start the real proxy in front of `upstream`; returns the endpoint URL.
async fn spawn_proxy(upstream: &MockServer) -> String {
    spawn_proxy_at(upstream.uri()).await
}

async fn spawn_proxy_at(upstream_url: String) -> String {
    let gemini = GeminiClient::new("integration-key".to_string(), MODEL.to_string())
        .with_base_url(upstream_url);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(proxy::serve(listener, ProxyState::new(Arc::new(gemini))));

    format!("http://{}{}", addr, proxy::GENERATE_PATH)
}

fn session_for(endpoint: String) -> Session {
    Session::new(Arc::new(ProxyClient::new(endpoint)), Arc::new(demo_page()))
}

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_demo_page_loads() {
    let page = demo_page();
    assert_eq!(page.persona.assistant_name, "Abby");
    assert_eq!(page.projects.len(), 2);
    assert_eq!(page.fade_targets.len(), 4);
}

#[tokio::test]
async fn test_description_flow_end_to_end() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .and(header("x-goog-api-key", "integration-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("Alex rebuilt settlement in Rust.")),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let session = session_for(spawn_proxy(&upstream).await);

    let rendered = session.describe_project(0).await.unwrap();
    assert_eq!(rendered.as_deref(), Some("Alex rebuilt settlement in Rust."));

    let modal = session.modal();
    assert!(modal.visible);
    assert!(!modal.loading);

    let requests = upstream.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("The project is titled \"Settlement Pipeline Rewrite\"."));
    assert!(prompt.contains("- Cut reconciliation time from 6 hours to 20 minutes"));
}

#[tokio::test]
async fn test_chat_flow_end_to_end() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Rust and Go.")))
        .mount(&upstream)
        .await;

    let session = session_for(spawn_proxy(&upstream).await);
    assert!(session.toggle_chat());

    let reply = session.submit_chat("Which languages does Alex use?").await;
    assert_eq!(reply.as_deref(), Some("Rust and Go."));

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].sender, Sender::Assistant);

    let requests = upstream.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Alex Morgan Senior Backend Engineer About Eight years"));
    assert!(prompt.contains("User Question: \"Which languages does Alex use?\""));
}

#[tokio::test]
async fn test_upstream_failure_surfaces_as_fallbacks() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .mount(&upstream)
        .await;

    let endpoint = spawn_proxy(&upstream).await;

    let raw = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({ "prompt": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status().as_u16(), 500);
    let body: Value = raw.json().await.unwrap();
    assert_eq!(body, json!({ "error": "An internal server error occurred." }));

    let session = session_for(endpoint);
    assert_eq!(
        session.submit_chat("hi").await.as_deref(),
        Some(CONNECTION_ERROR_FALLBACK)
    );
}

#[tokio::test]
async fn test_unreachable_upstream_surfaces_as_fallbacks() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let endpoint = spawn_proxy_at(format!("http://127.0.0.1:{}", port)).await;

    let raw = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({ "prompt": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status().as_u16(), 500);
    assert_eq!(
        raw.text().await.unwrap(),
        r#"{"error":"An internal server error occurred."}"#
    );

    let session = session_for(endpoint);
    assert_eq!(
        session.describe_project(0).await.unwrap().as_deref(),
        Some(CONNECTION_ERROR_FALLBACK)
    );
}

#[tokio::test]
async fn test_empty_upstream_answer_uses_no_response_fallback() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let session = session_for(spawn_proxy(&upstream).await);
    assert_eq!(
        session.describe_project(1).await.unwrap().as_deref(),
        Some(NO_RESPONSE_FALLBACK)
    );
}

#[tokio::test]
async fn test_preflight_does_not_reach_upstream() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&upstream)
        .await;

    let endpoint = spawn_proxy(&upstream).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, &endpoint)
        .header("Origin", "https://alex.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_event_loop_against_live_proxy() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("ok")))
        .mount(&upstream)
        .await;

    let session = Arc::new(session_for(spawn_proxy(&upstream).await));
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tx.send(UiEvent::Scroll(Viewport::new(0.0, 900.0))).unwrap();
    tx.send(UiEvent::ToggleChat).unwrap();
    tx.send(UiEvent::SubmitChat("Where does Alex work?".to_string()))
        .unwrap();
    tx.send(UiEvent::DescribeProject(1)).unwrap();
    drop(tx);

    Arc::clone(&session).run(rx).await;

    assert!(session.is_faded_in("about"));
    assert!(!session.is_faded_in("skills"));
    assert_eq!(session.transcript()[1].text, "ok");
    assert_eq!(session.modal().description, "ok");
}
