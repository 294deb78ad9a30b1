use std::io::{Cursor, Read};
use std::path::Path;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agentdesk::api::{create_router, AppState};
use agentdesk::artifacts::ArtifactStore;
use agentdesk::config::{Config, LlmConfig, PresentationConfig};
use agentdesk::render::PPTX_MIME;

const DECK: &str = "**SLIDE 1: Rust in Production**\n\
    * Memory safety without GC\n\
    * Zero-cost abstractions\n\n\
    **SLIDE 2: Ownership & Borrowing**\n\
    * One owner per value\n\
    * Borrow checker enforces rules\n\
    * No data races\n";

fn test_config(dir: &Path, base_url: Option<String>) -> Config {
    let mut config = Config::default();
    config.output.dir = dir.to_path_buf();
    config.server.max_body_bytes = 1024 * 1024;
    config.presentation = PresentationConfig::default();
    config.llm = match base_url {
        Some(base_url) => LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            timeout_secs: 5,
            health_timeout_secs: 2,
            ..LlmConfig::default()
        },
        None => LlmConfig::default(),
    };
    config
}

fn app(dir: &Path, base_url: Option<String>) -> Router {
    create_router(AppState::from_config(test_config(dir, base_url)))
}

fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "llama-3.1-8b-instant",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
    })
}

async fn mock_llm(content: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;
    server
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn zip_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid pptx");
    let mut part = archive.by_name(name).expect("part exists");
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
}

#[tokio::test]
async fn health_is_degraded_without_key() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["llm_configured"], false);
    assert_eq!(json["data"]["llm_available"], false);
    assert_eq!(json["data"]["model"], "llama-3.1-8b-instant");
    assert!(json["data"]["timestamp"].is_string());
    assert!(json["data"].get("base_url").is_none());
}

#[tokio::test]
async fn health_is_healthy_when_llm_answers() {
    let server = mock_llm("Hi").await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let json = body_json(get(&app, "/health").await).await;
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["llm_available"], true);
    assert_eq!(json["data"]["provider"], "openai-compatible");
    assert_eq!(json["data"]["base_url"], format!("{}/v1", server.uri()));
}

#[tokio::test]
async fn help_lists_every_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let json = body_json(get(&app, "/help").await).await;
    let paths: Vec<&str> = json["data"]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    for expected in ["/chat", "/presentation", "/content", "/prediction", "/health"] {
        assert!(paths.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn generation_without_key_is_upstream_error() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(&app, "/presentation", json!({"topic": "Rust", "slides": 3})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "upstream_error");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("GROQ_API_KEY"));

    let response = post_json(&app, "/content", json!({"topic": "Rust"})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = post_json(&app, "/chat", json!({"message": "tell me a joke"})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn upstream_failure_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {
                "message": "over capacity",
                "type": "server_error",
                "param": null,
                "code": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let body = json!({"topic": "tides", "type": "report"});
    let response = post_json(&app, "/content", body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"]["code"], "upstream_error");
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn missing_field_is_invalid_request() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(&app, "/presentation", json!({"slides": 3})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_request");
    assert!(json["error"]["message"].as_str().unwrap().contains("topic"));

    let response = post_json(&app, "/chat", json!({"message": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prediction_defaults_to_demo_dataset() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(&app, "/prediction", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert!((data["slope"].as_f64().unwrap() - 2.01).abs() < 1e-9);
    assert!((data["intercept"].as_f64().unwrap() + 0.01).abs() < 1e-9);
    assert!(data["r_squared"].as_f64().unwrap() > 0.98);
    assert_eq!(data["samples"], 5);
    assert_eq!(data["predictions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn prediction_uses_named_columns() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(
        &app,
        "/prediction",
        json!({
            "data": [
                {"hours": 1, "score": 52},
                {"hours": 2, "score": 61},
                {"hours": 4, "score": 79}
            ],
            "target": "score"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["feature"], "hours");
    assert_eq!(data["target"], "score");
    let slope = data["slope"].as_f64().unwrap();
    let intercept = data["intercept"].as_f64().unwrap();
    for (x, predicted) in [1.0, 2.0, 4.0].iter().zip(data["predictions"].as_array().unwrap()) {
        assert!((predicted.as_f64().unwrap() - (slope * x + intercept)).abs() < 1e-9);
    }
}

#[tokio::test]
async fn degenerate_prediction_is_computation_error() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(&app, "/prediction", json!({"data": [{"x": 1, "y": 2}]})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "computation_error"
    );

    let response = post_json(
        &app,
        "/prediction",
        json!({"data": [{"x": 3, "y": 1}, {"x": 3, "y": 9}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_target_lists_available_columns() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(
        &app,
        "/prediction",
        json!({"data": [{"a": 1, "b": 2}, {"a": 2, "b": 4}], "target": "price"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["error"]["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("price"));
    assert!(message.contains("a, b"));
}

#[tokio::test]
async fn download_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = get(&app, "/download/nothing_here.pptx").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "not_found");

    let response = get(&app, "/download/..%2Fsecret.txt").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_returns_identical_bytes() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    let bytes = "Report: Tides\nline two\n".as_bytes().to_vec();
    store.write("report_Tides_abc.txt", &bytes).await.unwrap();

    let app = app(dir.path(), None);
    let response = get(&app, "/download/report_Tides_abc.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"report_Tides_abc.txt\""
    );
    assert_eq!(body_bytes(response).await, bytes);
}

#[tokio::test]
async fn presentation_is_rendered_and_downloadable() {
    let server = mock_llm(DECK).await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let response = post_json(&app, "/presentation", json!({"topic": "Rust", "slides": 3})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["slides_count"], 3);
    assert_eq!(data["slides_requested"], 3);
    assert_eq!(data["titles"][0], "Rust in Production");
    assert_eq!(data["titles"][1], "Ownership & Borrowing");
    let filename = data["filename"].as_str().unwrap();
    assert!(filename.starts_with("AI_Rust_"));
    assert!(filename.ends_with(".pptx"));
    assert_eq!(data["download_url"], format!("/download/{filename}"));

    let response = get(&app, data["download_url"].as_str().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], PPTX_MIME);
    let pptx = body_bytes(response).await;

    assert!(zip_part(&pptx, "ppt/slides/slide1.xml").contains("Rust in Production"));
    assert!(zip_part(&pptx, "ppt/slides/slide2.xml").contains("Ownership &amp; Borrowing"));
    assert!(zip_part(&pptx, "ppt/slides/slide3.xml").contains("Rust Slide 3"));
    assert!(zip_part(&pptx, "ppt/presentation.xml").contains(r#"r:id="rId5""#));
}

#[tokio::test]
async fn slide_count_is_clamped() {
    let server = mock_llm(DECK).await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let body = json!({"topic": "Rust", "slides": -4});
    let data = body_json(post_json(&app, "/presentation", body).await)
        .await["data"]
        .clone();
    assert_eq!(data["slides_requested"], 1);
    assert_eq!(data["slides_count"], 1);

    let body = json!({"topic": "Rust", "slides": 99});
    let data = body_json(post_json(&app, "/presentation", body).await)
        .await["data"]
        .clone();
    assert_eq!(data["slides_requested"], 20);
    assert_eq!(data["slides_count"], 20);

    let data = body_json(post_json(&app, "/presentation", json!({"topic": "Rust"})).await)
        .await["data"]
        .clone();
    assert_eq!(data["slides_requested"], 4);
}

#[tokio::test]
async fn unparseable_outline_is_upstream_error() {
    let server = mock_llm("I'm sorry, I can't help with that.").await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let response = post_json(&app, "/presentation", json!({"topic": "Rust"})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn chat_routes_to_content_writer() {
    let text = "Tides are driven by the moon.\nThey rise twice a day.";
    let server = mock_llm(text).await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let response = post_json(
        &app,
        "/chat",
        json!({"message": "Write a short summary about ocean tides"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["action"], "content");
    let result = &data["result"];
    assert_eq!(result["topic"], "ocean tides");
    assert_eq!(result["content_type"], "summary");
    assert_eq!(result["length"], "short");
    assert_eq!(result["text"], text);
    assert_eq!(result["preview"], text);
    assert_eq!(result["word_count_estimate"], 11);

    let filename = result["filename"].as_str().unwrap();
    assert!(filename.starts_with("summary_ocean_tides_"));
    let saved = std::fs::read_to_string(dir.path().join(filename)).unwrap();
    assert!(saved.starts_with("Summary: ocean tides\n"));
    assert!(saved.contains("Length: short"));
    assert!(saved.contains(text));
}

#[tokio::test]
async fn chat_routes_to_presentation() {
    let server = mock_llm(DECK).await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let response = post_json(
        &app,
        "/chat",
        json!({"message": "Create a 2-slide presentation about Rust"}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["action"], "presentation");
    assert_eq!(data["result"]["topic"], "Rust");
    assert_eq!(data["result"]["slides_count"], 2);
}

#[tokio::test]
async fn chat_prediction_needs_no_llm() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), None);

    let response = post_json(
        &app,
        "/chat",
        json!({"message": "predict the trend for (1, 3) (2, 5) (3, 7)"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["action"], "prediction");
    assert!((data["result"]["slope"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    assert!((data["result"]["intercept"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn chat_falls_back_to_generic_answer() {
    let server = mock_llm("Paris.").await;
    let dir = TempDir::new().unwrap();
    let app = app(dir.path(), Some(format!("{}/v1", server.uri())));

    let response = post_json(
        &app,
        "/chat",
        json!({"message": "What is the capital of France?"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["action"], "generic");
    assert_eq!(data["result"]["response"], "Paris.");
    assert!(dir_is_empty(dir.path()));
}
