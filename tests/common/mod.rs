//! Shared fixtures: a fake upstream (model providers plus article pages)
//! served by axum on an ephemeral port, and an in-memory renderer.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use content_pdf::pipeline::assemble::PageLayout;
use content_pdf::{DocumentRenderer, EnhanceError, EnhancerConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const OPENAI_KEY: &str = "sk-test-openai";
pub const ANTHROPIC_KEY: &str = "sk-test-anthropic";
pub const GEMINI_KEY: &str = "g-test-gemini";

pub const OPENAI_REPLY: &str =
    "```markdown\n# Summary\r\n\r\nRust is **fast**.   \n\n\n\n## Key Points\n- safety\n- speed\n```";
pub const ANTHROPIC_REPLY: &str =
    "# Validation Report\n## Fact-checking\nClaims hold.\n## Credibility\nHigh.";
pub const GEMINI_REPLY: &str = "# Expanded\n\nMore context here.";

pub const ARTICLE_TEXT: &str = "Ownership is the feature that makes Rust different. Every value \
    has a single owner, and when the owner goes out of scope the value is dropped. Borrowing \
    lets code use a value without taking ownership of it.";

/// One request the fake upstream received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, path: String, headers: HeaderMap, body: Value) {
        self.0.lock().unwrap().push(Recorded {
            path,
            headers,
            body,
        });
    }
}

pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub recorder: Recorder,
}

impl FakeUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Config with all three providers pointed at this server.
    pub fn config(&self) -> EnhancerConfig {
        self.config_builder().build().unwrap()
    }

    pub fn config_builder(&self) -> content_pdf::EnhancerConfigBuilder {
        EnhancerConfig::builder()
            .openai_api_key(OPENAI_KEY)
            .anthropic_api_key(ANTHROPIC_KEY)
            .gemini_api_key(GEMINI_KEY)
            .openai_base_url(self.url("/openai"))
            .anthropic_base_url(self.url("/anthropic"))
            .gemini_base_url(self.url("/gemini"))
            .fetch_timeout_secs(5)
            .api_timeout_secs(5)
    }
}

async fn openai(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push("/openai/chat/completions".into(), headers, body);
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": OPENAI_REPLY}}]
    }))
}

async fn openai_empty(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push("/empty/chat/completions".into(), headers, body);
    Json(json!({"choices": [{"message": {"role": "assistant", "content": null}}]}))
}

async fn openai_failing(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.push("/failing/chat/completions".into(), headers, body);
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"error": {"message": "Rate limit reached", "type": "rate_limit"}})),
    )
}

async fn anthropic(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push("/anthropic/messages".into(), headers, body);
    Json(json!({
        "id": "msg_1",
        "type": "message",
        "content": [{"type": "text", "text": ANTHROPIC_REPLY}]
    }))
}

async fn gemini(
    State(rec): State<Recorder>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.push(format!("/gemini/models/{call}"), headers, body);
    Json(json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": GEMINI_REPLY}]}}]
    }))
}

async fn article() -> axum::response::Html<String> {
    axum::response::Html(format!(
        r#"<html><head>
        <title>Understanding Ownership</title>
        <meta name="author" content="Ferris Crab">
        <meta name="description" content="A tour of ownership">
        <meta property="article:published_time" content="2024-05-01T10:00:00Z">
        </head><body>
        <nav>Home | Blog | About</nav>
        <article><h1>Understanding Ownership</h1><p>{ARTICLE_TEXT}</p></article>
        <script>track()</script>
        </body></html>"#
    ))
}

async fn thin() -> axum::response::Html<&'static str> {
    axum::response::Html("<html><body><p>Cookie banner.</p></body></html>")
}

/// Start the fake upstream on 127.0.0.1 with an ephemeral port.
pub async fn spawn_upstream() -> FakeUpstream {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/openai/chat/completions", post(openai))
        .route("/empty/chat/completions", post(openai_empty))
        .route("/failing/chat/completions", post(openai_failing))
        .route("/anthropic/messages", post(anthropic))
        .route("/gemini/models/:call", post(gemini))
        .route("/article", get(article))
        .route("/thin", get(thin))
        .with_state(recorder.clone());

    let addr = spawn(app).await;
    FakeUpstream { addr, recorder }
}

pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n% fake\n%%EOF\n";

/// Renderer that records its input and returns [`FAKE_PDF`].
#[derive(Default)]
pub struct FakeRenderer {
    pub calls: Mutex<Vec<(String, PageLayout)>>,
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render(&self, html: &str, layout: &PageLayout) -> Result<Vec<u8>, EnhanceError> {
        self.calls
            .lock()
            .unwrap()
            .push((html.to_string(), layout.clone()));
        Ok(FAKE_PDF.to_vec())
    }
}

pub struct FailingRenderer;

#[async_trait]
impl DocumentRenderer for FailingRenderer {
    async fn render(&self, _html: &str, _layout: &PageLayout) -> Result<Vec<u8>, EnhanceError> {
        Err(EnhanceError::RenderFailed("browser crashed".into()))
    }
}
