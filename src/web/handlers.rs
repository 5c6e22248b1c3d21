//! HTTP request handlers

use super::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use tera::Context;

/// Timeout as it may arrive from a form or a hand-written JSON body
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Seconds(u64),
    Text(String),
    Other(IgnoredAny),
}

/// Accept numbers and numeric strings; anything else counts as absent
fn lenient_timeout<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawTimeout::deserialize(deserializer)? {
        RawTimeout::Seconds(secs) => Some(secs),
        RawTimeout::Text(text) => text.trim().parse().ok(),
        RawTimeout::Other(_) => None,
    })
}

/// Form fields posted by the question page
#[derive(Debug, Deserialize)]
pub struct AskForm {
    /// Question text
    #[serde(default)]
    pub query: String,
    /// Timeout in seconds
    #[serde(default, deserialize_with = "lenient_timeout")]
    pub timeout: Option<u64>,
}

/// JSON body for the answer API
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, deserialize_with = "lenient_timeout")]
    pub timeout: Option<u64>,
}

/// JSON reply of the answer API
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    /// answered, rejected or failed
    pub status: &'static str,
    /// Display text, identical to what the page shows
    pub answer: String,
    /// Timeout the engine was given
    pub timeout: u64,
}

/// Base context shared by every render of the question page
fn page_context(state: &AppState, query: &str, timeout: u64) -> Context {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("version", crate::VERSION);
    ctx.insert("ui", &state.settings.ui);
    ctx.insert("query", query);
    ctx.insert("timeout", &timeout);
    ctx
}

fn render_page(state: &AppState, ctx: &Context) -> Response {
    match state.templates.render_with_context("index.html", ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let ctx = page_context(&state, "", state.default_timeout());
    render_page(&state, &ctx)
}

/// Question form handler
pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Response {
    let timeout = form.timeout.unwrap_or_else(|| state.default_timeout());
    let answer = state.gateway.answer(&form.query, timeout).await;

    let mut ctx = page_context(&state, &form.query, timeout);
    ctx.insert("answer", &answer);
    render_page(&state, &ctx)
}

/// JSON answer handler
pub async fn api_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    let timeout = request.timeout.unwrap_or_else(|| state.default_timeout());
    let outcome = state.gateway.evaluate(&request.query, timeout).await;

    Json(AnswerResponse {
        status: outcome.status(),
        answer: outcome.into_message(),
        timeout,
    })
}

/// Example questions handler
pub async fn examples(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.settings.ui.examples.clone())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "engine": state.gateway.engine_name(),
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.gateway.metrics().snapshot())
}

/// Robots.txt handler
pub async fn robots_txt() -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain")],
        "User-agent: *\nDisallow: /\n",
    )
}

/// Favicon handler
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::engine::{CollaborationEngine, EngineError};
    use crate::web::{create_router, AppState};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Echoes the query and timeout, or fails on "boom"
    struct EchoEngine;

    #[async_trait]
    impl CollaborationEngine for EchoEngine {
        fn name(&self) -> &str {
            "echo"
        }

        async fn process_query(&self, query: &str, timeout: u64) -> Result<String, EngineError> {
            if query == "boom" {
                return Err(EngineError::Failed("boom".to_string()));
            }
            Ok(format!("{query} @ {timeout}s"))
        }
    }

    fn app() -> Router {
        let state = AppState::new(Settings::default(), Arc::new(EchoEngine)).unwrap();
        create_router(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Your Historical Question"));
        assert!(html.contains(r#"value="120""#));
    }

    #[tokio::test]
    async fn test_form_submission_renders_answer() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("query=Why+Rome%3F&timeout=90"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains(r#"id="answer""#));
        assert!(html.contains("Why Rome? @ 90s"));
    }

    #[tokio::test]
    async fn test_form_empty_query_shows_warning() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("query=++&timeout=60"))
            .unwrap();

        let html = body_string(app().oneshot(request).await.unwrap()).await;
        assert!(html.contains("⚠️ Please enter a question or task."));
    }

    #[tokio::test]
    async fn test_api_answered() {
        let response = app()
            .oneshot(post_json(
                "/api/answer",
                json!({"query": "What is X?", "timeout": 90}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "answered");
        assert_eq!(body["answer"], "What is X? @ 90s");
        assert_eq!(body["timeout"], 90);
    }

    #[tokio::test]
    async fn test_api_defaults_timeout() {
        let response = app()
            .oneshot(post_json("/api/answer", json!({"query": "Q"})))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["timeout"], 120);
        assert_eq!(body["answer"], "Q @ 120s");
    }

    #[tokio::test]
    async fn test_api_malformed_timeout_falls_back() {
        for (timeout, expected) in [
            (json!("90"), 90),
            (json!(" 45 "), 45),
            (json!(-1), 120),
            (json!(12.5), 120),
            (json!(null), 120),
            (json!("soon"), 120),
        ] {
            let response = app()
                .oneshot(post_json(
                    "/api/answer",
                    json!({"query": "Q", "timeout": timeout}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{timeout}");

            let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(body["timeout"], expected, "{timeout}");
            assert_eq!(body["status"], "answered");
        }
    }

    #[tokio::test]
    async fn test_api_huge_timeout_passes_through() {
        let response = app()
            .oneshot(post_json(
                "/api/answer",
                json!({"query": "Q", "timeout": u64::MAX}),
            ))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["timeout"], u64::MAX);
        assert_eq!(body["answer"], format!("Q @ {}s", u64::MAX));
    }

    #[tokio::test]
    async fn test_form_malformed_timeout_falls_back() {
        for body in ["query=Q&timeout=", "query=Q&timeout=abc", "query=Q"] {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap();

            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{body}");
            let html = body_string(response).await;
            assert!(html.contains("Q @ 120s"), "{body}");
        }
    }

    #[tokio::test]
    async fn test_api_rejected_and_failed() {
        let rejected = app()
            .oneshot(post_json("/api/answer", json!({"query": ""})))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(rejected).await).unwrap();
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["answer"], "⚠️ Please enter a question or task.");

        let failed = app()
            .oneshot(post_json("/api/answer", json!({"query": "boom", "timeout": 30})))
            .await
            .unwrap();
        assert_eq!(failed.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(failed).await).unwrap();
        assert_eq!(body["status"], "failed");
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.starts_with("❌ Error: boom"));
        assert!(answer.contains("Please try again"));
    }

    #[tokio::test]
    async fn test_examples_endpoint() {
        let response = app()
            .oneshot(Request::get("/api/examples").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let examples = body.as_array().unwrap();
        assert_eq!(examples.len(), 4);
        assert_eq!(examples[2]["timeout"], 100);
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["engine"], "echo");

        app.clone()
            .oneshot(post_json("/api/answer", json!({"query": "Q", "timeout": 30})))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["total_queries"], 1);
        assert_eq!(body["answered"], 1);
    }

    #[tokio::test]
    async fn test_robots_and_favicon() {
        let response = app()
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "User-agent: *\nDisallow: /\n");

        let response = app()
            .oneshot(Request::get("/favicon.ico").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
