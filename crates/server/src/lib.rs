//! HTTP server for Supportbot.
//!
//! Exposes the chat endpoint over Axum:
//! - `POST /api/chat` with `{"question": "..."}` → `{"answer": "..."}`
//! - `GET /api/health`
//!
//! The shared state is immutable after startup, so handlers run
//! concurrently without locking.

pub mod error;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use supportbot_core::{AppConfig, AppError, AppResult};
use supportbot_knowledge::Assistant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Largest accepted request body, in bytes.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant }
    }
}

/// Build the CORS layer for `allowed_origins`.
///
/// An empty list allows any origin. Otherwise only the listed origins are
/// allowed, and an origin that is not a valid header value is a
/// configuration error.
pub fn cors_layer(allowed_origins: &[String]) -> AppResult<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::Config(format!("Invalid allowed origin: {}", origin)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/chat", post(routes::chat))
        .route("/api/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until Ctrl-C.
pub async fn serve(config: &AppConfig, assistant: Assistant) -> AppResult<()> {
    let cors = cors_layer(&config.allowed_origins)?;
    let app = build_router(Arc::new(AppState::new(assistant)), cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    if config.allowed_origins.is_empty() {
        tracing::warn!("No allowed origins configured, accepting requests from any origin");
    }
    tracing::info!("Server is running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use supportbot_knowledge::{KeywordRanker, KnowledgeBase, KnowledgeEntry};
    use supportbot_llm::{LlmClient, MockClient};
    use supportbot_prompt::default_prompt;
    use tower::ServiceExt;

    fn assistant(client: Arc<dyn LlmClient>) -> Assistant {
        let knowledge = KnowledgeBase::new(vec![KnowledgeEntry::new(
            "What is your return policy?",
            "30 days.",
            ["return", "policy", "refund"],
        )])
        .unwrap();

        Assistant::new(
            Arc::new(knowledge),
            Arc::new(KeywordRanker::default()),
            client,
            default_prompt(),
            "test-model",
        )
    }

    fn app(client: Arc<dyn LlmClient>, origins: &[String]) -> Router {
        let state = Arc::new(AppState::new(assistant(client)));
        build_router(state, cors_layer(origins).unwrap())
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_answer() {
        let client = Arc::new(MockClient::replying("You can return items within 30 days."));
        let response = app(client, &[])
            .oneshot(chat_request(r#"{"question": "What is your return policy"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["answer"], "You can return items within 30 days.");
    }

    #[tokio::test]
    async fn test_missing_question_is_bad_request() {
        let client = Arc::new(MockClient::default());

        for body in [r#"{}"#, r#"{"question": ""}"#, r#"{"question": "   "}"#, r#"{"question": 42}"#, "not json"] {
            let response = app(client.clone(), &[])
                .oneshot(chat_request(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            let json = body_json(response).await;
            assert_eq!(json["error"], error::QUESTION_REQUIRED);
        }

        // Rejected before ranking or calling the model
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_before_ranking() {
        let client = Arc::new(MockClient::default());
        let question = "where is my package ".repeat(MAX_BODY_BYTES / 10);
        let body = serde_json::json!({ "question": question }).to_string();
        assert!(body.len() > MAX_BODY_BYTES);

        let response = app(client.clone(), &[])
            .oneshot(chat_request(&body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"], error::QUESTION_TOO_LONG);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_body_under_limit_is_answered() {
        let client = Arc::new(MockClient::replying("ok"));
        let question = "return policy ".repeat(MAX_BODY_BYTES / 28);
        let body = serde_json::json!({ "question": question }).to_string();
        assert!(body.len() < MAX_BODY_BYTES);

        let response = app(client.clone(), &[])
            .oneshot(chat_request(&body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_details() {
        let client = Arc::new(MockClient::failing(
            "401 Unauthorized: API key sk-secret-123 rejected at gemini.rs:42",
        ));
        let response = app(client, &[])
            .oneshot(chat_request(r#"{"question": "return policy"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(text.contains(error::SERVICE_UNAVAILABLE));
        assert!(!text.contains("sk-secret-123"));
        assert!(!text.contains("gemini.rs"));
        assert!(!text.contains("401"));
    }

    #[tokio::test]
    async fn test_health_reports_strategy() {
        let response = app(Arc::new(MockClient::default()), &[])
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["strategy"], "keyword");
        assert_eq!(json["entries"], 1);
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let origins = vec!["https://shop.example".to_string()];

        let allowed = app(Arc::new(MockClient::default()), &origins)
            .oneshot(preflight("https://shop.example"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://shop.example"
        );

        let denied = app(Arc::new(MockClient::default()), &origins)
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_any_origin_when_list_empty() {
        let response = app(Arc::new(MockClient::default()), &[])
            .oneshot(preflight("https://anywhere.example"))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[test]
    fn test_invalid_origin_is_config_error() {
        let origins = vec!["bad\norigin".to_string()];
        assert!(matches!(cors_layer(&origins), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_concurrent_requests_do_not_serialize() {
        let client = Arc::new(
            MockClient::replying("ok").with_delay(std::time::Duration::from_millis(200)),
        );
        let router = app(client.clone(), &[]);

        let started = std::time::Instant::now();
        let handles: Vec<_> = (0..5)
            .map(|_| {
                let router = router.clone();
                tokio::spawn(async move {
                    router
                        .oneshot(chat_request(r#"{"question": "return policy"}"#))
                        .await
                        .unwrap()
                        .status()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        assert_eq!(client.calls(), 5);
        assert!(started.elapsed() < std::time::Duration::from_millis(900));
    }
}
