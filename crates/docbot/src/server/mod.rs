//! HTTP server for the DocBot service

pub mod extract;
pub mod routes;
pub mod state;

use axum::{extract::State, routing::get, Json, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::DocbotConfig;
use crate::error::{Error, Result};
use crate::types::{BannerResponse, HealthResponse};
use state::AppState;

/// Banner returned by `GET /`
pub const SERVICE_BANNER: &str = "DocBot Service API is running";

/// DocBot HTTP Server
pub struct DocbotServer {
    config: DocbotConfig,
    state: AppState,
}

impl DocbotServer {
    /// Create a new server with the provider named in `config`
    pub fn new(config: DocbotConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server and run until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting DocBot server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the full router for `state`
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let max_upload = config.limits.max_upload_bytes();
    let enable_cors = config.server.enable_cors;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes(max_upload))
        .with_state(state)
        // Middleware layers (order matters - applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Root banner
async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: SERVICE_BANNER.to_string(),
    })
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.llm_provider();
    Json(HealthResponse {
        status: "healthy".to_string(),
        provider: state.config().llm.provider.to_string(),
        model: provider.model().to_string(),
        credentials_configured: provider.has_credentials(),
        documents: state.registry().len(),
    })
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
    use crate::chat::test_support::{Behavior, ScriptedLlm};
    use crate::config::{ProviderKind, ReferencePolicy};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docbot-test-boundary";

    fn test_state(config: DocbotConfig) -> AppState {
        AppState::new(config).unwrap()
    }

    fn multipart_body(field: &str, filename: Option<&str>, content_type: &str, data: &[u8]) -> Vec<u8> {
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(filename: &str, data: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", Some(filename), "application/pdf", data)))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_banner() {
        let app = build_router(test_state(DocbotConfig::default()));
        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": SERVICE_BANNER}));
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let app = build_router(test_state(DocbotConfig::default()));
        let body = body_json(app.oneshot(get("/health")).await.unwrap()).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "placeholder");
        assert_eq!(body["model"], "placeholder");
        assert_eq!(body["credentials_configured"], true);
        assert_eq!(body["documents"], 0);
    }

    #[tokio::test]
    async fn test_health_reports_missing_credentials() {
        let mut config = DocbotConfig::default();
        config.llm.provider = ProviderKind::OpenAi;
        let app = build_router(test_state(config));
        let body = body_json(app.oneshot(get("/health")).await.unwrap()).await;

        assert_eq!(body["provider"], "openai");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["credentials_configured"], false);
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let state = test_state(DocbotConfig::default());
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(upload_request("report.pdf", b"%PDF-1.4 12345678"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"filename": "report.pdf", "size": 17, "message": "File uploaded successfully"})
        );

        let response = app.oneshot(get("/api/documents")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"documents": [{"name": "report.pdf", "size": 17}]})
        );

        let doc = state.registry().get("report.pdf").unwrap();
        assert_eq!(doc.content_type(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let mut config = DocbotConfig::default();
        config.limits.max_upload_size_mb = 1;
        let state = test_state(config);
        let app = build_router(state.clone());

        let data = vec![b'a'; 1024 * 1024 + 1];
        let response = app.oneshot(upload_request("big.txt", &data)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "payload_too_large");
        assert!(state.registry().is_empty());
    }

    #[tokio::test]
    async fn test_upload_over_document_count_rejected() {
        let mut config = DocbotConfig::default();
        config.limits.max_documents = 1;
        let app = build_router(test_state(config));

        let first = app.clone().oneshot(upload_request("a.pdf", b"a")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(upload_request("b.pdf", b"b")).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        // Same name is an overwrite, not a new document
        let again = app.oneshot(upload_request("a.pdf", b"aa")).await.unwrap();
        assert_eq!(again.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_missing_message_field_is_structured() {
        let state = test_state(DocbotConfig::default());
        let app = build_router(state);

        let response = app
            .oneshot(json_request("POST", "/api/chat", json!({"files": []})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "validation_error");
        assert!(body["detail"].as_str().unwrap().contains("message"));
    }

    #[tokio::test]
    async fn test_query_malformed_json_is_structured() {
        let app = build_router(test_state(DocbotConfig::default()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"query\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_upload_non_multipart_is_structured() {
        let state = test_state(DocbotConfig::default());
        let app = build_router(state.clone());

        let response = app
            .oneshot(json_request("POST", "/api/upload", json!({"file": "report.pdf"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "validation_error");
        assert!(body["detail"].is_string());
        assert!(state.registry().is_empty());
    }

    #[tokio::test]
    async fn test_upload_cut_off_by_body_limit() {
        use axum::{extract::DefaultBodyLimit, routing::post};

        let state = test_state(DocbotConfig::default());
        let app = Router::new()
            .route(
                "/api/upload",
                post(routes::upload::upload_file).layer(DefaultBodyLimit::max(64)),
            )
            .with_state(state.clone());

        let response = app
            .oneshot(upload_request("big.txt", &[b'a'; 4096]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "payload_too_large");
        assert!(!body["detail"].as_str().unwrap().contains("''"));
        assert!(state.registry().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let app = build_router(test_state(DocbotConfig::default()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("note", None, "text/plain", b"hello")))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "No file provided in upload");
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_bad_request() {
        let state = test_state(DocbotConfig::default());
        state.registry().put("a.txt", b"alpha".to_vec(), None).unwrap();
        let app = build_router(state.clone());

        let response = app
            .oneshot(json_request("POST", "/api/chat", json!({"message": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Message cannot be empty");
        let listing = state.registry().list();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "a.txt");
    }

    #[tokio::test]
    async fn test_chat_with_documents() {
        let state = test_state(DocbotConfig::default());
        state.registry().put("a.txt", b"alpha".to_vec(), None).unwrap();
        let app = build_router(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/chat",
                json!({"message": "What does it say?", "files": ["a.txt", "unknown.pdf"]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let text = body["response"].as_str().unwrap();
        assert!(text.starts_with("You asked: 'What does it say?' (Context: 1 document(s) uploaded)"));
    }

    #[tokio::test]
    async fn test_chat_strict_unknown_reference() {
        let mut config = DocbotConfig::default();
        config.limits.reference_policy = ReferencePolicy::Strict;
        let app = build_router(test_state(config));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/chat",
                json!({"message": "hi", "files": ["ghost.txt"]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "unknown_document");
    }

    #[tokio::test]
    async fn test_query_placeholder_reply() {
        let app = build_router(test_state(DocbotConfig::default()));
        let response = app
            .oneshot(json_request("POST", "/api/query", json!({"query": "What is X?"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let text = body["response"].as_str().unwrap();
        assert!(!text.is_empty());
        assert!(text.contains("What is X?"));
    }

    #[tokio::test]
    async fn test_query_blank_is_bad_request() {
        let app = build_router(test_state(DocbotConfig::default()));
        let response = app
            .oneshot(json_request("POST", "/api/query", json!({"query": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Query cannot be empty");
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway() {
        let llm = Arc::new(ScriptedLlm::new(Behavior::Fail("upstream exploded".into())));
        let state = AppState::with_provider(DocbotConfig::default(), llm);
        let app = build_router(state);

        let response = app
            .oneshot(json_request("POST", "/api/query", json!({"query": "anything"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "generation_failed");
        assert!(body["detail"].as_str().unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_info_lists_endpoints() {
        let app = build_router(test_state(DocbotConfig::default()));
        let body = body_json(app.oneshot(get("/api/info")).await.unwrap()).await;
        assert_eq!(body["name"], "docbot");
        assert!(body["endpoints"]["POST /api/upload"].is_string());
    }
}
