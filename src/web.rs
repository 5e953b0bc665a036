//! Web service module

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::error::ResolveError;
use crate::resolver::ShareResult;
use crate::AppState;

const URL_REQUIRED: &str = "URL is required and must be a string";
const METHOD_NOT_ALLOWED: &str = "Method not allowed. Use POST.";

/// Response envelope: `data` on success, `error` (and optionally `details`) on failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// True only on 200
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ShareResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
}

/// Error half of the envelope, rendered with its own status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// 400 with a client-facing message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Raw error text is only attached in diagnostics mode.
    pub fn from_resolve(err: &ResolveError, diagnostics: bool) -> Self {
        Self {
            status: err.status_code(),
            message: err.public_message().to_string(),
            details: diagnostics.then(|| err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            success: false,
            data: None,
            error: Some(self.message),
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION,
    })
}

/// Resolves a share link into direct download links.
pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!("❌ Rejected request body: {}", e);
        ApiError::bad_request(URL_REQUIRED)
    })?;

    let url = body
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(URL_REQUIRED))?;

    let password = body
        .get("password")
        .or_else(|| body.get("pwd"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    info!("📥 Resolve request: {}", url);

    match state.resolver.resolve_url(url, password).await {
        Ok(result) => {
            info!(
                "✅ {} of {} files resolved for {}",
                result.processed_files, result.total_files, result.share_id
            );
            Ok(Json(ApiResponse {
                success: true,
                data: Some(result),
                error: None,
                details: None,
            }))
        }
        Err(e) => {
            if e.is_upstream() {
                error!("❌ Resolve failed: {}", e);
            } else {
                warn!("❌ Resolve rejected: {}", e);
            }
            Err(ApiError::from_resolve(&e, state.config.web.diagnostics))
        }
    }
}

/// JSON 405 for any method other than POST on `/api/terabox`.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

/// Builds the web router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/terabox",
            post(resolve_handler).fallback(method_not_allowed_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
