//! Moneylytics Web Server
//!
//! Axum-based JSON transport for the Moneylytics assistant. A chat gateway
//! posts each inbound message to `/api/utterances` and renders the reply;
//! the read-only routes expose profiles, recent expenses and reports.
//!
//! - Restrictive CORS policy
//! - Request tracing
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use moneylytics_core::Assistant;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Default number of expenses returned by the expenses route
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Origins allowed by CORS; empty means same-origin only
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub assistant: Assistant,
}

/// Create the application router
pub fn create_router(assistant: Assistant, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { assistant });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/utterances", post(handlers::post_utterance))
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id/expenses", get(handlers::list_expenses))
        .route("/users/:id/reports/:period", get(handlers::get_report));

    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(
    assistant: Assistant,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(assistant, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, turning domain outcomes into client errors
    pub fn from_core(err: moneylytics_core::Error) -> Self {
        match err {
            moneylytics_core::Error::UserNotFound(id) => {
                Self::not_found(&format!("User {} not found", id))
            }
            e if e.is_user_error() => Self::bad_request(&e.user_message()),
            e => Self::from(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Clients only see a generic message
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
