//! HTTP ingestion endpoint: external channels post leads here.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::{header, HeaderName, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

pub use auth::{ApiKey, API_KEY_HEADER};
pub use error::ApiError;
pub use state::AppState;

pub const WIDGET_ROUTE: &str = "/api/leads/external";
pub const WEB_ROUTE: &str = "/api/leads";

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ]);

    Router::new()
        .route(WIDGET_ROUTE, post(routes::ingest_widget))
        .route(WEB_ROUTE, post(routes::ingest_web))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

/// Serves until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    tracing::info!(addr = ?listener.local_addr().ok(), "lead endpoint listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = err.downcast_ref::<String>() {
        text.as_str()
    } else if let Some(text) = err.downcast_ref::<&str>() {
        text
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %message, "handler panicked");
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error::INTERNAL_MESSAGE })),
    )
        .into_response()
}
