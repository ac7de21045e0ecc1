use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::intent::{
    error::{IntentError, IntentErrorKind, validation_error},
    pipeline::IntentPipeline,
    types::{IntentRequest, IntentResult},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: IntentResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub reason: IntentErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

pub fn router(pipeline: IntentPipeline) -> Router {
    Router::new()
        .route("/parse-intent", post(parse_intent))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn parse_intent(
    State(pipeline): State<IntentPipeline>,
    body: Result<Json<IntentRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(
                target: "transport.http",
                rejection = %rejection.body_text(),
                "parse_intent_body_rejected"
            );
            return error_response(&validation_error(format!(
                "invalid request body: {}",
                rejection.body_text()
            )));
        }
    };

    match pipeline.parse_intent(request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(SuccessEnvelope {
                success: true,
                data: result,
            }),
        )
            .into_response(),
        Err(err) => {
            if err.kind.is_client_fault() {
                tracing::debug!(
                    target: "transport.http",
                    reason = err.kind.as_str(),
                    error = %err,
                    "parse_intent_rejected"
                );
            } else {
                tracing::warn!(
                    target: "transport.http",
                    reason = err.kind.as_str(),
                    error = %err,
                    "parse_intent_failed"
                );
            }
            error_response(&err)
        }
    }
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

pub fn status_code_for(kind: IntentErrorKind) -> StatusCode {
    match kind {
        IntentErrorKind::Validation => StatusCode::BAD_REQUEST,
        IntentErrorKind::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
        IntentErrorKind::Gateway
        | IntentErrorKind::Parse
        | IntentErrorKind::Schema
        | IntentErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_code(kind: IntentErrorKind) -> &'static str {
    match kind {
        IntentErrorKind::Validation => "INVALID_ARGUMENT",
        IntentErrorKind::Overloaded => "UNAVAILABLE",
        IntentErrorKind::Gateway
        | IntentErrorKind::Parse
        | IntentErrorKind::Schema
        | IntentErrorKind::Internal => "INTERNAL",
    }
}

fn error_response(err: &IntentError) -> Response {
    (
        status_code_for(err.kind),
        Json(ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: error_code(err.kind).to_string(),
                reason: err.kind,
                message: err.message.clone(),
            },
        }),
    )
        .into_response()
}

pub async fn serve(
    pipeline: IntentPipeline,
    listen: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("unable to bind http listener {}", listen))?;
    tracing::info!(
        target: "transport.http",
        listen = %listener.local_addr().unwrap_or(listen),
        "http_listening"
    );

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("http server failed")?;

    tracing::info!(target: "transport.http", "http_stopped");
    Ok(())
}
