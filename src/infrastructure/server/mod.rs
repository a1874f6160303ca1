//! Webhook HTTP server
//!
//! `GET /` answers a liveness string. `POST /callback` receives LINE webhooks.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::application::errors::BotError;
use crate::application::services::ReplyService;
use crate::infrastructure::adapters::line::{parse_events, verify_signature, SIGNATURE_HEADER};

/// Body of `GET /`
pub const LIVENESS_TEXT: &str = "PSU Pattani Reg Bot ทำงานอยู่แล้ว!";

/// LINE caps webhook bodies well below this
const MAX_BODY_BYTES: usize = 1_048_576;

/// Shared per-process state
#[derive(Clone)]
pub struct AppState {
    channel_secret: Arc<str>,
    service: Arc<ReplyService>,
}

impl AppState {
    pub fn new(channel_secret: impl Into<String>, service: ReplyService) -> Self {
        Self {
            channel_secret: Arc::from(channel_secret.into()),
            service: Arc::new(service),
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let status = match &self {
            BotError::Parse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/callback", post(callback))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn index() -> &'static str {
    LIVENESS_TEXT
}

async fn callback(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("callback", %request_id);
    handle_callback(state, headers, body).instrument(span).await
}

async fn handle_callback(state: AppState, headers: HeaderMap, body: Bytes) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Missing {} header, rejecting webhook", SIGNATURE_HEADER);
        return (StatusCode::BAD_REQUEST, "missing signature").into_response();
    };

    if !verify_signature(&state.channel_secret, &body, signature) {
        tracing::warn!("Invalid signature, rejecting webhook");
        return (StatusCode::BAD_REQUEST, "invalid signature").into_response();
    }

    let messages = match parse_events(&body) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("{}", e);
            return e.into_response();
        }
    };

    // Stops at the first failure; replies already sent for earlier events stand
    for message in messages {
        tracing::info!(
            "Received from {}: {}",
            message.source.as_str(),
            crate::application::services::reply_service::preview(&message.text)
        );
        if let Err(e) = state.service.handle(message).await {
            tracing::error!("Failed to handle message: {}", e);
            return e.into_response();
        }
    }

    (StatusCode::OK, "OK").into_response()
}

/// Serve on an already-bound listener until ctrl-c or SIGTERM
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), BotError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BotError::Internal(format!("server error: {}", e)))
}

/// Bind `addr` and serve
pub async fn serve(addr: &str, state: AppState) -> Result<(), BotError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| BotError::Internal(format!("failed to bind {}: {}", addr, e)))?;
    run(listener, state).await
}

/// Wait for ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("ctrl-c handler failed: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
