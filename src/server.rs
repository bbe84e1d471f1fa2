use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, warn};

use crate::context::AppContext;
use crate::error::AppError;
use crate::workflow::intake::{self, TurnRequest};

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/healthz", get(healthz))
        .with_state(ctx)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn chat(State(ctx): State<AppContext>, Json(request): Json<TurnRequest>) -> Response {
    match intake::handle_turn(&ctx, request).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => error_response(err),
    }
}

/// The single catch point: full detail is logged server-side, the client gets
/// a status and a generic message that leaks nothing internal.
fn error_response(err: AppError) -> Response {
    let (status, message) = match &err {
        AppError::EmptyMessage => (StatusCode::BAD_REQUEST, "Message cannot be empty"),
        AppError::LanguageModel(_) => (
            StatusCode::BAD_GATEWAY,
            "An error occurred while contacting the AI.",
        ),
        AppError::IssueTracker(_) => (
            StatusCode::BAD_GATEWAY,
            "An error occurred while filing the ticket.",
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };

    if status.is_client_error() {
        warn!(error = %err, "rejected chat request");
    } else {
        error!(error = %err, "chat turn failed");
    }

    (status, Json(json!({ "error": message }))).into_response()
}
