//! Session routes: liveness placeholder, login, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{Value, json};

use crate::routes::error_to_status;
use crate::state::AppState;

/// `GET /` — liveness placeholder.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "ok" }))
}

/// `GET /login` — ensure an authenticated session exists.
pub async fn login(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let session = state.sessions.ensure_active().await.map_err(|error| {
        tracing::warn!(%error, "login route failed");
        error_to_status(&error)
    })?;
    Ok(Json(json!({ "message": "Success", "session_id": session.id })))
}

/// `GET /logout` — send a logout on the current session; the body is
/// the remote error field rendering, possibly empty.
pub async fn logout(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.sessions.logout().await.map_err(|error| {
        tracing::warn!(%error, "logout route failed");
        error_to_status(&error)
    })
}
