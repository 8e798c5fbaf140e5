//! Router assembly.
//!
//! The HTTP surface is a thin front door over the session service and
//! the fetch/assemble pipeline. Fatal errors surface as failures of the
//! single triggering request; they never poison the session slot unless
//! the reconnect path itself failed.

pub mod records;
pub mod session;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::services::GatewayError;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(session::root))
        .route("/login", get(session::login))
        .route("/logout", get(session::logout))
        .route("/record/{match_id}", get(records::record))
        .route("/live", get(records::live))
        .layer(cors)
        .with_state(state)
}

/// Map gateway errors onto response statuses. Upstream failures —
/// discovery, transport, remote error codes, malformed payloads — are
/// all bad-gateway: this service is a proxy for them.
pub(crate) fn error_to_status(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::Auth { .. } => StatusCode::UNAUTHORIZED,
        GatewayError::NoSession => StatusCode::CONFLICT,
        GatewayError::Http(_)
        | GatewayError::MissingField(_)
        | GatewayError::Resolve(_)
        | GatewayError::Transport(_)
        | GatewayError::Codec(_)
        | GatewayError::Remote { .. }
        | GatewayError::Assemble(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
