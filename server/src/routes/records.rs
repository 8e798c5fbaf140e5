//! Record routes: assembled match documents and live-match listings.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use records::assemble::FetchTrace;
use records::{MatchDocument, assemble};

use crate::routes::error_to_status;
use crate::services::record::{self, LIVE_MODES, LiveMatch};
use crate::state::AppState;

/// `GET /record/{match_id}` — fetch, decode, and assemble one match.
pub async fn record(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchDocument>, StatusCode> {
    let session = state.sessions.ensure_active().await.map_err(|error| {
        tracing::warn!(%error, %match_id, "session unavailable for record fetch");
        error_to_status(&error)
    })?;

    let raw = record::fetch_record(&state.http, &session, &match_id)
        .await
        .map_err(|error| {
            tracing::warn!(%error, %match_id, "record fetch failed");
            error_to_status(&error)
        })?;

    let trace =
        FetchTrace { client_version: session.client_version.clone(), payload: raw.source.clone() };
    let document = assemble(raw.head, &raw.payload, trace).map_err(|error| {
        tracing::warn!(%error, %match_id, "record assembly failed");
        error_to_status(&error.into())
    })?;

    Ok(Json(document))
}

/// `GET /live` — live-match summaries for each of the fixed mode set,
/// keyed by mode identifier.
pub async fn live(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<u32, Vec<LiveMatch>>>, StatusCode> {
    let session = state.sessions.ensure_active().await.map_err(|error| {
        tracing::warn!(%error, "session unavailable for live listing");
        error_to_status(&error)
    })?;

    let mut by_mode = BTreeMap::new();
    for mode in LIVE_MODES {
        let matches = record::fetch_live(&session, mode).await.map_err(|error| {
            tracing::warn!(%error, mode, "live listing failed");
            error_to_status(&error)
        })?;
        by_mode.insert(mode, matches);
    }
    Ok(Json(by_mode))
}
