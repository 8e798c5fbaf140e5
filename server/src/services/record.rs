//! Match record and live list fetch.
//!
//! Every call re-fetches; there is no cache. Payload-source precedence
//! is explicit: a non-empty blob URL on the response wins over inline
//! bytes, even when both are present — the service stores large match
//! payloads out-of-band.

use records::assemble::PayloadSource;
use records::proto;
use serde::Serialize;

use super::GatewayError;
use super::session::Session;

pub const METHOD_FETCH_RECORD: &str = ".lq.Lobby.fetchGameRecord";
pub const METHOD_FETCH_LIVE_LIST: &str = ".lq.Lobby.fetchGameLiveList";

/// Match-mode identifiers polled by the live route.
pub const LIVE_MODES: [u32; 6] = [208, 209, 211, 212, 215, 216];

/// A fetched match payload, not yet assembled.
#[derive(Debug)]
pub struct RawRecord {
    pub head: proto::RecordGame,
    pub payload: Vec<u8>,
    pub source: PayloadSource,
}

/// Summary of one live match, keyed under its mode by the live route.
#[derive(Debug, Clone, Serialize)]
pub struct LiveMatch {
    pub uuid: String,
    pub start_time: u32,
    pub players: Vec<LivePlayer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LivePlayer {
    pub account_id: u32,
    pub nickname: String,
}

/// Fetch the raw payload for one match.
///
/// # Errors
///
/// Propagates transport, remote-error, and blob-fetch failures. No
/// retry, no fallback beyond the documented source precedence.
pub async fn fetch_record(
    http: &reqwest::Client,
    session: &Session,
    match_id: &str,
) -> Result<RawRecord, GatewayError> {
    let request = proto::ReqGameRecord {
        game_uuid: match_id.to_owned(),
        client_version_string: session.client_version.clone(),
    };
    let response: proto::ResGameRecord = session.call(METHOD_FETCH_RECORD, &request).await?;

    if let Some(error) = &response.error {
        if error.code != 0 {
            return Err(GatewayError::Remote { code: error.code });
        }
    }

    let head = response.head.clone().unwrap_or_default();
    match payload_source(&response) {
        PayloadSource::Blob { url } => {
            tracing::info!(match_id, %url, "fetching match payload from blob");
            let bytes = http.get(&url).send().await?.error_for_status()?.bytes().await?;
            Ok(RawRecord { head, payload: bytes.to_vec(), source: PayloadSource::Blob { url } })
        }
        PayloadSource::Inline => {
            tracing::info!(match_id, bytes = response.data.len(), "using inline match payload");
            Ok(RawRecord { head, payload: response.data, source: PayloadSource::Inline })
        }
    }
}

/// Source precedence: the blob URL wins whenever it is non-empty.
fn payload_source(response: &proto::ResGameRecord) -> PayloadSource {
    if response.data_url.is_empty() {
        PayloadSource::Inline
    } else {
        PayloadSource::Blob { url: response.data_url.clone() }
    }
}

/// Fetch the live-match list for one mode.
///
/// # Errors
///
/// Propagates transport failures and non-zero remote error codes.
pub async fn fetch_live(session: &Session, mode: u32) -> Result<Vec<LiveMatch>, GatewayError> {
    let response: proto::ResGameLiveList = session
        .call(METHOD_FETCH_LIVE_LIST, &proto::ReqGameLiveList { filter_id: mode })
        .await?;

    if let Some(error) = &response.error {
        if error.code != 0 {
            return Err(GatewayError::Remote { code: error.code });
        }
    }

    Ok(response
        .live_list
        .into_iter()
        .map(|head| LiveMatch {
            uuid: head.uuid,
            start_time: head.start_time,
            players: head
                .players
                .into_iter()
                .map(|p| LivePlayer { account_id: p.account_id, nickname: p.nickname })
                .collect(),
        })
        .collect())
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
