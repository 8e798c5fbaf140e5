use super::*;
use crate::transport::{Transport, TransportError};

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prost::Message;
use uuid::Uuid;

struct ScriptedTransport {
    record: proto::ResGameRecord,
    live: proto::ResGameLiveList,
    calls: Mutex<Vec<(String, Vec<u8>)>>,
}

impl ScriptedTransport {
    fn new(record: proto::ResGameRecord, live: proto::ResGameLiveList) -> Arc<Self> {
        Arc::new(Self { record, live, calls: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().unwrap().push((method.to_owned(), payload));
        match method {
            METHOD_FETCH_RECORD => Ok(self.record.encode_to_vec()),
            METHOD_FETCH_LIVE_LIST => Ok(self.live.encode_to_vec()),
            other => panic!("unexpected remote method {other}"),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn session_with(transport: Arc<ScriptedTransport>) -> Session {
    Session {
        id: Uuid::new_v4(),
        transport,
        client_version: "web-0.10.113".into(),
        account_id: 42,
        access_token: "token".into(),
    }
}

fn record_response() -> proto::ResGameRecord {
    proto::ResGameRecord {
        error: None,
        head: Some(proto::RecordGame { uuid: "m-1".into(), ..Default::default() }),
        data: vec![1, 2, 3],
        data_url: String::new(),
    }
}

// =============================================================================
// SOURCE PRECEDENCE
// =============================================================================

#[test]
fn payload_source_prefers_blob_url_over_inline_bytes() {
    let mut response = record_response();
    response.data_url = "https://blobs.example/m-1".into();
    // Inline bytes are present too; the URL still wins.
    assert!(matches!(payload_source(&response), PayloadSource::Blob { .. }));

    response.data_url.clear();
    assert!(matches!(payload_source(&response), PayloadSource::Inline));
}

#[tokio::test]
async fn fetch_uses_inline_payload_when_no_blob_url() {
    let transport = ScriptedTransport::new(record_response(), proto::ResGameLiveList::default());
    let session = session_with(Arc::clone(&transport));

    let raw = fetch_record(&reqwest::Client::new(), &session, "m-1").await.unwrap();
    assert_eq!(raw.payload, vec![1, 2, 3]);
    assert_eq!(raw.source, PayloadSource::Inline);
    assert_eq!(raw.head.uuid, "m-1");
}

#[tokio::test]
async fn fetch_sources_payload_from_blob_url_even_when_inline_present() {
    let blob_bytes: &[u8] = &[9, 9, 9, 9];
    let app = axum::Router::new()
        .route("/blob/m-1", axum::routing::get(move || async move { blob_bytes.to_vec() }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let mut response = record_response();
    response.data_url = format!("http://{addr}/blob/m-1");
    let transport = ScriptedTransport::new(response, proto::ResGameLiveList::default());
    let session = session_with(transport);

    let raw = fetch_record(&reqwest::Client::new(), &session, "m-1").await.unwrap();
    assert_eq!(raw.payload, blob_bytes, "payload must come from the blob, not inline bytes");
    assert!(matches!(raw.source, PayloadSource::Blob { .. }));
}

// =============================================================================
// REQUEST SHAPE AND ERRORS
// =============================================================================

#[tokio::test]
async fn fetch_embeds_match_id_and_client_version() {
    let transport = ScriptedTransport::new(record_response(), proto::ResGameLiveList::default());
    let session = session_with(Arc::clone(&transport));

    fetch_record(&reqwest::Client::new(), &session, "220101-abcd").await.unwrap();

    let calls = transport.calls.lock().unwrap();
    let (method, payload) = &calls[0];
    assert_eq!(method, METHOD_FETCH_RECORD);
    let request = proto::ReqGameRecord::decode(payload.as_slice()).unwrap();
    assert_eq!(request.game_uuid, "220101-abcd");
    assert_eq!(request.client_version_string, "web-0.10.113");
}

#[tokio::test]
async fn fetch_surfaces_remote_error_code() {
    let mut response = record_response();
    response.error = Some(proto::Error { code: 1203, ..Default::default() });
    let transport = ScriptedTransport::new(response, proto::ResGameLiveList::default());
    let session = session_with(transport);

    let err = fetch_record(&reqwest::Client::new(), &session, "m-1").await.unwrap_err();
    assert!(matches!(err, GatewayError::Remote { code: 1203 }));
}

// =============================================================================
// LIVE LIST
// =============================================================================

#[tokio::test]
async fn fetch_live_maps_summaries() {
    let live = proto::ResGameLiveList {
        error: None,
        live_list: vec![proto::GameLiveHead {
            uuid: "live-1".into(),
            start_time: 1_700_000_000,
            players: vec![proto::PlayerGameView { account_id: 7, nickname: "p1".into() }],
        }],
    };
    let transport = ScriptedTransport::new(record_response(), live);
    let session = session_with(Arc::clone(&transport));

    let matches = fetch_live(&session, 212).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].uuid, "live-1");
    assert_eq!(matches[0].players[0].nickname, "p1");

    let calls = transport.calls.lock().unwrap();
    let request = proto::ReqGameLiveList::decode(calls[0].1.as_slice()).unwrap();
    assert_eq!(request.filter_id, 212);
}

#[tokio::test]
async fn fetch_live_surfaces_remote_error_code() {
    let live = proto::ResGameLiveList {
        error: Some(proto::Error { code: 9, ..Default::default() }),
        live_list: vec![],
    };
    let transport = ScriptedTransport::new(record_response(), live);
    let session = session_with(transport);

    let err = fetch_live(&session, 208).await.unwrap_err();
    assert!(matches!(err, GatewayError::Remote { code: 9 }));
}
