//! RPC transport seam.
//!
//! DESIGN
//! ======
//! The remote service speaks request/response RPC over a persistent
//! websocket. The gateway consumes that channel through the [`Transport`]
//! trait; [`WsChannel`] is the production implementation and tests
//! substitute mocks. The framing is deliberately minimal: one in-flight
//! call at a time behind an async mutex, a 1-byte message discriminant,
//! a 2-byte little-endian sequence index, and a protobuf `Wrapper`
//! naming the remote method. Every call carries a bounded timeout so a
//! dead peer cannot suspend a caller forever.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use prost::Message as _;
use records::proto;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Notification pushed by the server outside any exchange; skipped.
const MSG_NOTIFY: u8 = 1;
const MSG_REQUEST: u8 = 2;
const MSG_RESPONSE: u8 = 3;

/// Errors produced by the RPC channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The websocket connection could not be established.
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),

    /// Sending or receiving on the established socket failed.
    #[error("websocket io failed: {0}")]
    Io(Box<tokio_tungstenite::tungstenite::Error>),

    /// The socket closed before a response arrived.
    #[error("websocket closed before response")]
    Closed,

    /// No response within the configured deadline.
    #[error("timed out waiting for response to {method}")]
    Timeout { method: String },

    /// A response frame did not follow the expected framing.
    #[error("malformed response frame: {0}")]
    Malformed(String),

    /// The response wrapper could not be decoded.
    #[error("failed to decode response wrapper: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Request/response remote calls plus close, consumed by the session
/// manager and fetchers. Implementations must be safe to share across
/// concurrent callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one remote call and return the raw response payload.
    async fn call(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, TransportError>;

    /// Close the underlying connection.
    async fn close(&self) -> Result<(), TransportError>;
}

// =============================================================================
// WEBSOCKET CHANNEL
// =============================================================================

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

struct ChannelInner {
    stream: WsStream,
    next_index: u16,
}

/// Production [`Transport`] over a tungstenite websocket.
pub struct WsChannel {
    inner: tokio::sync::Mutex<ChannelInner>,
    timeout: Duration,
}

impl WsChannel {
    /// Connect to a resolved `wss://` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] when the handshake fails.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| TransportError::Connect(Box::new(error)))?;
        Ok(Self {
            inner: tokio::sync::Mutex::new(ChannelInner { stream, next_index: 1 }),
            timeout,
        })
    }
}

#[async_trait]
impl Transport for WsChannel {
    async fn call(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock().await;
        let index = inner.next_index;
        inner.next_index = inner.next_index.wrapping_add(1).max(1);

        let wrapper = proto::Wrapper { name: method.to_owned(), data: payload };
        let mut frame = Vec::with_capacity(3 + wrapper.encoded_len());
        frame.push(MSG_REQUEST);
        frame.extend_from_slice(&index.to_le_bytes());
        frame.extend_from_slice(&wrapper.encode_to_vec());

        inner
            .stream
            .send(Message::Binary(frame.into()))
            .await
            .map_err(|error| TransportError::Io(Box::new(error)))?;

        let response = recv_response(&mut inner.stream, index, self.timeout).await;
        match response {
            Err(TransportError::Timeout { .. }) => {
                Err(TransportError::Timeout { method: method.to_owned() })
            }
            other => other,
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner
            .stream
            .close(None)
            .await
            .map_err(|error| TransportError::Io(Box::new(error)))
    }
}

async fn recv_response(
    stream: &mut WsStream,
    index: u16,
    timeout: Duration,
) -> Result<Vec<u8>, TransportError> {
    let fut = async {
        loop {
            let Some(message) = stream.next().await else {
                return Err(TransportError::Closed);
            };
            match message.map_err(|error| TransportError::Io(Box::new(error)))? {
                Message::Binary(bytes) => {
                    if let Some(data) = parse_response_frame(&bytes, index)? {
                        return Ok(data);
                    }
                }
                Message::Close(_) => return Err(TransportError::Closed),
                _ => {}
            }
        }
    };

    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| TransportError::Timeout { method: String::new() })?
}

/// Parse one binary frame. Returns `Ok(None)` for frames that are not
/// the awaited response (server notifications, stale responses).
fn parse_response_frame(bytes: &[u8], index: u16) -> Result<Option<Vec<u8>>, TransportError> {
    let Some((&discriminant, rest)) = bytes.split_first() else {
        return Err(TransportError::Malformed("empty frame".into()));
    };
    if discriminant == MSG_NOTIFY {
        return Ok(None);
    }
    if discriminant != MSG_RESPONSE {
        return Err(TransportError::Malformed(format!(
            "unexpected message discriminant {discriminant}"
        )));
    }
    let Some((header, body)) = rest.split_at_checked(2) else {
        return Err(TransportError::Malformed("response frame too short".into()));
    };
    let frame_index = u16::from_le_bytes([header[0], header[1]]);
    if frame_index != index {
        return Ok(None);
    }
    let wrapper = proto::Wrapper::decode(body)?;
    Ok(Some(wrapper.data))
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
