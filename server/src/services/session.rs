//! Session lifecycle management.
//!
//! ARCHITECTURE
//! ============
//! The authenticated session is the one piece of process-wide mutable
//! state. `SessionService` owns it behind a single async mutex that is
//! held for the whole of `ensure_active`, so concurrent callers that
//! observe a degraded session collapse into exactly one reconnect and
//! all await its result. Connection establishment hides behind the
//! [`Connector`] trait so tests can substitute mock transports.
//!
//! State machine: `Unestablished → Connected → Authenticated →
//! (Degraded → Unestablished)`. A liveness failure triggers exactly one
//! teardown-and-reestablish pass per call; a failure inside that pass
//! propagates rather than looping.

use std::sync::Arc;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use prost::Message;
use records::proto;
use sha2::Sha256;
use uuid::Uuid;

use super::GatewayError;
use super::endpoint::Endpoint;
use crate::transport::Transport;

pub const METHOD_LOGIN: &str = ".lq.Lobby.login";
pub const METHOD_HEATBEAT: &str = ".lq.Lobby.heatbeat";
pub const METHOD_LOGOUT: &str = ".lq.Lobby.logout";

/// Fixed key for the keyed hash applied to the account secret.
const LOGIN_HASH_KEY: &[u8] = b"lailai";

/// Currency platform advertised at login.
const CURRENCY_PLATFORM: u32 = 2;

/// Number of consecutive no-op calls in one liveness check.
const LIVENESS_PROBES: u32 = 2;

// =============================================================================
// SESSION
// =============================================================================

/// An authenticated, connected handle usable to issue remote calls.
pub struct Session {
    /// Identity of this session instance; changes on every reconnect.
    pub id: Uuid,
    pub transport: Arc<dyn Transport>,
    /// Protocol version string embedded in requests made on this session.
    pub client_version: String,
    pub account_id: u32,
    pub access_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("client_version", &self.client_version)
            .field("account_id", &self.account_id)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Issue a typed remote call on this session's transport.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and response decode failures.
    pub async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, GatewayError>
    where
        Req: Message,
        Res: Message + Default,
    {
        let data = self.transport.call(method, request.encode_to_vec()).await?;
        let response = Res::decode(data.as_slice()).map_err(records::CodecError::Decode)?;
        Ok(response)
    }
}

// =============================================================================
// CONNECTOR SEAM
// =============================================================================

/// Produces a connected transport plus the endpoint it was resolved
/// from. Production resolves and dials the real gateway; tests hand out
/// mock transports.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<(Arc<dyn Transport>, Endpoint), GatewayError>;
}

/// Production connector: endpoint discovery followed by a websocket
/// dial.
pub struct WsConnector {
    http: reqwest::Client,
    base_host: String,
    timeouts: crate::config::Timeouts,
}

impl WsConnector {
    #[must_use]
    pub fn new(http: reqwest::Client, base_host: String, timeouts: crate::config::Timeouts) -> Self {
        Self { http, base_host, timeouts }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<(Arc<dyn Transport>, Endpoint), GatewayError> {
        let endpoint = super::endpoint::resolve(&self.http, &self.base_host).await?;
        let channel = crate::transport::WsChannel::connect(
            &endpoint.url,
            std::time::Duration::from_secs(self.timeouts.request_secs),
        )
        .await?;
        tracing::info!(url = %endpoint.url, "transport connected");
        Ok((Arc::new(channel), endpoint))
    }
}

// =============================================================================
// SESSION SERVICE
// =============================================================================

/// Owner of the single process-wide session slot.
pub struct SessionService {
    connector: Arc<dyn Connector>,
    account: String,
    secret: String,
    slot: tokio::sync::Mutex<Option<Arc<Session>>>,
}

impl SessionService {
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>, account: String, secret: String) -> Self {
        Self { connector, account, secret, slot: tokio::sync::Mutex::new(None) }
    }

    /// Return a healthy session, establishing or re-establishing one if
    /// needed.
    ///
    /// The slot lock is held for the whole operation: callers racing
    /// against a degraded session serialize here and at most one of
    /// them performs the reconnect.
    ///
    /// # Errors
    ///
    /// Propagates resolution, connection, and login failures. A liveness
    /// failure is not itself an error — it triggers the one automatic
    /// teardown-and-reestablish pass — but any failure inside that pass
    /// is.
    pub async fn ensure_active(&self) -> Result<Arc<Session>, GatewayError> {
        let mut slot = self.slot.lock().await;

        if let Some(session) = slot.as_ref() {
            match self.liveness(session).await {
                Ok(()) => return Ok(Arc::clone(session)),
                Err(error) => {
                    tracing::warn!(session_id = %session.id, %error, "liveness check failed — session degraded");
                    if let Some(dead) = slot.take() {
                        // Best-effort close; a failure here must not mask
                        // the reconnect.
                        if let Err(close_error) = dead.transport.close().await {
                            tracing::debug!(%close_error, "close of degraded transport failed");
                        }
                    }
                    tracing::info!("session torn down");
                }
            }
        }

        let session = self.establish().await?;
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Send a logout on the current session and report the remote error
    /// field rendering (empty when the service reported none).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoSession`] when no session is
    /// established, and propagates call failures.
    pub async fn logout(&self) -> Result<String, GatewayError> {
        let slot = self.slot.lock().await;
        let session = slot.as_ref().ok_or(GatewayError::NoSession)?;
        let response: proto::ResLogout = session.call(METHOD_LOGOUT, &proto::ReqLogout {}).await?;
        tracing::info!(session_id = %session.id, "logout sent");
        Ok(render_error(response.error.as_ref()))
    }

    /// Drop the current session, closing its transport best-effort.
    pub async fn teardown(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.take() {
            if let Err(close_error) = session.transport.close().await {
                tracing::debug!(%close_error, "close during teardown failed");
            }
            tracing::info!(session_id = %session.id, "session torn down");
        }
    }

    /// Full `Unestablished → Authenticated` sequence.
    async fn establish(&self) -> Result<Arc<Session>, GatewayError> {
        let (transport, endpoint) = self.connector.connect().await?;
        tracing::info!(version = %endpoint.version, "session connected");

        match self.login(transport.as_ref(), &endpoint.client_version).await {
            Ok(response) => {
                let session = Arc::new(Session {
                    id: Uuid::new_v4(),
                    transport,
                    client_version: endpoint.client_version,
                    account_id: response.account_id,
                    access_token: response.access_token,
                });
                tracing::info!(session_id = %session.id, account_id = session.account_id, "session authenticated");
                Ok(session)
            }
            Err(error) => {
                if let Err(close_error) = transport.close().await {
                    tracing::debug!(%close_error, "close after failed login failed");
                }
                Err(error)
            }
        }
    }

    async fn login(
        &self,
        transport: &dyn Transport,
        client_version: &str,
    ) -> Result<proto::ResLogin, GatewayError> {
        let request = proto::ReqLogin {
            account: self.account.clone(),
            password: hash_secret(&self.secret),
            device: Some(proto::ClientDeviceInfo { is_browser: true }),
            random_key: Uuid::new_v4().to_string(),
            client_version_string: client_version.to_owned(),
            gen_access_token: true,
            currency_platforms: vec![CURRENCY_PLATFORM],
        };

        let data = transport.call(METHOD_LOGIN, request.encode_to_vec()).await?;
        let response =
            proto::ResLogin::decode(data.as_slice()).map_err(records::CodecError::Decode)?;

        if response.access_token.is_empty() {
            let code = response.error.as_ref().map_or(0, |e| e.code);
            tracing::error!(code, "login rejected: no access token");
            return Err(GatewayError::Auth { code });
        }
        Ok(response)
    }

    /// One liveness check: two consecutive no-op calls. A transport
    /// failure or a set error field on either probe fails the check.
    async fn liveness(&self, session: &Session) -> Result<(), GatewayError> {
        for counter in 0..LIVENESS_PROBES {
            let response: proto::ResCommon = session
                .call(METHOD_HEATBEAT, &proto::ReqHeatBeat { no_operation_counter: counter })
                .await?;
            if let Some(error) = response.error {
                if error.code != 0 {
                    return Err(GatewayError::Remote { code: error.code });
                }
            }
        }
        Ok(())
    }
}

fn render_error(error: Option<&proto::Error>) -> String {
    match error {
        Some(e) if e.code != 0 => format!("code {}", e.code),
        _ => String::new(),
    }
}

/// Keyed hash of the account secret, hex-encoded. The raw secret never
/// goes on the wire.
fn hash_secret(secret: &str) -> String {
    // Hmac accepts keys of any length; construction cannot fail.
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(LOGIN_HASH_KEY)
        .unwrap_or_else(|_| unreachable!("hmac accepts any key length"));
    mac.update(secret.as_bytes());
    bytes_to_hex(&mac.finalize().into_bytes())
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
