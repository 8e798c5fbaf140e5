//! Gateway services: endpoint discovery, session lifecycle, record fetch.

pub mod endpoint;
pub mod record;
pub mod session;

use crate::transport::TransportError;

/// Errors surfaced by gateway operations. Routes map these onto HTTP
/// statuses; none of them are retried beyond the session manager's
/// single automatic reconnect pass.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// An outbound HTTP fetch (discovery or blob) failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A discovery document is missing an expected field.
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),

    /// Endpoint resolution failed for a non-HTTP reason.
    #[error("endpoint resolution failed: {0}")]
    Resolve(String),

    /// The RPC channel failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A remote response payload could not be decoded.
    #[error(transparent)]
    Codec(#[from] records::CodecError),

    /// Login was rejected: the response carried no access token.
    #[error("login rejected by remote service (code {code})")]
    Auth { code: u32 },

    /// A remote call answered with a non-zero error code.
    #[error("remote call failed (code {code})")]
    Remote { code: u32 },

    /// An operation that needs an established session found none.
    #[error("no active session")]
    NoSession,

    /// The fetched match payload could not be assembled.
    #[error(transparent)]
    Assemble(#[from] records::AssembleError),
}
