//! Endpoint discovery.
//!
//! Three-step handshake against the backend host: fetch the version
//! descriptor, fetch the version-scoped gateway configuration, then
//! normalize one candidate URL into a `wss://` connection target. No
//! retries — any HTTP failure or missing field is fatal for the call.
//! The resolved version also yields the client-version string that later
//! protocol messages must embed.

use serde_json::Value;

use super::GatewayError;

/// Fixed path appended to the selected gateway host.
pub const GATEWAY_PATH: &str = "/gateway";

/// Fixed pick into the candidate list: not load-balanced, not
/// health-checked.
const CANDIDATE_INDEX: usize = 1;

/// A resolved connection target. Immutable; consumed once to build a
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Normalized `wss://` URL.
    pub url: String,
    /// Raw service version, e.g. `0.10.113.w`.
    pub version: String,
    /// Version string embedded in protocol messages, e.g. `web-0.10.113`.
    pub client_version: String,
}

/// Resolve a connection endpoint under `base_host`.
///
/// # Errors
///
/// Propagates HTTP failures as [`GatewayError::Http`] and missing
/// document fields as [`GatewayError::MissingField`].
pub async fn resolve(http: &reqwest::Client, base_host: &str) -> Result<Endpoint, GatewayError> {
    let version_doc: Value = http
        .get(format!("{base_host}/1/version.json"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let version = parse_version(&version_doc)?;
    tracing::info!(%version, "resolved service version");

    let config_doc: Value = http
        .get(format!("{base_host}/1/v{version}/config.json"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let candidate = parse_gateway_candidate(&config_doc)?;
    let url = normalize_endpoint(candidate);
    let client_version = client_version_string(&version);
    tracing::info!(%url, %client_version, "resolved gateway endpoint");

    Ok(Endpoint { url, version, client_version })
}

fn parse_version(doc: &Value) -> Result<String, GatewayError> {
    doc.get("version")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(GatewayError::MissingField("version"))
}

fn parse_gateway_candidate(doc: &Value) -> Result<&str, GatewayError> {
    doc.pointer(&format!("/ip/0/region_urls/{CANDIDATE_INDEX}"))
        .and_then(Value::as_str)
        .ok_or(GatewayError::MissingField("ip[0].region_urls[1]"))
}

/// Strip the scheme, drop any trailing slash, append the gateway path,
/// and re-prefix with the secure websocket scheme.
fn normalize_endpoint(candidate: &str) -> String {
    let host = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"))
        .or_else(|| candidate.strip_prefix("wss://"))
        .unwrap_or(candidate)
        .trim_end_matches('/');
    format!("wss://{host}{GATEWAY_PATH}")
}

/// `0.10.113.w` → `web-0.10.113`: the trailing channel suffix is
/// dropped and the platform prefix added.
fn client_version_string(version: &str) -> String {
    format!("web-{}", version.trim_end_matches(".w"))
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
