use super::*;
use serde_json::json;

#[test]
fn parse_version_extracts_string() {
    let doc = json!({ "version": "0.10.113.w", "force_version": "0.4.0.w" });
    assert_eq!(parse_version(&doc).unwrap(), "0.10.113.w");
}

#[test]
fn parse_version_missing_field_errors() {
    let err = parse_version(&json!({})).unwrap_err();
    assert!(matches!(err, GatewayError::MissingField("version")));
}

#[test]
fn parse_gateway_candidate_picks_fixed_index() {
    let doc = json!({
        "ip": [{
            "name": "player",
            "region_urls": [
                "https://first.example.com",
                "https://second.example.com",
                "https://third.example.com"
            ]
        }]
    });
    assert_eq!(parse_gateway_candidate(&doc).unwrap(), "https://second.example.com");
}

#[test]
fn parse_gateway_candidate_short_list_errors() {
    let doc = json!({ "ip": [{ "region_urls": ["https://only.example.com"] }] });
    let err = parse_gateway_candidate(&doc).unwrap_err();
    assert!(matches!(err, GatewayError::MissingField(_)));
}

#[test]
fn normalize_strips_scheme_and_appends_gateway_path() {
    assert_eq!(
        normalize_endpoint("https://gate.example.com/"),
        "wss://gate.example.com/gateway"
    );
    assert_eq!(
        normalize_endpoint("http://gate.example.com:4500"),
        "wss://gate.example.com:4500/gateway"
    );
    assert_eq!(normalize_endpoint("gate.example.com"), "wss://gate.example.com/gateway");
}

#[test]
fn client_version_drops_channel_suffix() {
    assert_eq!(client_version_string("0.10.113.w"), "web-0.10.113");
    assert_eq!(client_version_string("0.9.0"), "web-0.9.0");
}
