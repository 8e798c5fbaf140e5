//! Hand-rolled prost structs for the lobby wire schema.
//!
//! The message set is externally defined and versioned by the remote
//! service; only the fields this gateway reads or writes are declared
//! here. Tags follow the remote schema, so unknown fields on the wire
//! are skipped by prost without error.

use prost::Message;

// =============================================================================
// COMMON
// =============================================================================

/// Error field carried by most lobby responses. `code == 0` means no error.
#[derive(Clone, PartialEq, Message)]
pub struct Error {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(uint32, repeated, tag = "2")]
    pub u32_params: Vec<u32>,
    #[prost(string, repeated, tag = "3")]
    pub str_params: Vec<String>,
}

/// Minimal response shared by heartbeat-style calls.
#[derive(Clone, PartialEq, Message)]
pub struct ResCommon {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
}

/// Named wrapper around an opaque payload. The recursive unit of the
/// record stream: the outer match payload is a `Wrapper`, and so is
/// every record blob inside `GameDetailRecords`.
#[derive(Clone, PartialEq, Message)]
pub struct Wrapper {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

// =============================================================================
// LOGIN / LOGOUT / HEARTBEAT
// =============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct ClientDeviceInfo {
    #[prost(bool, tag = "1")]
    pub is_browser: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReqLogin {
    #[prost(string, tag = "1")]
    pub account: String,
    /// Keyed hash of the account secret, hex-encoded. Never the raw secret.
    #[prost(string, tag = "2")]
    pub password: String,
    #[prost(message, optional, tag = "3")]
    pub device: Option<ClientDeviceInfo>,
    /// Fresh random nonce per login attempt.
    #[prost(string, tag = "4")]
    pub random_key: String,
    #[prost(string, tag = "5")]
    pub client_version_string: String,
    #[prost(bool, tag = "6")]
    pub gen_access_token: bool,
    #[prost(uint32, repeated, tag = "7")]
    pub currency_platforms: Vec<u32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ResLogin {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
    #[prost(uint32, tag = "2")]
    pub account_id: u32,
    /// Empty when authentication failed.
    #[prost(string, tag = "3")]
    pub access_token: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReqHeatBeat {
    #[prost(uint32, tag = "1")]
    pub no_operation_counter: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReqLogout {}

#[derive(Clone, PartialEq, Message)]
pub struct ResLogout {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
}

// =============================================================================
// GAME RECORD FETCH
// =============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct ReqGameRecord {
    #[prost(string, tag = "1")]
    pub game_uuid: String,
    #[prost(string, tag = "2")]
    pub client_version_string: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct ResGameRecord {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
    #[prost(message, optional, tag = "2")]
    pub head: Option<RecordGame>,
    /// Inline match payload. May be empty when `data_url` is set.
    #[prost(bytes = "vec", tag = "3")]
    pub data: Vec<u8>,
    /// Out-of-band payload location for large matches. Non-empty wins
    /// over `data` (see the fetcher's source precedence).
    #[prost(string, tag = "4")]
    pub data_url: String,
}

/// Match header: identity, timing, seating, and end-of-match summary.
#[derive(Clone, PartialEq, Message)]
pub struct RecordGame {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(uint32, tag = "2")]
    pub start_time: u32,
    #[prost(uint32, tag = "3")]
    pub end_time: u32,
    #[prost(message, repeated, tag = "4")]
    pub accounts: Vec<RecordGameAccount>,
    #[prost(message, optional, tag = "5")]
    pub result: Option<GameEndResult>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RecordGameAccount {
    #[prost(uint32, tag = "1")]
    pub account_id: u32,
    #[prost(uint32, tag = "2")]
    pub seat: u32,
    #[prost(string, tag = "3")]
    pub nickname: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct GameEndResult {
    #[prost(message, repeated, tag = "1")]
    pub players: Vec<GameEndPlayer>,
}

#[derive(Clone, PartialEq, Message)]
pub struct GameEndPlayer {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(int32, tag = "2")]
    pub total_point: i32,
    #[prost(int32, tag = "3")]
    pub grading_score: i32,
}

// =============================================================================
// LIVE MATCH LIST
// =============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct ReqGameLiveList {
    /// Match-mode identifier to list live games for.
    #[prost(uint32, tag = "1")]
    pub filter_id: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct ResGameLiveList {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
    #[prost(message, repeated, tag = "2")]
    pub live_list: Vec<GameLiveHead>,
}

#[derive(Clone, PartialEq, Message)]
pub struct GameLiveHead {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(uint32, tag = "2")]
    pub start_time: u32,
    #[prost(message, repeated, tag = "3")]
    pub players: Vec<PlayerGameView>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlayerGameView {
    #[prost(uint32, tag = "1")]
    pub account_id: u32,
    #[prost(string, tag = "2")]
    pub nickname: String,
}

// =============================================================================
// MATCH DETAIL RECORDS
// =============================================================================

/// Container unwrapped from the outer match payload. Records arrive in
/// one of two shapes depending on service version: a flat blob list
/// (legacy) or an action list where only entries with a non-empty
/// `result` carry a record (current).
#[derive(Clone, PartialEq, Message)]
pub struct GameDetailRecords {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub records: Vec<Vec<u8>>,
    #[prost(uint32, tag = "2")]
    pub version: u32,
    #[prost(message, repeated, tag = "3")]
    pub actions: Vec<GameAction>,
}

#[derive(Clone, PartialEq, Message)]
pub struct GameAction {
    #[prost(uint32, tag = "1")]
    pub passed: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub result: Vec<u8>,
}

// =============================================================================
// PER-ROUND RECORDS
// =============================================================================

/// Start of a round. Carries the metadata that seeds a `RoundDocument`.
#[derive(Clone, PartialEq, Message)]
pub struct RecordNewRound {
    #[prost(uint32, tag = "1")]
    pub chang: u32,
    #[prost(uint32, tag = "2")]
    pub ju: u32,
    #[prost(uint32, tag = "3")]
    pub ben: u32,
    #[prost(string, tag = "4")]
    pub dora: String,
    #[prost(int32, repeated, tag = "5")]
    pub scores: Vec<i32>,
    #[prost(uint32, tag = "6")]
    pub liqibang: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct RecordDiscardTile {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(string, tag = "2")]
    pub tile: String,
    #[prost(bool, tag = "3")]
    pub is_liqi: bool,
    /// True when the freshly drawn tile was discarded.
    #[prost(bool, tag = "4")]
    pub moqie: bool,
    #[prost(string, repeated, tag = "5")]
    pub doras: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RecordDealTile {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(string, tag = "2")]
    pub tile: String,
    #[prost(uint32, tag = "3")]
    pub left_tile_count: u32,
    #[prost(string, repeated, tag = "4")]
    pub doras: Vec<String>,
}

/// Chi / pon / open-kan call on another player's discard.
#[derive(Clone, PartialEq, Message)]
pub struct RecordChiPengGang {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(uint32, tag = "2")]
    pub r#type: u32,
    #[prost(string, repeated, tag = "3")]
    pub tiles: Vec<String>,
    #[prost(uint32, repeated, tag = "4")]
    pub froms: Vec<u32>,
}

/// North-tile declaration (three-player rule).
#[derive(Clone, PartialEq, Message)]
pub struct RecordBaBei {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(bool, tag = "2")]
    pub moqie: bool,
}

/// Added or concealed kan. The numeric `type` discriminates the two
/// known variants; it is consumed during normalization and never shows
/// up in the output document.
#[derive(Clone, PartialEq, Message)]
pub struct RecordAnGangAddGang {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(uint32, tag = "2")]
    pub r#type: u32,
    #[prost(string, tag = "3")]
    pub tiles: String,
}
