//! Match-record assembler.
//!
//! DESIGN
//! ======
//! `assemble` walks the envelope stream inside a raw match payload and
//! reduces it to one ordered document: rounds appear in the order their
//! start records occurred, events in the order they occurred within the
//! round. A "current round" cursor points at the last opened round; any
//! recognized per-round record arriving before the first round start is
//! invalid input and rejected — it is never attached to a phantom round.
//!
//! Two silent fallbacks from the service are preserved as explicit
//! precedence rules:
//! - record source: flat `records` list when non-empty, else the
//!   non-empty `result` blobs of the `actions` list, in order;
//! - the payload itself comes from a blob URL or inline bytes, decided
//!   upstream by the fetcher and reported here via [`FetchTrace`].

use prost::Message;
use serde::Serialize;

use crate::{CodecError, Envelope, RecordName, proto};

/// Error returned by [`assemble`]. Any failure discards the partially
/// built document.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// An envelope or record message could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A recognized per-round record occurred before any round start.
    #[error("record {name} occurred before the first round start")]
    EventBeforeRound { name: String },
}

// =============================================================================
// OUTPUT DOCUMENT
// =============================================================================

/// Where the raw match payload was sourced from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PayloadSource {
    /// Inline bytes on the fetch response.
    Inline,
    /// Secondary fetch from an out-of-band blob location.
    Blob { url: String },
}

/// Provenance attached to every assembled document: which protocol
/// version fetched it and where the payload bytes came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FetchTrace {
    pub client_version: String,
    #[serde(flatten)]
    pub payload: PayloadSource,
}

/// One seated account, copied from the match header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub account_id: u32,
    pub seat: u32,
    pub nickname: String,
}

/// End-of-match standing for one player, copied from the match header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerResult {
    pub seat: u32,
    pub total_point: i32,
    pub grading_score: i32,
}

/// The assembled match: header fields plus rounds in encounter order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchDocument {
    pub id: String,
    pub start_time: u32,
    pub end_time: u32,
    pub accounts: Vec<AccountSummary>,
    pub result: Vec<PlayerResult>,
    pub trace: FetchTrace,
    pub rounds: Vec<RoundDocument>,
}

/// One round: metadata from its start record plus events in input order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundDocument {
    pub chang: u32,
    pub ju: u32,
    pub ben: u32,
    pub dora: String,
    pub scores: Vec<i32>,
    pub liqibang: u32,
    pub events: Vec<TileEvent>,
}

/// Symbolic kind for a kan-style meld addition. Derived from the wire
/// record's numeric sub-type; the number itself never reaches output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KanKind {
    /// Sub-type 2: tile added to an existing open triplet.
    AddKan,
    /// Sub-type 3: concealed kan.
    AnKan,
}

impl KanKind {
    /// Only sub-types 2 and 3 are defined by the service; any other
    /// value maps to `None` (a known gap, not a fallback).
    #[must_use]
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            2 => Some(Self::AddKan),
            3 => Some(Self::AnKan),
            _ => None,
        }
    }
}

/// A normalized per-round event, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileEvent {
    Discard {
        seat: u32,
        tile: String,
        is_liqi: bool,
        moqie: bool,
        doras: Vec<String>,
    },
    Draw {
        seat: u32,
        tile: String,
        left_tile_count: u32,
        doras: Vec<String>,
    },
    Call {
        seat: u32,
        call_type: u32,
        tiles: Vec<String>,
        froms: Vec<u32>,
    },
    Pei {
        seat: u32,
        moqie: bool,
    },
    AddToMeld {
        seat: u32,
        tiles: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        kan: Option<KanKind>,
    },
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Reduce a raw match payload to a [`MatchDocument`].
///
/// # Errors
///
/// Returns [`AssembleError::Codec`] when the outer wrapper, the detail
/// container, or a recognized record fails to decode, and
/// [`AssembleError::EventBeforeRound`] when a per-round record precedes
/// the first round start. Unknown record names are skipped silently.
pub fn assemble(
    head: proto::RecordGame,
    payload: &[u8],
    trace: FetchTrace,
) -> Result<MatchDocument, AssembleError> {
    let outer = Envelope::decode(payload)?;
    let details =
        proto::GameDetailRecords::decode(outer.payload.as_slice()).map_err(CodecError::Decode)?;

    let mut rounds: Vec<RoundDocument> = Vec::new();
    for blob in record_blobs(&details) {
        let envelope = Envelope::decode(blob)?;
        let body = envelope.payload.as_slice();
        match RecordName::classify(&envelope.name) {
            RecordName::NewRound => {
                let record =
                    proto::RecordNewRound::decode(body).map_err(CodecError::Decode)?;
                rounds.push(RoundDocument {
                    chang: record.chang,
                    ju: record.ju,
                    ben: record.ben,
                    dora: record.dora,
                    scores: record.scores,
                    liqibang: record.liqibang,
                    events: Vec::new(),
                });
            }
            RecordName::DiscardTile => {
                let r = proto::RecordDiscardTile::decode(body).map_err(CodecError::Decode)?;
                push_event(&mut rounds, &envelope.name, TileEvent::Discard {
                    seat: r.seat,
                    tile: r.tile,
                    is_liqi: r.is_liqi,
                    moqie: r.moqie,
                    doras: r.doras,
                })?;
            }
            RecordName::DealTile => {
                let r = proto::RecordDealTile::decode(body).map_err(CodecError::Decode)?;
                push_event(&mut rounds, &envelope.name, TileEvent::Draw {
                    seat: r.seat,
                    tile: r.tile,
                    left_tile_count: r.left_tile_count,
                    doras: r.doras,
                })?;
            }
            RecordName::ChiPengGang => {
                let r = proto::RecordChiPengGang::decode(body).map_err(CodecError::Decode)?;
                push_event(&mut rounds, &envelope.name, TileEvent::Call {
                    seat: r.seat,
                    call_type: r.r#type,
                    tiles: r.tiles,
                    froms: r.froms,
                })?;
            }
            RecordName::BaBei => {
                let r = proto::RecordBaBei::decode(body).map_err(CodecError::Decode)?;
                push_event(&mut rounds, &envelope.name, TileEvent::Pei {
                    seat: r.seat,
                    moqie: r.moqie,
                })?;
            }
            RecordName::AnGangAddGang => {
                let r = proto::RecordAnGangAddGang::decode(body).map_err(CodecError::Decode)?;
                let kan = KanKind::from_wire(r.r#type);
                push_event(&mut rounds, &envelope.name, TileEvent::AddToMeld {
                    seat: r.seat,
                    tiles: r.tiles,
                    kan,
                })?;
            }
            RecordName::Hule => {
                // Round results are recognized but not decoded; the header
                // already carries the end-of-match summary. Extend here if
                // per-round results become part of the document.
                require_round(&rounds, &envelope.name)?;
            }
            RecordName::Unknown => {}
        }
    }

    Ok(MatchDocument {
        id: head.uuid,
        start_time: head.start_time,
        end_time: head.end_time,
        accounts: head
            .accounts
            .into_iter()
            .map(|a| AccountSummary { account_id: a.account_id, seat: a.seat, nickname: a.nickname })
            .collect(),
        result: head
            .result
            .map(|r| {
                r.players
                    .into_iter()
                    .map(|p| PlayerResult {
                        seat: p.seat,
                        total_point: p.total_point,
                        grading_score: p.grading_score,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        trace,
        rounds,
    })
}

/// Record-source precedence: the flat blob list wins when non-empty,
/// otherwise the non-empty action results contribute, in order.
fn record_blobs(details: &proto::GameDetailRecords) -> Vec<&[u8]> {
    if details.records.is_empty() {
        details
            .actions
            .iter()
            .filter(|a| !a.result.is_empty())
            .map(|a| a.result.as_slice())
            .collect()
    } else {
        details.records.iter().map(Vec::as_slice).collect()
    }
}

fn push_event(
    rounds: &mut [RoundDocument],
    name: &str,
    event: TileEvent,
) -> Result<(), AssembleError> {
    match rounds.last_mut() {
        Some(round) => {
            round.events.push(event);
            Ok(())
        }
        None => Err(AssembleError::EventBeforeRound { name: name.to_owned() }),
    }
}

fn require_round(rounds: &[RoundDocument], name: &str) -> Result<(), AssembleError> {
    if rounds.is_empty() {
        return Err(AssembleError::EventBeforeRound { name: name.to_owned() });
    }
    Ok(())
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;
