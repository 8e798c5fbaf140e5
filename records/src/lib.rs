//! Wire model and record codec for the lobby protocol.
//!
//! This crate owns the protobuf message set shared by the gateway's RPC
//! transport and the match-record assembler. Match payloads arrive as a
//! recursively wrapped envelope stream: a named [`proto::Wrapper`] whose
//! payload is a [`proto::GameDetailRecords`] container, whose record
//! blobs are themselves wrappers around per-round record messages.
//! [`assemble`] reduces that stream to a single ordered document.

pub mod assemble;
pub mod proto;

use prost::Message;

pub use assemble::{
    AssembleError, FetchTrace, MatchDocument, PayloadSource, RoundDocument, TileEvent, assemble,
};

/// Error returned by envelope and record decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw bytes could not be decoded as the expected protobuf message.
    #[error("failed to decode protobuf message: {0}")]
    Decode(#[from] prost::DecodeError),
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A decoded wrapper: a type name from the externally defined set plus
/// opaque payload bytes whose interpretation depends on the name.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub name: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Decode wrapper bytes into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] for malformed bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let wrapper = proto::Wrapper::decode(bytes)?;
        Ok(Self { name: wrapper.name, payload: wrapper.data })
    }

    /// Encode this envelope back into wrapper bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        proto::Wrapper { name: self.name.clone(), data: self.payload.clone() }.encode_to_vec()
    }
}

// =============================================================================
// RECORD NAME DISPATCH
// =============================================================================

/// The closed set of record type names the assembler recognizes.
/// Anything else classifies as [`RecordName::Unknown`] and is skipped,
/// never treated as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordName {
    /// `.lq.RecordNewRound` — starts a new round.
    NewRound,
    /// `.lq.RecordDiscardTile`
    DiscardTile,
    /// `.lq.RecordDealTile`
    DealTile,
    /// `.lq.RecordChiPengGang`
    ChiPengGang,
    /// `.lq.RecordBaBei`
    BaBei,
    /// `.lq.RecordAnGangAddGang`
    AnGangAddGang,
    /// `.lq.RecordHule` — recognized, deliberately not decoded.
    Hule,
    /// Any name outside the known set.
    Unknown,
}

impl RecordName {
    #[must_use]
    pub fn classify(name: &str) -> Self {
        match name {
            ".lq.RecordNewRound" => Self::NewRound,
            ".lq.RecordDiscardTile" => Self::DiscardTile,
            ".lq.RecordDealTile" => Self::DealTile,
            ".lq.RecordChiPengGang" => Self::ChiPengGang,
            ".lq.RecordBaBei" => Self::BaBei,
            ".lq.RecordAnGangAddGang" => Self::AnGangAddGang,
            ".lq.RecordHule" => Self::Hule,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
