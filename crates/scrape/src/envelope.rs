//! Envelope resolution.
//!
//! The upstream wraps the same payload in different outer shapes depending on
//! how the request was served. Each known shape is a [`Candidate`]; candidates
//! are tried in priority order and the first that yields a JSON object wins.

use std::fmt;

use serde_json::Value;

use crate::{PayloadKind, ScrapeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeVariant {
    /// Payload under a named field of a top-level object
    Object,
    /// Payload under a named field of one element of a top-level array
    Indexed,
    /// Payload serialized as a JSON string inside an indexed element
    EncodedString,
}

impl fmt::Display for EnvelopeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvelopeVariant::Object => "object",
            EnvelopeVariant::Indexed => "indexed",
            EnvelopeVariant::EncodedString => "encoded-string",
        };
        f.write_str(name)
    }
}

pub struct Candidate {
    pub variant: EnvelopeVariant,
    pub extract: fn(&Value) -> Option<Value>,
}

/// Inner response object with the outer envelope stripped
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPayload {
    pub variant: EnvelopeVariant,
    pub payload: Value,
}

fn object_at(raw: &Value, pointer: &str) -> Option<Value> {
    raw.pointer(pointer).filter(|v| v.is_object()).cloned()
}

fn encoded_object_at(raw: &Value, pointer: &str) -> Option<Value> {
    let encoded = raw.pointer(pointer)?.as_str()?;
    match serde_json::from_str::<Value>(encoded) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(pointer, %error, "embedded player response is not valid json");
            None
        }
    }
}

pub const CHANNEL_CANDIDATES: &[Candidate] = &[
    Candidate {
        variant: EnvelopeVariant::Object,
        extract: |raw| object_at(raw, "/response"),
    },
    Candidate {
        variant: EnvelopeVariant::Indexed,
        extract: |raw| object_at(raw, "/1/response"),
    },
];

pub const VIDEO_CANDIDATES: &[Candidate] = &[
    Candidate {
        variant: EnvelopeVariant::Object,
        extract: |raw| object_at(raw, "/playerResponse"),
    },
    Candidate {
        variant: EnvelopeVariant::Indexed,
        extract: |raw| object_at(raw, "/2/playerResponse"),
    },
    Candidate {
        variant: EnvelopeVariant::EncodedString,
        extract: |raw| encoded_object_at(raw, "/2/player/args/player_response"),
    },
];

/// Returns the first candidate that structurally matches `raw`
pub fn resolve(
    kind: PayloadKind,
    candidates: &[Candidate],
    raw: &Value,
) -> Result<ResolvedPayload, ScrapeError> {
    let resolved = candidates.iter().find_map(|candidate| {
        (candidate.extract)(raw).map(|payload| ResolvedPayload {
            variant: candidate.variant,
            payload,
        })
    });

    match resolved {
        Some(resolved) => {
            tracing::debug!(%kind, variant = %resolved.variant, "resolved envelope");
            Ok(resolved)
        }
        None => {
            tracing::error!(%kind, payload = %raw, "unrecognized response envelope");
            Err(ScrapeError::UnrecognizedEnvelope { kind })
        }
    }
}

pub fn resolve_channel_envelope(raw: &Value) -> Result<ResolvedPayload, ScrapeError> {
    resolve(PayloadKind::Channel, CHANNEL_CANDIDATES, raw)
}

pub fn resolve_video_envelope(raw: &Value) -> Result<ResolvedPayload, ScrapeError> {
    resolve(PayloadKind::Video, VIDEO_CANDIDATES, raw)
}
