//! Turns raw upstream JSON into channel and video records.
//!
//! The pipeline is always the same: strip the envelope, classify availability,
//! then extract fields. A hidden payload short-circuits before extraction so a
//! `NotVisible` record never carries data.

use std::fmt;

use domain::{ChannelRecord, Record, VideoRecord};
use serde_json::Value;

pub mod envelope;
pub mod extract;
pub mod field;
pub mod parse;
pub mod status;

pub use envelope::{EnvelopeVariant, ResolvedPayload, resolve_channel_envelope, resolve_video_envelope};
pub use extract::{extract_channel, extract_video};
pub use status::{Availability, classify_channel, classify_video};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Channel,
    Video,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Channel => f.write_str("channel"),
            PayloadKind::Video => f.write_str("video"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScrapeError {
    #[error("unrecognized {kind} response envelope")]
    UnrecognizedEnvelope { kind: PayloadKind },
    #[error("payload is missing required field {field}")]
    MalformedPayload { field: &'static str },
    #[error("restricted for an unrecognized reason: {messages:?}")]
    AmbiguousRestriction { messages: Vec<String> },
}

pub fn scrape_channel(raw: &Value) -> Result<ChannelRecord, ScrapeError> {
    let resolved = resolve_channel_envelope(raw)?;
    match classify_channel(&resolved.payload)? {
        Availability::NotVisible(reason) => Ok(Record::NotVisible(reason)),
        Availability::Visible => extract_channel(&resolved.payload).map(Record::Visible),
    }
}

pub fn scrape_video(raw: &Value) -> Result<VideoRecord, ScrapeError> {
    let resolved = resolve_video_envelope(raw)?;
    match classify_video(&resolved.payload)? {
        Availability::NotVisible(reason) => Ok(Record::NotVisible(reason)),
        Availability::Visible => extract_video(&resolved.payload).map(Record::Visible),
    }
}
