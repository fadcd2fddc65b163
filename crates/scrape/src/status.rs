use domain::Reason;
use serde_json::Value;

use crate::ScrapeError;

pub const BANNED_CHANNEL_ALERT: &str =
    "This channel was removed because it violated our Community Guidelines.";
pub const PRIVATE_VIDEO_MESSAGE: &str =
    "This is a private video. Please sign in to verify that you may see it.";
pub const AGE_GATE_REASON: &str = "Sign in to confirm your age";

/// Availability of a resolved payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Visible,
    NotVisible(Reason),
}

/// Text of an alert, either `simpleText` or the concatenated `runs`
fn alert_text(alert: &Value) -> Option<String> {
    let text = alert.pointer("/alertRenderer/text")?;
    if let Some(simple) = text.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }
    let runs = text.get("runs")?.as_array()?;
    Some(
        runs.iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect(),
    )
}

pub fn classify_channel(payload: &Value) -> Result<Availability, ScrapeError> {
    let Some(alerts) = payload.get("alerts") else {
        return Ok(Availability::Visible);
    };
    let Some(alerts) = alerts.as_array() else {
        tracing::error!(payload = %payload, "channel alerts is not a list");
        return Err(ScrapeError::MalformedPayload { field: "alerts" });
    };
    if alerts.is_empty() {
        return Ok(Availability::Visible);
    }

    let messages: Vec<String> = alerts.iter().filter_map(alert_text).collect();
    tracing::info!(?messages, alerts = %payload["alerts"], "channel has alerts");

    if messages.iter().any(|message| message == BANNED_CHANNEL_ALERT) {
        return Ok(Availability::NotVisible(Reason::Banned));
    }
    tracing::warn!(?messages, "channel restricted for an unrecognized reason");
    Err(ScrapeError::AmbiguousRestriction { messages })
}

pub fn classify_video(payload: &Value) -> Result<Availability, ScrapeError> {
    let Some(playability) = payload.get("playabilityStatus") else {
        tracing::error!(payload = %payload, "video payload has no playabilityStatus");
        return Err(ScrapeError::MalformedPayload {
            field: "playabilityStatus",
        });
    };
    let Some(status) = playability.get("status").and_then(Value::as_str) else {
        tracing::error!(playability = %playability, "playabilityStatus has no status");
        return Err(ScrapeError::MalformedPayload {
            field: "playabilityStatus.status",
        });
    };

    match status {
        "LOGIN_REQUIRED" => {
            tracing::info!(playability = %playability, "video requires login");
            login_required_reason(playability).map(Availability::NotVisible)
        }
        "ERROR" => {
            tracing::info!(playability = %playability, "video is not available");
            Ok(Availability::NotVisible(Reason::Removed))
        }
        _ => Ok(Availability::Visible),
    }
}

fn login_required_reason(playability: &Value) -> Result<Reason, ScrapeError> {
    let messages: Vec<String> = playability
        .get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if messages
        .iter()
        .any(|message| message.contains(PRIVATE_VIDEO_MESSAGE))
    {
        return Ok(Reason::Private);
    }

    let reason = playability.get("reason").and_then(Value::as_str);
    if reason == Some(AGE_GATE_REASON) {
        return Ok(Reason::Age);
    }

    let mut messages = messages;
    messages.extend(reason.map(str::to_string));
    tracing::warn!(?messages, "login required for an unrecognized reason");
    Err(ScrapeError::AmbiguousRestriction { messages })
}
