use serde::{Serialize, Serializer};

mod identifier;

pub use identifier::{ChannelLookup, IdentifierError, VideoId, resolve_channel, resolve_video};

/// Why a channel or video is not visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Banned,
    Private,
    Age,
    Removed,
}

/// Outcome of a single lookup: either the full record or only the reason it is hidden.
///
/// Serializes as `{"visible": true, ...fields}` or `{"visible": false, "reason": ...}`,
/// so a hidden record can never leak data fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<T> {
    Visible(T),
    NotVisible(Reason),
}

pub type ChannelRecord = Record<Channel>;
pub type VideoRecord = Record<Video>;

impl<T> Record<T> {
    pub fn is_visible(&self) -> bool {
        matches!(self, Record::Visible(_))
    }

    pub fn reason(&self) -> Option<Reason> {
        match self {
            Record::Visible(_) => None,
            Record::NotVisible(reason) => Some(*reason),
        }
    }
}

#[derive(Serialize)]
struct VisibleBody<'a, T> {
    visible: bool,
    #[serde(flatten)]
    record: &'a T,
}

#[derive(Serialize)]
struct HiddenBody {
    visible: bool,
    reason: Reason,
}

impl<T: Serialize> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Record::Visible(record) => VisibleBody {
                visible: true,
                record,
            }
            .serialize(serializer),
            Record::NotVisible(reason) => HiddenBody {
                visible: false,
                reason: *reason,
            }
            .serialize(serializer),
        }
    }
}

/// Represents a visible channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: String,
    pub thumbnail_url: String,
    pub title: String,
}

/// Represents a visible video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub channel_id: String,
    /// Whole seconds; 0 when the upstream does not report a length
    pub duration: u64,
    pub is_live: bool,
    pub is_live_content: bool,
    pub is_upcoming: bool,
    pub published_date: String,
    /// Epoch seconds, only set for upcoming broadcasts with a known start
    pub scheduled_at: Option<i64>,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_video() -> Video {
        Video {
            video_id: "abc123".to_string(),
            channel_id: "UC123".to_string(),
            duration: 125,
            is_live: false,
            is_live_content: false,
            is_upcoming: false,
            published_date: "2023-01-01".to_string(),
            scheduled_at: None,
            title: "Mock Video".to_string(),
        }
    }

    #[test]
    fn visible_video_serializes_flat_with_null_schedule() {
        let value = serde_json::to_value(Record::Visible(sample_video())).unwrap();
        assert_eq!(
            value,
            json!({
                "visible": true,
                "videoId": "abc123",
                "channelId": "UC123",
                "duration": 125,
                "isLive": false,
                "isLiveContent": false,
                "isUpcoming": false,
                "publishedDate": "2023-01-01",
                "scheduledAt": null,
                "title": "Mock Video",
            })
        );
    }

    #[test]
    fn hidden_record_carries_only_reason() {
        let record: ChannelRecord = Record::NotVisible(Reason::Banned);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "visible": false, "reason": "banned" }));
        assert!(!record.is_visible());
        assert_eq!(record.reason(), Some(Reason::Banned));
    }

    #[test]
    fn visible_channel_uses_camel_case() {
        let record = Record::Visible(Channel {
            channel_id: "UC123".to_string(),
            thumbnail_url: "https://yt3.example/avatar.jpg".to_string(),
            title: "Mock Channel".to_string(),
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["thumbnailUrl"], "https://yt3.example/avatar.jpg");
        assert_eq!(value["visible"], true);
        assert!(value.get("reason").is_none());
    }
}
