use domain::{Channel, Video};
use serde_json::Value;

use crate::ScrapeError;
use crate::field::{Optional, Required, boolean, string};
use crate::parse::{duration_seconds, epoch_seconds};

const CHANNEL_ID: Required<String> = Required {
    name: "channelId",
    pointers: &[
        "/header/c4TabbedHeaderRenderer/channelId",
        "/metadata/channelMetadataRenderer/externalId",
    ],
    read: string,
};

const CHANNEL_THUMBNAIL: Required<String> = Required {
    name: "thumbnailUrl",
    pointers: &[
        "/header/c4TabbedHeaderRenderer/avatar/thumbnails/1/url",
        "/metadata/channelMetadataRenderer/avatar/thumbnails/0/url",
    ],
    read: string,
};

const CHANNEL_TITLE: Required<String> = Required {
    name: "title",
    pointers: &[
        "/header/c4TabbedHeaderRenderer/title",
        "/metadata/channelMetadataRenderer/title",
    ],
    read: string,
};

const VIDEO_ID: Required<String> = Required {
    name: "videoId",
    pointers: &["/videoDetails/videoId"],
    read: string,
};

const VIDEO_CHANNEL_ID: Required<String> = Required {
    name: "channelId",
    pointers: &["/videoDetails/channelId"],
    read: string,
};

const VIDEO_TITLE: Required<String> = Required {
    name: "title",
    pointers: &["/videoDetails/title"],
    read: string,
};

const PUBLISHED_DATE: Required<String> = Required {
    name: "publishedDate",
    pointers: &["/microformat/playerMicroformatRenderer/publishDate"],
    read: string,
};

const DURATION: Optional<u64> = Optional {
    name: "duration",
    pointers: &[
        "/videoDetails/lengthSeconds",
        "/microformat/playerMicroformatRenderer/lengthSeconds",
        "/contentDetails/duration",
    ],
    read: duration_seconds,
};

const IS_LIVE: Optional<bool> = Optional {
    name: "isLive",
    pointers: &["/videoDetails/isLive"],
    read: boolean,
};

const IS_LIVE_CONTENT: Optional<bool> = Optional {
    name: "isLiveContent",
    pointers: &["/videoDetails/isLiveContent"],
    read: boolean,
};

const IS_UPCOMING: Optional<bool> = Optional {
    name: "isUpcoming",
    pointers: &["/videoDetails/isUpcoming"],
    read: boolean,
};

const SCHEDULED_AT: Optional<Option<i64>> = Optional {
    name: "scheduledAt",
    pointers: &[
        "/playabilityStatus/liveStreamability/liveStreamabilityRenderer/offlineSlate/liveStreamOfflineSlateRenderer/scheduledStartTime",
        "/microformat/playerMicroformatRenderer/liveBroadcastDetails/startTimestamp",
    ],
    read: |value| epoch_seconds(value).map(Some),
};

fn log_malformed(kind: &str, payload: &Value, error: &ScrapeError) {
    tracing::error!(kind, %error, payload = %payload, "failed to extract fields");
}

pub fn extract_channel(payload: &Value) -> Result<Channel, ScrapeError> {
    let fields = || -> Result<Channel, ScrapeError> {
        Ok(Channel {
            channel_id: CHANNEL_ID.extract(payload)?,
            thumbnail_url: CHANNEL_THUMBNAIL.extract(payload)?,
            title: CHANNEL_TITLE.extract(payload)?,
        })
    };
    let channel = fields().inspect_err(|error| log_malformed("channel", payload, error))?;
    tracing::debug!(channel_id = %channel.channel_id, title = %channel.title, "extracted channel");
    Ok(channel)
}

pub fn extract_video(payload: &Value) -> Result<Video, ScrapeError> {
    let fields = || -> Result<Video, ScrapeError> {
        let is_upcoming = IS_UPCOMING.extract(payload);
        // A start time only means something for a broadcast that has not started
        let scheduled_at = if is_upcoming {
            SCHEDULED_AT.extract(payload)
        } else {
            None
        };
        Ok(Video {
            video_id: VIDEO_ID.extract(payload)?,
            channel_id: VIDEO_CHANNEL_ID.extract(payload)?,
            duration: DURATION.extract(payload),
            is_live: IS_LIVE.extract(payload),
            is_live_content: IS_LIVE_CONTENT.extract(payload),
            is_upcoming,
            published_date: PUBLISHED_DATE.extract(payload)?,
            scheduled_at,
            title: VIDEO_TITLE.extract(payload)?,
        })
    };
    let video = fields().inspect_err(|error| log_malformed("video", payload, error))?;
    tracing::debug!(
        video_id = %video.video_id,
        duration = video.duration,
        is_live = video.is_live,
        is_upcoming = video.is_upcoming,
        "extracted video"
    );
    Ok(video)
}
