//! Older single-purpose routes kept for existing callers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use domain::{Record, resolve_channel, resolve_video};
use serde::{Deserialize, Serialize};

use crate::{AppState, GatewayError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationParams {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DurationBody {
    pub duration: u64,
    /// Whether the video is or was a live broadcast
    pub live: bool,
    pub upcoming: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailParams {
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ThumbnailBody {
    pub thumbnail: String,
}

/// `GET /duration?videoId=…`
pub async fn get_duration(
    State(state): State<AppState>,
    query: Result<Query<DurationParams>, QueryRejection>,
) -> Result<Json<DurationBody>, GatewayError> {
    let Query(params) = query?;
    let id = resolve_video(params.video_id.as_deref(), None)?;
    let raw = state.fetch(&state.config().upstream.video_url(&id)).await?;

    match scrape::scrape_video(&raw)? {
        Record::Visible(video) => {
            let body = DurationBody {
                duration: video.duration,
                live: video.is_live_content,
                upcoming: video.is_upcoming,
            };
            tracing::info!(video_id = %id, ?body, "duration");
            Ok(Json(body))
        }
        Record::NotVisible(reason) => Err(GatewayError::NotVisible(reason)),
    }
}

/// `GET /thumbnail?channelId=…`
pub async fn get_thumbnail(
    State(state): State<AppState>,
    query: Result<Query<ThumbnailParams>, QueryRejection>,
) -> Result<Json<ThumbnailBody>, GatewayError> {
    let Query(params) = query?;
    let lookup = resolve_channel(params.channel_id.as_deref(), None)?;
    let raw = state.fetch(&state.config().upstream.channel_url(&lookup)).await?;

    match scrape::scrape_channel(&raw)? {
        Record::Visible(channel) => {
            tracing::info!(%lookup, thumbnail = %channel.thumbnail_url, "thumbnail");
            Ok(Json(ThumbnailBody {
                thumbnail: channel.thumbnail_url,
            }))
        }
        Record::NotVisible(reason) => Err(GatewayError::NotVisible(reason)),
    }
}
