use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use domain::{VideoRecord, resolve_video};
use serde::Deserialize;

use crate::{AppState, GatewayError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParams {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /video?videoId=…|url=…`
pub async fn get_video(
    State(state): State<AppState>,
    query: Result<Query<VideoParams>, QueryRejection>,
) -> Result<Json<VideoRecord>, GatewayError> {
    let Query(params) = query?;
    tracing::info!(video_id = ?params.video_id, url = ?params.url, "video request");

    let id = resolve_video(params.video_id.as_deref(), params.url.as_deref())?;
    let raw = state.fetch(&state.config().upstream.video_url(&id)).await?;
    let record = scrape::scrape_video(&raw)?;

    tracing::info!(video_id = %id, visible = record.is_visible(), reason = ?record.reason(), "video resolved");
    Ok(Json(record))
}
