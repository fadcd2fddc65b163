use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use domain::{ChannelRecord, resolve_channel};
use serde::Deserialize;

use crate::{AppState, GatewayError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelParams {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /channel?channelId=…|url=…`
pub async fn get_channel(
    State(state): State<AppState>,
    query: Result<Query<ChannelParams>, QueryRejection>,
) -> Result<Json<ChannelRecord>, GatewayError> {
    let Query(params) = query?;
    tracing::info!(channel_id = ?params.channel_id, url = ?params.url, "channel request");

    let lookup = resolve_channel(params.channel_id.as_deref(), params.url.as_deref())?;
    let raw = state.fetch(&state.config().upstream.channel_url(&lookup)).await?;
    let record = scrape::scrape_channel(&raw)?;

    tracing::info!(%lookup, visible = record.is_visible(), reason = ?record.reason(), "channel resolved");
    Ok(Json(record))
}
