use std::sync::Arc;

use axum::{Router, http::StatusCode, middleware, routing::get};
use mitigation::{ColdStartNotifier, notify_detached};
use serde_json::Value;
use upstream::{FetchError, Fetcher, UpstreamBase};
use url::Url;

mod auth;
mod channel;
mod error;
mod legacy;
mod video;

pub use error::GatewayError;

/// Settings fixed at process start
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Shared secret every request must carry as `?token=`
    pub token: String,
    pub upstream: UpstreamBase,
    /// Name handed to the cold start collaborator
    pub instance: String,
}

/// State shared by all handlers; read-only after construction
#[derive(Clone)]
pub struct AppState {
    config: Arc<GatewayConfig>,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn ColdStartNotifier>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn ColdStartNotifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            notifier,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Fetches `target`, kicking off the cold start request when the upstream throttles us.
    /// The request itself still fails; it is never retried here.
    async fn fetch(&self, target: &Url) -> Result<Value, GatewayError> {
        match self.fetcher.fetch(target).await {
            Ok(raw) => Ok(raw),
            Err(FetchError::RateLimited) => {
                tracing::warn!(%target, instance = %self.config.instance, "rate limited by upstream");
                notify_detached(self.notifier.clone(), self.config.instance.clone());
                Err(FetchError::RateLimited.into())
            }
            Err(error) => Err(error.into()),
        }
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Create the router for the gateway; the token check wraps every route including the fallback
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/channel", get(channel::get_channel))
        .route("/video", get(video::get_video))
        .route("/duration", get(legacy::get_duration))
        .route("/thumbnail", get(legacy::get_thumbnail))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_token))
        .with_state(state)
}
