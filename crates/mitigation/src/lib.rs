//! Port to the external "force cold start" collaborator.
//!
//! When the upstream starts throttling, the running instance asks for a fresh
//! execution environment. The request is fire-and-forget: it never blocks the
//! response and its failures are only logged.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use url::Url;

/// Upper bound on one cold start request, so a hung endpoint cannot pile up
/// detached tasks while the upstream keeps throttling
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("cold start request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cold start endpoint responded with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait ColdStartNotifier: Send + Sync {
    /// Ask for the instance named `identity` to be replaced
    async fn notify_rate_limited(&self, identity: &str) -> Result<(), NotifyError>;
}

/// Notifier used when no endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ColdStartNotifier for LogNotifier {
    async fn notify_rate_limited(&self, identity: &str) -> Result<(), NotifyError> {
        tracing::warn!(
            instance = identity,
            timestamp = %Utc::now().to_rfc3339(),
            "force cold start requested but no endpoint is configured"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ColdStartRequest<'a> {
    instance: &'a str,
    timestamp: String,
}

/// Posts `{"instance", "timestamp"}` to an operator-provided endpoint.
///
/// The timestamp changes on every call, so the receiver can use it to force a
/// configuration change on the instance.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Url,
}

impl WebhookNotifier {
    pub fn new(endpoint: Url) -> Result<Self, NotifyError> {
        Self::with_timeout(endpoint, DEFAULT_NOTIFY_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ColdStartNotifier for WebhookNotifier {
    async fn notify_rate_limited(&self, identity: &str) -> Result<(), NotifyError> {
        let request = ColdStartRequest {
            instance: identity,
            timestamp: Utc::now().to_rfc3339(),
        };
        tracing::info!(instance = identity, timestamp = %request.timestamp, "force cold start");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Spawn the notification without waiting for it
pub fn notify_detached(notifier: Arc<dyn ColdStartNotifier>, identity: String) {
    tokio::spawn(async move {
        if let Err(error) = notifier.notify_rate_limited(&identity).await {
            tracing::warn!(instance = %identity, %error, "force cold start failed");
        }
    });
}
