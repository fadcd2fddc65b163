use async_trait::async_trait;
use domain::{ChannelLookup, VideoId};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
pub const DEFAULT_CLIENT_NAME: &str = "1";
pub const DEFAULT_CLIENT_VERSION: &str = "2.20200214.04.00";

const CLIENT_NAME_HEADER: &str = "X-YouTube-Client-Name";
const CLIENT_VERSION_HEADER: &str = "X-YouTube-Client-Version";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("upstream rate limited the request")]
    RateLimited,
    #[error("upstream responded with status {status}")]
    Upstream { status: u16, body: String },
    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream body is not json: {source}")]
    InvalidBody {
        source: serde_json::Error,
        body: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("upstream base url {0} cannot carry a path")]
pub struct BaseUrlError(pub String);

/// Abstraction over the outbound request so handlers can be exercised without a network
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `target` and return its body as untyped JSON
    async fn fetch(&self, target: &Url) -> Result<Value, FetchError>;
}

/// Base url of the upstream site, fixed at process start
#[derive(Debug, Clone)]
pub struct UpstreamBase(Url);

impl UpstreamBase {
    pub fn new(url: Url) -> Result<Self, BaseUrlError> {
        if url.cannot_be_a_base() {
            return Err(BaseUrlError(url.to_string()));
        }
        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    fn with_segments<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.0.clone();
        url.set_query(None);
        // Always Ok: cannot-be-a-base urls are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Channel page in its JSON (`pbj=1`) form
    pub fn channel_url(&self, lookup: &ChannelLookup) -> Url {
        let mut url = self.with_segments(lookup.path_segments());
        url.query_pairs_mut().append_pair("pbj", "1");
        url
    }

    /// Watch page in its JSON (`pbj=1`) form
    pub fn video_url(&self, id: &VideoId) -> Url {
        let mut url = self.with_segments(["watch"]);
        url.query_pairs_mut()
            .append_pair("v", id.as_str())
            .append_pair("pbj", "1");
        url
    }
}

/// Fetcher backed by reqwest, sending the client headers that make the
/// upstream answer with JSON instead of an HTML page
pub struct HttpFetcher {
    client: reqwest::Client,
    client_name: String,
    client_version: String,
}

impl HttpFetcher {
    pub fn new(client_name: impl Into<String>, client_version: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_name: client_name.into(),
            client_version: client_version.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_NAME, DEFAULT_CLIENT_VERSION)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Url) -> Result<Value, FetchError> {
        tracing::debug!(%target, "fetching upstream");
        let response = self
            .client
            .get(target.clone())
            .header(CLIENT_NAME_HEADER, &self.client_name)
            .header(CLIENT_VERSION_HEADER, &self.client_version)
            .send()
            .await
            .inspect_err(|error| tracing::warn!(%target, %error, "upstream transport failure"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%target, status = status.as_u16(), body = %body, "failed to get data");
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(FetchError::RateLimited);
            }
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| {
            tracing::error!(%target, body = %body, "upstream body is not json");
            FetchError::InvalidBody { source, body }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode as AxumStatus, routing::get};
    use serde_json::json;
    use std::net::SocketAddr;

    async fn echo_headers(headers: HeaderMap) -> Json<Value> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Json(json!({
            "name": read(CLIENT_NAME_HEADER),
            "version": read(CLIENT_VERSION_HEADER),
        }))
    }

    async fn spawn_upstream() -> SocketAddr {
        let app = Router::new()
            .route("/headers", get(echo_headers))
            .route("/limited", get(|| async { (AxumStatus::TOO_MANY_REQUESTS, "slow down") }))
            .route("/broken", get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }))
            .route("/html", get(|| async { "<html></html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn target(addr: SocketAddr, path: &str) -> Url {
        Url::parse(&format!("http://{addr}{path}")).unwrap()
    }

    #[tokio::test]
    async fn sends_client_headers_and_parses_json() {
        let addr = spawn_upstream().await;
        let fetcher = HttpFetcher::new("1", "2.20200214.04.00");
        let body = fetcher.fetch(&target(addr, "/headers")).await.unwrap();
        assert_eq!(body, json!({ "name": "1", "version": "2.20200214.04.00" }));
    }

    #[tokio::test]
    async fn classifies_status_failures() {
        let addr = spawn_upstream().await;
        let fetcher = HttpFetcher::default();

        let limited = fetcher.fetch(&target(addr, "/limited")).await.unwrap_err();
        assert!(matches!(limited, FetchError::RateLimited));

        let broken = fetcher.fetch(&target(addr, "/broken")).await.unwrap_err();
        assert!(matches!(broken, FetchError::Upstream { status: 500, ref body } if body == "boom"));

        let missing = fetcher.fetch(&target(addr, "/nope")).await.unwrap_err();
        assert!(matches!(missing, FetchError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_reported() {
        let addr = spawn_upstream().await;
        let err = HttpFetcher::default()
            .fetch(&target(addr, "/html"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidBody { ref body, .. } if body == "<html></html>"));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = HttpFetcher::default()
            .fetch(&target(addr, "/"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn builds_channel_and_video_targets() {
        let base = UpstreamBase::new(Url::parse(DEFAULT_BASE_URL).unwrap()).unwrap();
        assert_eq!(
            base.channel_url(&ChannelLookup::Id("UC1".into())).as_str(),
            "https://www.youtube.com/channel/UC1?pbj=1"
        );
        assert_eq!(
            base.channel_url(&ChannelLookup::Handle("me".into())).as_str(),
            "https://www.youtube.com/@me?pbj=1"
        );
        assert_eq!(
            base.channel_url(&ChannelLookup::Vanity("SomeVanity".into())).as_str(),
            "https://www.youtube.com/SomeVanity?pbj=1"
        );
        assert_eq!(
            base.video_url(&VideoId("abc123".into())).as_str(),
            "https://www.youtube.com/watch?v=abc123&pbj=1"
        );
    }

    #[test]
    fn explicit_ids_are_escaped_into_the_path() {
        let base = UpstreamBase::new(Url::parse("http://127.0.0.1:9000/proxy/").unwrap()).unwrap();
        assert_eq!(
            base.channel_url(&ChannelLookup::Id("a/b".into())).as_str(),
            "http://127.0.0.1:9000/proxy/channel/a%2Fb?pbj=1"
        );
    }

    #[test]
    fn rejects_cannot_be_a_base_urls() {
        assert!(UpstreamBase::new(Url::parse("mailto:someone@example.com").unwrap()).is_err());
    }
}
