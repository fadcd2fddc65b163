use std::fmt;

use url::Url;

/// Hosts of the second platform; recognised so they fail loudly instead of
/// being scraped as if they were YouTube paths
const TWITCH_HOSTS: &[&str] = &["twitch.tv", "www.twitch.tv", "m.twitch.tv"];

const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("missing id or url")]
    Missing,
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unrecognized url path: {0}")]
    UnrecognizedPath(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// How a channel is looked up upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    /// `/channel/{id}`
    Id(String),
    /// `/c/{name}`
    Custom(String),
    /// `/user/{name}`
    Username(String),
    /// `/@{handle}`, stored without the `@`
    Handle(String),
    /// Legacy `/{name}` vanity path
    Vanity(String),
}

impl ChannelLookup {
    /// Path segments of the equivalent page on the upstream site
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            ChannelLookup::Id(id) => vec!["channel".to_string(), id.clone()],
            ChannelLookup::Custom(name) => vec!["c".to_string(), name.clone()],
            ChannelLookup::Username(name) => vec!["user".to_string(), name.clone()],
            ChannelLookup::Handle(handle) => vec![format!("@{handle}")],
            ChannelLookup::Vanity(name) => vec![name.clone()],
        }
    }
}

impl fmt::Display for ChannelLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path_segments().join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Treats an empty query value the same as an absent one
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_handle_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Resolves the channel identifier of a request.
///
/// An explicit id wins and is used verbatim; otherwise the url path must be one of
/// `/channel/{id}`, `/c/{name}`, `/user/{name}`, `/@{handle}` or a bare `/{name}`
/// other than `/watch`.
pub fn resolve_channel(
    channel_id: Option<&str>,
    url: Option<&str>,
) -> Result<ChannelLookup, IdentifierError> {
    if let Some(id) = non_empty(channel_id) {
        tracing::debug!(channel_id = id, "using explicit channel id");
        return Ok(ChannelLookup::Id(id.to_string()));
    }
    let Some(raw) = non_empty(url) else {
        tracing::info!("missing channelId or url");
        return Err(IdentifierError::Missing);
    };

    let parsed = Url::parse(raw)?;
    if let Some(host) = parsed.host_str() {
        if TWITCH_HOSTS.contains(&host) {
            return Err(IdentifierError::UnsupportedPlatform(host.to_string()));
        }
    }

    let path = parsed.path();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let lookup = match segments.as_slice() {
        ["channel", id] if is_name_segment(id) => ChannelLookup::Id(id.to_string()),
        ["c", name] if is_name_segment(name) => ChannelLookup::Custom(name.to_string()),
        ["user", name] if is_name_segment(name) => ChannelLookup::Username(name.to_string()),
        [single] => match single.strip_prefix('@') {
            Some(handle) if is_handle_segment(handle) => ChannelLookup::Handle(handle.to_string()),
            None if *single != "watch" && is_name_segment(single) => {
                ChannelLookup::Vanity(single.to_string())
            }
            _ => return Err(IdentifierError::UnrecognizedPath(path.to_string())),
        },
        _ => return Err(IdentifierError::UnrecognizedPath(path.to_string())),
    };
    tracing::debug!(url = raw, %lookup, "resolved channel url");
    Ok(lookup)
}

/// Resolves the video identifier of a request.
///
/// An explicit id wins; otherwise the url must be `/watch?v={id}` or a short link
/// whose single path segment is the id.
pub fn resolve_video(video_id: Option<&str>, url: Option<&str>) -> Result<VideoId, IdentifierError> {
    if let Some(id) = non_empty(video_id) {
        tracing::debug!(video_id = id, "using explicit video id");
        return Ok(VideoId(id.to_string()));
    }
    let Some(raw) = non_empty(url) else {
        tracing::info!("missing videoId or url");
        return Err(IdentifierError::Missing);
    };

    let parsed = Url::parse(raw)?;
    let path = parsed.path();

    let is_short_link = parsed
        .host_str()
        .is_some_and(|host| SHORT_LINK_HOSTS.contains(&host));
    if is_short_link {
        let id = path.trim_start_matches('/');
        if is_name_segment(id) {
            return Ok(VideoId(id.to_string()));
        }
        return Err(IdentifierError::UnrecognizedPath(path.to_string()));
    }

    if path == "/watch" {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        if let Some(id) = id {
            return Ok(VideoId(id));
        }
    }

    Err(IdentifierError::UnrecognizedPath(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_channel_id_is_used_verbatim() {
        // Not url-shaped on purpose: no parsing may happen
        let lookup = resolve_channel(Some("not a url %%"), Some("garbage")).unwrap();
        assert_eq!(lookup, ChannelLookup::Id("not a url %%".to_string()));
    }

    #[test]
    fn channel_url_shapes() {
        let cases = [
            (
                "https://www.youtube.com/channel/UCabc_-123",
                ChannelLookup::Id("UCabc_-123".to_string()),
            ),
            (
                "https://www.youtube.com/c/SomeName",
                ChannelLookup::Custom("SomeName".to_string()),
            ),
            (
                "https://youtube.com/user/legacy_user",
                ChannelLookup::Username("legacy_user".to_string()),
            ),
            (
                "https://www.youtube.com/@some.handle",
                ChannelLookup::Handle("some.handle".to_string()),
            ),
            (
                "https://www.youtube.com/SomeVanity",
                ChannelLookup::Vanity("SomeVanity".to_string()),
            ),
        ];
        for (url, expected) in cases {
            assert_eq!(resolve_channel(None, Some(url)).unwrap(), expected, "{url}");
        }
    }

    #[test]
    fn other_channel_paths_are_rejected() {
        for url in [
            "https://www.youtube.com/watch?v=abc",
            "https://www.youtube.com/channel/",
            "https://www.youtube.com/channel/UC1/videos",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/plain.name",
            "https://www.youtube.com/@",
            "https://www.youtube.com/",
        ] {
            assert!(
                matches!(
                    resolve_channel(None, Some(url)),
                    Err(IdentifierError::UnrecognizedPath(_))
                ),
                "{url}"
            );
        }
    }

    #[test]
    fn missing_or_empty_identifiers() {
        assert_eq!(resolve_channel(None, None), Err(IdentifierError::Missing));
        assert_eq!(resolve_channel(Some(""), Some("")), Err(IdentifierError::Missing));
        assert_eq!(resolve_video(None, None), Err(IdentifierError::Missing));
    }

    #[test]
    fn unparseable_url_is_an_identifier_error() {
        assert!(matches!(
            resolve_channel(None, Some("not a url")),
            Err(IdentifierError::Url(_))
        ));
    }

    #[test]
    fn twitch_channels_are_unsupported() {
        assert_eq!(
            resolve_channel(None, Some("https://www.twitch.tv/somestreamer")),
            Err(IdentifierError::UnsupportedPlatform("www.twitch.tv".to_string()))
        );
    }

    #[test]
    fn lookup_paths() {
        assert_eq!(ChannelLookup::Id("UC1".into()).to_string(), "/channel/UC1");
        assert_eq!(ChannelLookup::Handle("me".into()).to_string(), "/@me");
        assert_eq!(ChannelLookup::Username("u".into()).to_string(), "/user/u");
        assert_eq!(ChannelLookup::Vanity("name".into()).to_string(), "/name");
    }

    #[test]
    fn video_url_shapes() {
        assert_eq!(
            resolve_video(None, Some("https://www.youtube.com/watch?v=abc123&t=10")).unwrap(),
            VideoId("abc123".to_string())
        );
        assert_eq!(
            resolve_video(None, Some("https://youtu.be/abc123")).unwrap(),
            VideoId("abc123".to_string())
        );
        assert_eq!(
            resolve_video(Some("explicit"), Some("https://youtu.be/abc123")).unwrap(),
            VideoId("explicit".to_string())
        );
    }

    #[test]
    fn other_video_urls_are_rejected() {
        for url in [
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/channel/UC1",
            "https://youtu.be/",
            "https://youtu.be/a/b",
        ] {
            assert!(
                matches!(
                    resolve_video(None, Some(url)),
                    Err(IdentifierError::UnrecognizedPath(_))
                ),
                "{url}"
            );
        }
    }
}
