use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use gateway_service::GatewayConfig;
use upstream::{DEFAULT_BASE_URL, DEFAULT_CLIENT_NAME, DEFAULT_CLIENT_VERSION, UpstreamBase};
use url::Url;

fn non_empty(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(value.to_string())
}

/// Token-gated gateway for YouTube channel and video metadata
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Shared secret every request must pass as `?token=`
    #[arg(long, env = "TOKEN", hide_env_values = true, value_parser = non_empty)]
    pub token: String,

    /// Base url of the scraped site
    #[arg(long, env = "UPSTREAM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_base_url: Url,

    /// Value of the X-YouTube-Client-Name header
    #[arg(long, env = "YOUTUBE_CLIENT_NAME", default_value = DEFAULT_CLIENT_NAME)]
    pub client_name: String,

    /// Value of the X-YouTube-Client-Version header
    #[arg(long, env = "YOUTUBE_CLIENT_VERSION", default_value = DEFAULT_CLIENT_VERSION)]
    pub client_version: String,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Endpoint asked to recycle this instance when the upstream rate limits us.
    /// Without it the request is only logged.
    #[arg(long, env = "COLD_START_WEBHOOK")]
    pub cold_start_webhook: Option<Url>,

    /// Identity reported to the cold start endpoint; a random one is generated when absent
    #[arg(long, env = "INSTANCE_NAME")]
    pub instance_name: Option<String>,
}

impl Config {
    pub fn gateway_config(&self) -> anyhow::Result<GatewayConfig> {
        let upstream = UpstreamBase::new(self.upstream_base_url.clone())
            .context("invalid upstream base url")?;
        let instance = self
            .instance_name
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Ok(GatewayConfig {
            token: self.token.clone(),
            upstream,
            instance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_gateway_config() {
        let config = Config::try_parse_from([
            "server",
            "--token",
            "secret",
            "--upstream-base-url",
            "http://127.0.0.1:9000/",
            "--listen",
            "127.0.0.1:3000",
            "--instance-name",
            "gateway-1",
        ])
        .unwrap();
        assert_eq!(config.listen, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());

        let gateway = config.gateway_config().unwrap();
        assert_eq!(gateway.token, "secret");
        assert_eq!(gateway.instance, "gateway-1");
        assert_eq!(gateway.upstream.url().as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(Config::try_parse_from(["server", "--token", ""]).is_err());
    }

    #[test]
    fn instance_name_is_generated_when_missing() {
        let mut config = Config::try_parse_from(["server", "--token", "secret"]).unwrap();
        config.instance_name = None;
        let first = config.gateway_config().unwrap().instance;
        let second = config.gateway_config().unwrap().instance;
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let mut config = Config::try_parse_from(["server", "--token", "secret"]).unwrap();
        config.upstream_base_url = Url::parse("mailto:ops@example.com").unwrap();
        assert!(config.gateway_config().is_err());
    }
}
