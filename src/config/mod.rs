pub mod profiles;

use crate::services::aggregator::SumsSource;
use dotenvy::dotenv;
use profiles::{Profile, ProfileDefaults};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!("LOG_FORMAT must be text or json, got {:?}", other)),
        }
    }
}

/// Upstream credentials and endpoint, handed to the signing client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub current_account_id: Option<String>,
    pub max_upstream_pages: u32,
    pub sums_source: SumsSource,
    pub log_format: LogFormat,
    pub cors_allowed_origins: Option<String>,
}

pub struct ConfigInfo {
    pub config: Config,
    pub profile: Profile,
    pub overrides: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<ConfigInfo> {
        dotenv().ok();
        Self::from_lookup(Profile::from_env(), |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(profile: Profile, lookup: F) -> anyhow::Result<ConfigInfo>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProfileDefaults::for_profile(profile);
        let mut overrides = Vec::new();

        let mut var = |key: &str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_some() {
                overrides.push(key.to_string());
            }
            value
        };

        let api_key = var("YAYA_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("YAYA_API_KEY must be set"))?;
        let api_secret = var("YAYA_API_SECRET")
            .ok_or_else(|| anyhow::anyhow!("YAYA_API_SECRET must be set"))?;

        let base_url = var("YAYA_BASE_URL")
            .or(defaults.base_url)
            .ok_or_else(|| {
                anyhow::anyhow!("YAYA_BASE_URL must be set for the {} profile", profile.as_str())
            })?;
        url::Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("YAYA_BASE_URL is not a valid URL: {}", e))?;

        let current_account_id = var("CURRENT_USER_ACCOUNT_ID");

        let port = match var("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {:?}", v))?,
            None => defaults.port,
        };

        let max_upstream_pages = match var("MAX_UPSTREAM_PAGES") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| anyhow::anyhow!("MAX_UPSTREAM_PAGES must be at least 1, got {:?}", v))?,
            None => defaults.max_upstream_pages,
        };

        let sums_source = match var("SUMS_SOURCE") {
            Some(v) => v.parse()?,
            None => SumsSource::default(),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => defaults.log_format,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS");

        Ok(ConfigInfo {
            config: Config {
                port,
                upstream: UpstreamConfig {
                    base_url,
                    api_key,
                    api_secret,
                },
                current_account_id,
                max_upstream_pages,
                sums_source,
                log_format,
                cors_allowed_origins,
            },
            profile,
            overrides,
        })
    }

    /// Human readable summary with the credentials redacted.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("port", self.port.to_string()),
            ("base_url", self.upstream.base_url.clone()),
            ("api_key", redact(&self.upstream.api_key)),
            ("api_secret", redact(&self.upstream.api_secret)),
            (
                "current_account_id",
                self.current_account_id
                    .clone()
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            ("max_upstream_pages", self.max_upstream_pages.to_string()),
            ("sums_source", self.sums_source.as_str().to_string()),
            (
                "log_format",
                match self.log_format {
                    LogFormat::Text => "text".to_string(),
                    LogFormat::Json => "json".to_string(),
                },
            ),
            (
                "cors_allowed_origins",
                self.cors_allowed_origins
                    .clone()
                    .unwrap_or_else(|| "*".to_string()),
            ),
        ]
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "missing".to_string()
    } else {
        "configured".to_string()
    }
}
