use super::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Staging,
    Production,
}

impl Profile {
    pub fn from_env() -> Self {
        std::env::var("APP_PROFILE")
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or(Self::Development)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "staging" | "stage" => Some(Self::Staging),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

pub const SANDBOX_BASE_URL: &str = "https://sandbox.yayawallet.com";

#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    pub port: u16,
    /// `None` means the base URL must be supplied explicitly.
    pub base_url: Option<String>,
    pub log_format: LogFormat,
    pub max_upstream_pages: u32,
}

impl ProfileDefaults {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Development => Self {
                port: 5000,
                base_url: Some(SANDBOX_BASE_URL.to_string()),
                log_format: LogFormat::Text,
                max_upstream_pages: 10,
            },
            Profile::Staging => Self {
                port: 8080,
                base_url: Some(SANDBOX_BASE_URL.to_string()),
                log_format: LogFormat::Json,
                max_upstream_pages: 10,
            },
            Profile::Production => Self {
                port: 8080,
                base_url: None,
                log_format: LogFormat::Json,
                max_upstream_pages: 10,
            },
        }
    }
}
