//! Configuration module
//!
//! Client settings are read from the environment (a `.env` file is loaded first when
//! present). Every value has a default so a bare `ClientConfig::from_env()` works
//! against the production API.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_CDN_DOMAIN, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PAGE_SIZE,
    SESSION_DIR_NAME, SESSION_FILE_NAME,
};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub cdn_domain: String,
    pub session_path: PathBuf,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cdn_domain: DEFAULT_CDN_DOMAIN.to_string(),
            session_path: default_session_path(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load from LEAKHERE_API_URL, LEAKHERE_CDN_DOMAIN, LEAKHERE_SESSION_PATH,
    /// LEAKHERE_PAGE_SIZE and LEAKHERE_CONNECT_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_url = env::var("LEAKHERE_API_URL").unwrap_or(defaults.api_url);
        let cdn_domain = env::var("LEAKHERE_CDN_DOMAIN").unwrap_or(defaults.cdn_domain);
        let session_path = env::var("LEAKHERE_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let page_size = match env::var("LEAKHERE_PAGE_SIZE") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("LEAKHERE_PAGE_SIZE must be a number, got {raw}"))?,
            Err(_) => defaults.page_size,
        };

        let connect_timeout_secs = match env::var("LEAKHERE_CONNECT_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().with_context(|| {
                format!("LEAKHERE_CONNECT_TIMEOUT_SECS must be a number, got {raw}")
            })?,
            Err(_) => defaults.connect_timeout_secs,
        };

        let config = Self {
            api_url,
            cdn_domain,
            session_path,
            page_size,
            connect_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!("API URL must start with http:// or https://: {}", self.api_url);
        }
        if self.page_size == 0 {
            anyhow::bail!("Page size must be greater than zero");
        }
        Ok(())
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn default_session_path() -> PathBuf {
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    home.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME)
}
