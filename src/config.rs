use anyhow::{Context, Result};

use crate::shortener::ShortenerSettings;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Base URL short codes are appended to, e.g. "http://localhost:3000".
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// Minutes a new short URL stays valid when the form does not say otherwise.
    pub default_validity_minutes: u32,

    /// How many entries the "Recent URLs" list shows.
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            base_url: "http://localhost:3000".into(),
            default_validity_minutes: 30,
            recent_limit: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let base_url = lookup("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        let default_validity_minutes = lookup("DEFAULT_VALIDITY_MINUTES")
            .unwrap_or_else(|| "30".into())
            .parse::<u32>()
            .context("DEFAULT_VALIDITY_MINUTES must be a whole number of minutes")?;
        if default_validity_minutes == 0 {
            anyhow::bail!("DEFAULT_VALIDITY_MINUTES must be at least 1");
        }

        let recent_limit = lookup("RECENT_LIMIT")
            .unwrap_or_else(|| "3".into())
            .parse::<usize>()
            .context("RECENT_LIMIT must be a positive number")?;
        if recent_limit == 0 {
            anyhow::bail!("RECENT_LIMIT must be at least 1");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            base_url,
            default_validity_minutes,
            recent_limit,
        })
    }

    pub fn shortener_settings(&self) -> ShortenerSettings {
        ShortenerSettings {
            base_url: self.base_url.clone(),
            default_validity: self.default_validity_minutes,
            recent_limit: self.recent_limit,
        }
    }
}
