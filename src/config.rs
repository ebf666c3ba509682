use std::time::Duration;

use crate::error::{ChooseeError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/v1";
const DEFAULT_POLL_INTERVAL_MS: u64 = 15_000;
const DEFAULT_MAX_REFRESH_COUNT: u32 = 20;

/// Settings read from the process environment (and an optional `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub max_refresh_count: u32,
    pub id_token: Option<String>,
    pub user_id: Option<String>,
    pub recaptcha_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty("CHOOSEE_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let poll_interval_ms = match non_empty("CHOOSEE_POLL_INTERVAL_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ChooseeError::Config(format!("CHOOSEE_POLL_INTERVAL_MS={}: {}", raw, e))
            })?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };

        let max_refresh_count = match non_empty("CHOOSEE_MAX_REFRESH_COUNT") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                ChooseeError::Config(format!("CHOOSEE_MAX_REFRESH_COUNT={}: {}", raw, e))
            })?,
            None => DEFAULT_MAX_REFRESH_COUNT,
        };

        Ok(Self {
            api_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_refresh_count,
            id_token: non_empty("CHOOSEE_ID_TOKEN"),
            user_id: non_empty("CHOOSEE_USER_ID"),
            recaptcha_token: non_empty("CHOOSEE_RECAPTCHA_TOKEN"),
        })
    }
}
