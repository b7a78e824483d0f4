use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::lifecycle::PollPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Prediction service
    pub api_url: String,
    pub request_timeout_seconds: u64,

    // Status polling
    pub poll_interval_ms: u64,
    pub poll_max_attempts: Option<u32>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::parse(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));

        // Prediction service
        let api_url =
            env::var("ESTIMATOR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url)
            .with_context(|| format!("ESTIMATOR_API_URL is not a valid URL: {api_url}"))?;
        let request_timeout_seconds = env::var("ESTIMATOR_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Status polling
        let poll_interval_ms = env::var("ESTIMATOR_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);
        // 0 or unset means poll until the service reports a terminal status
        let poll_max_attempts = env::var("ESTIMATOR_POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0);

        Ok(Settings {
            env,
            api_url,
            request_timeout_seconds,
            poll_interval_ms,
            poll_max_attempts,
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }
}
