//! Client settings and their validation.
//!
//! Every key is optional; missing keys fall back to the defaults below.

use crate::domain::error::StockdeskError;
use crate::ports::config_port::ConfigPort;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHART_WIDTH: u32 = 800;
pub const DEFAULT_CHART_HEIGHT: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and authority, no trailing slash.
    pub base_url: String,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub chart: ChartSize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            chart: ChartSize::default(),
        }
    }
}

impl ClientConfig {
    /// Replace the base URL, applying the same validation as the file setting.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, StockdeskError> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }
}

pub fn build_client_config(config: &dyn ConfigPort) -> Result<ClientConfig, StockdeskError> {
    let defaults = ClientConfig::default();

    let base_url = match config.get_string("api", "base_url") {
        Some(raw) => validate_base_url(&raw)?,
        None => defaults.base_url,
    };

    let timeout = match read_u64(config, "api", "timeout_secs")? {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => defaults.timeout,
    };

    let width = read_dimension(config, "width")?.unwrap_or(DEFAULT_CHART_WIDTH);
    let height = read_dimension(config, "height")?.unwrap_or(DEFAULT_CHART_HEIGHT);

    Ok(ClientConfig {
        base_url,
        timeout,
        chart: ChartSize { width, height },
    })
}

fn validate_base_url(raw: &str) -> Result<String, StockdeskError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let host = trimmed.split("://").nth(1).unwrap_or("");
    if !has_scheme || host.is_empty() {
        return Err(StockdeskError::ConfigInvalid {
            section: "api".into(),
            key: "base_url".into(),
            reason: format!("expected http:// or https:// URL, got '{}'", raw.trim()),
        });
    }
    Ok(trimmed.to_string())
}

fn read_u64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<u64>, StockdeskError> {
    config
        .get_u64(section, key)
        .transpose()
        .map_err(|reason| StockdeskError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason,
        })
}

fn read_dimension(config: &dyn ConfigPort, key: &str) -> Result<Option<u32>, StockdeskError> {
    let invalid = |reason: String| StockdeskError::ConfigInvalid {
        section: "chart".into(),
        key: key.into(),
        reason,
    };
    match read_u64(config, "chart", key)? {
        None => Ok(None),
        Some(0) => Err(invalid("must be positive".into())),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| invalid(format!("{v} is too large"))),
    }
}
