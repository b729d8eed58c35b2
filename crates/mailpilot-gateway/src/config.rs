//! Gateway address and request budget.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub scheme: String,
    /// Full base URL; takes precedence over host/port/scheme when set.
    pub base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            scheme: DEFAULT_SCHEME.to_owned(),
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Effective base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> String {
        let url = match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_owned(),
            _ => format!("{}://{}:{}", self.scheme, self.host, self.port),
        };
        url.trim_end_matches('/').to_owned()
    }

    /// Validates the configuration, returning an error message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("request timeout must be at least 1s".into());
        }
        if let Some(url) = self.base_url.as_deref() {
            let url = url.trim();
            if !url.is_empty() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("base url {url:?} must start with http:// or https://"));
                }
                return Ok(());
            }
        }
        match self.scheme.as_str() {
            "http" | "https" => {}
            other => return Err(format!("scheme must be http or https (got {other:?})")),
        }
        if self.host.trim().is_empty() {
            return Err("host is required".into());
        }
        if self.port == 0 {
            return Err("port must be between 1 and 65535".into());
        }
        Ok(())
    }
}
