use std::time::Duration;

use thiserror::Error;

/// Failure of a single gateway call.
///
/// The `Display` text is what the operator sees on the error screen.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("post {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("post {path}: status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
    #[error("decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("request timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },
}

impl GatewayError {
    pub(crate) fn status(path: &str, status: u16, raw_body: &[u8]) -> Self {
        Self::Status {
            path: path.to_owned(),
            status,
            body: String::from_utf8_lossy(raw_body).trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_trims_body() {
        let err = GatewayError::status("/action/approve", 404, b"  {\"detail\":\"missing\"}\n");
        assert_eq!(
            err.to_string(),
            "post /action/approve: status 404: {\"detail\":\"missing\"}"
        );
    }

    #[test]
    fn timeout_reports_whole_seconds() {
        let err = GatewayError::Timeout {
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn decode_error_is_prefixed() {
        let source = serde_json::from_str::<serde_json::Value>("{").err();
        let Some(source) = source else {
            panic!("expected parse failure");
        };
        let err = GatewayError::Decode(source);
        assert!(err.to_string().starts_with("decode response: "));
    }
}
