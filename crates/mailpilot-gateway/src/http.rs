//! JSON-over-HTTP implementation of [`Gateway`].

use std::time::Duration;

use async_trait::async_trait;
use mailpilot_core::{Action, Email, JsonObject, SubmissionResult};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::Gateway;

pub const NEW_EMAIL_PATH: &str = "/new_email";
pub const APPROVE_PATH: &str = "/action/approve";
pub const REJECT_PATH: &str = "/action/reject";
pub const MODIFY_PATH: &str = "/action/modify";

/// Transport-level ceiling; the per-command budget is enforced by the caller.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ActionRef<'a> {
    action_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ModifyRequest<'a> {
    action_id: &'a str,
    payload: &'a JsonObject,
    record_preferences: bool,
    apply_to_general_preferences: bool,
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            base_url: config.base_url(),
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let encoded = serde_json::to_vec(body).map_err(GatewayError::Encode)?;
        tracing::debug!(path, bytes = encoded.len(), "gateway request");

        let response = self
            .http
            .post(self.endpoint(path))
            .header(CONTENT_TYPE, "application/json")
            .body(encoded)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.to_owned(),
                source,
            })?;

        let status = response.status();
        let raw = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.to_owned(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "gateway rejected request");
            return Err(GatewayError::status(path, status.as_u16(), &raw));
        }

        serde_json::from_slice(&raw).map_err(GatewayError::Decode)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn submit_email(&self, email: &Email) -> Result<SubmissionResult, GatewayError> {
        self.post(NEW_EMAIL_PATH, email).await
    }

    async fn approve_action(&self, action_id: &str) -> Result<Action, GatewayError> {
        self.post(APPROVE_PATH, &ActionRef { action_id }).await
    }

    async fn reject_action(&self, action_id: &str) -> Result<Action, GatewayError> {
        self.post(REJECT_PATH, &ActionRef { action_id }).await
    }

    async fn modify_action(
        &self,
        action_id: &str,
        payload: &JsonObject,
        apply_to_general_preferences: bool,
    ) -> Result<Action, GatewayError> {
        let request = ModifyRequest {
            action_id,
            payload,
            record_preferences: true,
            apply_to_general_preferences,
        };
        self.post(MODIFY_PATH, &request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mailpilot_core::samples::lunch_thread;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[derive(Debug)]
    struct CapturedRequest {
        request_line: String,
        content_type: String,
        body: Value,
    }

    /// Accept one connection, capture the request and answer with `status`/`body`.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 2048];
            let header_end = loop {
                let n = stream.read(&mut chunk).await.expect("read");
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
            let header = |name: &str| {
                head.lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                    .map(|(_, value)| value.trim().to_owned())
                    .unwrap_or_default()
            };
            let content_length: usize = header("content-length").parse().unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).await.expect("read body");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            let _ = stream.shutdown().await;

            CapturedRequest {
                request_line: head.lines().next().unwrap_or_default().to_owned(),
                content_type: header("content-type"),
                body: serde_json::from_slice(&buf[header_end..header_end + content_length])
                    .unwrap_or(Value::Null),
            }
        });
        (format!("http://{addr}/"), handle)
    }

    fn gateway_for(base_url: String) -> HttpGateway {
        HttpGateway::new(&GatewayConfig {
            base_url: Some(base_url),
            ..GatewayConfig::default()
        })
        .expect("client")
    }

    const ACTION_JSON: &str = r#"{"action_id":"act-1","type":"draft_reply","status":"approved","payload":{"body":"ok"}}"#;

    #[tokio::test]
    async fn submit_email_posts_email_and_decodes_result() {
        let (url, server) = serve_once(
            200,
            r#"{"mail_id":"mail-1","summary":{"text":"Lunch plans"},"proposed_actions":[{"action_id":"a1","type":"draft_reply","status":"pending","payload":{}}],"classification":{"probabilities":{"social":0.9},"decisions":{"social":true}}}"#,
        )
        .await;
        let gateway = gateway_for(url);
        let email = lunch_thread().remove(0);

        let result = gateway.submit_email(&email).await.expect("submit");
        let captured = server.await.expect("server");

        assert_eq!(captured.request_line, "POST /new_email HTTP/1.1");
        assert_eq!(captured.content_type, "application/json");
        assert_eq!(captured.body["mail_id"], json!("mail-1"));
        assert_eq!(captured.body["from_email"], json!("jamie.lee@example.com"));
        assert_eq!(result.summary_text(), Some("Lunch plans"));
        assert_eq!(result.action_count(), 1);
        assert!(result.classification.is_selected("social"));
    }

    #[tokio::test]
    async fn approve_and_reject_send_action_id_only() {
        let (url, server) = serve_once(200, ACTION_JSON).await;
        let action = gateway_for(url).approve_action("act-1").await.expect("approve");
        let captured = server.await.expect("server");
        assert_eq!(captured.request_line, "POST /action/approve HTTP/1.1");
        assert_eq!(captured.body, json!({"action_id": "act-1"}));
        assert_eq!(action.status, "approved");

        let (url, server) = serve_once(200, ACTION_JSON).await;
        gateway_for(url).reject_action("act-1").await.expect("reject");
        let captured = server.await.expect("server");
        assert_eq!(captured.request_line, "POST /action/reject HTTP/1.1");
    }

    #[tokio::test]
    async fn modify_always_records_preferences() {
        let (url, server) = serve_once(200, ACTION_JSON).await;
        let mut payload = JsonObject::new();
        payload.insert("k".to_owned(), json!(1));

        gateway_for(url)
            .modify_action("act-1", &payload, true)
            .await
            .expect("modify");
        let captured = server.await.expect("server");

        assert_eq!(captured.request_line, "POST /action/modify HTTP/1.1");
        assert_eq!(
            captured.body,
            json!({
                "action_id": "act-1",
                "payload": {"k": 1},
                "record_preferences": true,
                "apply_to_general_preferences": true
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_surfaces_path_code_and_body() {
        let (url, server) = serve_once(404, r#"{"detail":"Action act-9 not found"}"#).await;
        let err = gateway_for(url)
            .approve_action("act-9")
            .await
            .expect_err("404 must fail");
        let _ = server.await;
        assert_eq!(
            err.to_string(),
            r#"post /action/approve: status 404: {"detail":"Action act-9 not found"}"#
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (url, server) = serve_once(200, r#"{"action_id": 7}"#).await;
        let err = gateway_for(url)
            .reject_action("act-1")
            .await
            .expect_err("bad body must fail");
        let _ = server.await;
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = gateway_for(format!("http://{addr}"))
            .approve_action("act-1")
            .await
            .expect_err("closed port must fail");
        assert!(matches!(err, GatewayError::Transport { .. }));
        assert!(err.to_string().starts_with("post /action/approve: "));
    }

    #[test]
    fn endpoint_joins_trimmed_base_url() {
        let gateway = gateway_for("http://backend:8000///".to_owned());
        assert_eq!(gateway.base_url(), "http://backend:8000");
        assert_eq!(gateway.endpoint(MODIFY_PATH), "http://backend:8000/action/modify");
    }
}
