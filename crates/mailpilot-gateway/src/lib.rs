//! mailpilot-gateway: client side of the review backend.
//!
//! The [`Gateway`] trait is the only surface the TUI depends on; [`HttpGateway`]
//! implements it over JSON/HTTP with `reqwest`.

pub mod config;
pub mod error;
pub mod http;

use async_trait::async_trait;
use mailpilot_core::{Action, Email, JsonObject, SubmissionResult};

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpGateway;

/// Backend operations consumed by the review client.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Submit an email for processing. Not idempotent; called once per displayed email.
    async fn submit_email(&self, email: &Email) -> Result<SubmissionResult, GatewayError>;

    async fn approve_action(&self, action_id: &str) -> Result<Action, GatewayError>;

    async fn reject_action(&self, action_id: &str) -> Result<Action, GatewayError>;

    /// Replace an action's payload. Preferences are always recorded server-side;
    /// `apply_to_general_preferences` selects global instead of per-recipient scope.
    async fn modify_action(
        &self,
        action_id: &str,
        payload: &JsonObject,
        apply_to_general_preferences: bool,
    ) -> Result<Action, GatewayError>;
}
