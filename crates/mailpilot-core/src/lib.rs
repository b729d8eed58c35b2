//! mailpilot-core: domain model shared by the mailpilot gateway and TUI crates.
//!
//! Holds the wire-compatible email/action/classification types and the
//! built-in sample thread the review client walks through.

pub mod models;
pub mod samples;

pub use models::{Action, Classification, Email, JsonObject, SubmissionResult, Summary};
pub use samples::SampleError;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "mailpilot-core"
}
