//! mailpilot-tui: terminal review client for agent-proposed email actions.
//!
//! `app` is the screen engine; it is pure and driven by input events and
//! gateway completions. `dispatch` and `runtime` connect it to the gateway
//! and the terminal.

pub mod app;
pub mod content;
pub mod dispatch;
pub mod editor;
pub mod runtime;
pub mod spinner;
pub mod viewport;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "mailpilot-tui"
}

#[cfg(test)]
mod tests {
    use super::crate_label;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "mailpilot-tui");
    }
}
