//! Pure formatters turning review data into styled content lines.
//!
//! Nothing here knows about screens or scrolling; the viewport wraps whatever
//! these functions return.

use mailpilot_core::{Action, Classification, Email, JsonObject, SubmissionResult};
use mailpilot_tui_adapter::render::TextRole;
use mailpilot_tui_adapter::text::Line;

pub const PREVIEW_INSTRUCTION: &str =
    "Press Enter to submit the email to the agents. Press 'q' to quit.";
pub const SUMMARY_HINT: &str = "Press Enter to review proposed actions. Use arrow keys to scroll.";
pub const ACTION_CHOICES: &str = "Choose: [a]pprove  [m]odify  [r]eject  [q]uit";
pub const ACTION_SCROLL_HINT: &str = "Use arrow keys or PgUp/PgDn to scroll.";
pub const PROMPT_HELP: &str =
    "Press 'y' to apply to general preferences, 'n' for per-recipient, or Enter for the default (No).";
pub const DONE_HINT_LAST: &str = "Press Enter or 'q' to exit. Use arrow keys to review the list.";
pub const DONE_HINT_MORE: &str =
    "Press Enter to load the next email, or 'q' to exit. Use arrow keys to review the list.";
pub const ERROR_HINT: &str = "Press Enter to exit.";
pub const NO_CLASSIFICATION: &str = "No classification data.";

const BODY_INDENT: &str = "  ";

/// Email as shown before it is submitted.
#[must_use]
pub fn email_preview(email: &Email) -> Vec<Line> {
    let mut lines = vec![
        Line::styled("Email Ready to Submit", TextRole::Title),
        Line::blank(),
        labelled("Mail ID:", &email.mail_id),
    ];
    let subject = email.subject_text();
    if !subject.is_empty() {
        lines.push(labelled("Subject:", subject));
    }
    lines.push(labelled("From:", &format_sender(email)));
    if !email.to.is_empty() {
        lines.push(labelled("To:", &email.to.join(", ")));
    }
    if !email.cc.is_empty() {
        lines.push(labelled("CC:", &email.cc.join(", ")));
    }
    lines.push(Line::blank());
    lines.push(Line::styled("Body:", TextRole::Muted));
    lines.extend(indent_multiline(&email.body, BODY_INDENT).into_iter().map(Line::plain));
    lines.push(Line::blank());
    lines.push(Line::styled(PREVIEW_INSTRUCTION, TextRole::Muted));
    lines
}

/// Post-submission overview: headers, generated summary and classification.
#[must_use]
pub fn summary(email: &Email, result: &SubmissionResult) -> Vec<Line> {
    let mut lines = vec![
        Line::styled("Email Summary", TextRole::Title),
        Line::blank(),
        labelled("Mail ID:", &result.mail_id),
        labelled("Subject:", email.subject_text()),
        labelled("From:", &format_sender(email)),
        labelled("To:", &email.to.join(", ")),
    ];
    if let Some(text) = result.summary_text() {
        lines.push(Line::blank());
        lines.push(Line::styled("Summary:", TextRole::Muted));
        lines.extend(split_lines(text).map(Line::plain));
    }
    lines.push(Line::blank());
    lines.push(Line::styled("Classification:", TextRole::Muted));
    lines.extend(classification(&result.classification));
    lines.push(Line::blank());
    lines.push(Line::styled(SUMMARY_HINT, TextRole::Muted));
    lines
}

/// One line per category in name order; selected categories are flagged.
#[must_use]
pub fn classification(classification: &Classification) -> Vec<Line> {
    if classification.is_empty() {
        return vec![Line::plain(NO_CLASSIFICATION)];
    }
    classification
        .probabilities
        .iter()
        .map(|(category, probability)| {
            let line = Line::plain(format!("- {category}: {:.1}%", probability * 100.0));
            if classification.is_selected(category) {
                line.with(" (selected)", TextRole::Success)
            } else {
                line
            }
        })
        .collect()
}

/// Action under review. `index` is zero-based; the title shows it one-based.
#[must_use]
pub fn action(action: &Action, index: usize, total: usize) -> Vec<Line> {
    let mut lines = vec![
        Line::styled("Proposed Action", TextRole::Title)
            .with(format!(" ({}/{total})", index + 1), TextRole::Muted),
        Line::blank(),
        labelled("Action ID:", &action.action_id),
        labelled("Type:", &action.action_type),
        status_line(&action.status),
    ];
    lines.extend(json_block("Payload", &action.payload));
    if let Some(result) = &action.result {
        lines.extend(json_block("Result", result));
    }
    lines.push(Line::blank());
    lines.push(Line::styled(ACTION_CHOICES, TextRole::Accent));
    lines.push(Line::styled(ACTION_SCROLL_HINT, TextRole::Muted));
    lines
}

/// Global-versus-per-recipient preference question.
#[must_use]
pub fn preference_prompt(question: &str) -> Vec<Line> {
    vec![
        Line::styled("Preference Update", TextRole::Title),
        Line::blank(),
        Line::styled(question, TextRole::Warning),
        Line::blank(),
        Line::plain(PROMPT_HELP),
    ]
}

/// Final per-email recap listing every action's last known status.
#[must_use]
pub fn completion(actions: &[Action], status: &str, more_emails: bool) -> Vec<Line> {
    let mut lines = vec![Line::styled("Review Complete", TextRole::Title), Line::blank()];
    for action in actions {
        lines.push(
            Line::plain(format!("- {}: ", action.action_id))
                .with(action.status.clone(), status_role(&action.status)),
        );
    }
    if !actions.is_empty() {
        lines.push(Line::blank());
    }
    if !status.is_empty() {
        lines.push(Line::styled(status, TextRole::Success));
    }
    let hint = if more_emails { DONE_HINT_MORE } else { DONE_HINT_LAST };
    lines.push(Line::styled(hint, TextRole::Muted));
    lines
}

#[must_use]
pub fn error(message: &str) -> Vec<Line> {
    let mut lines = vec![Line::styled("Error", TextRole::Danger), Line::blank()];
    if !message.is_empty() {
        lines.extend(split_lines(message).map(|line| Line::styled(line, TextRole::Danger)));
        lines.push(Line::blank());
    }
    lines.push(Line::styled(ERROR_HINT, TextRole::Muted));
    lines
}

/// Two-space indented JSON.
pub fn pretty_json(value: &JsonObject) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// `Name <address>`, or the bare address when no name is known.
#[must_use]
pub fn format_sender(email: &Email) -> String {
    match email.sender_name() {
        "" => email.from_email.clone(),
        name => format!("{name} <{}>", email.from_email),
    }
}

/// Prefix every line of `text` with `indent`; CRLF is normalised and blank
/// lines keep the indentation only.
#[must_use]
pub fn indent_multiline(text: &str, indent: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    split_lines(text).map(|line| format!("{indent}{line}")).collect()
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn labelled(label: &str, value: &str) -> Line {
    Line::styled(label, TextRole::Muted).with(format!(" {value}"), TextRole::Primary)
}

fn status_line(status: &str) -> Line {
    Line::styled("Status:", TextRole::Muted)
        .with(" ", TextRole::Primary)
        .with(status, status_role(status))
}

fn status_role(status: &str) -> TextRole {
    match status {
        "approved" | "modified" | "executed" => TextRole::Success,
        "rejected" | "failed" => TextRole::Danger,
        "pending" => TextRole::Warning,
        _ => TextRole::Primary,
    }
}

fn json_block(title: &str, value: &JsonObject) -> Vec<Line> {
    let text = pretty_json(value).unwrap_or_else(|err| {
        format!("<unable to render {}: {err}>", title.to_ascii_lowercase())
    });
    let mut lines = vec![Line::blank(), Line::styled(format!("{title}:"), TextRole::Muted)];
    lines.extend(text.lines().map(|line| Line::styled(line, TextRole::Focus)));
    lines
}
