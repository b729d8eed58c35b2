//! Sample emails the review client walks through.
//!
//! The default set is a four-message "team lunch" thread. Operators can swap
//! in their own list with a JSON file holding an array of emails.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::models::Email;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("read sample emails {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse sample emails {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("sample emails {0} contains no emails")]
    Empty(PathBuf),
}

pub const USER_ADDRESS: &str = "user@example.com";
const LUNCH_THREAD_ID: &str = "thread-team-lunch";

/// The built-in review thread, in delivery order.
#[must_use]
pub fn lunch_thread() -> Vec<Email> {
    vec![
        thread_email(
            "mail-1",
            ("Jamie Lee", "jamie.lee@example.com"),
            &[USER_ADDRESS],
            &[],
            "Team Lunch Catch-Up?",
            &[
                "Hi Adrian,\n\nIt's been a while since the Mobile team grabbed lunch together. Are you free next week for a quick catch-up?",
                "I was thinking something casual near the office. Let me know what days work and I'll loop in Taylor to help lock it down.\n\nThanks!\nJamie",
            ],
        ),
        thread_email(
            "mail-2",
            ("Taylor Brooks", "taylor.brooks@example.com"),
            &[USER_ADDRESS, "jamie.lee@example.com"],
            &[],
            "Re: Team Lunch Catch-Up?",
            &[
                "Hi both,\n\nGreat! I can hold a 45-minute slot on either Tuesday at 12:00 PM or Thursday at 12:30 PM.",
                "Let me know which one you prefer and I'll send the calendar invite.\n\nThanks,\nTaylor",
            ],
        ),
        thread_email(
            "mail-3",
            ("Jamie Lee", "jamie.lee@example.com"),
            &["taylor.brooks@example.com"],
            &[USER_ADDRESS],
            "Re: Team Lunch Catch-Up?",
            &[
                "Taylor,\n\nLet's go with Tuesday at 12:00 PM. Adrian and I will meet you in the lobby and walk over to Bella's Deli.",
                "Please send the invite when you have a minute.\n\nThanks!\nJamie",
            ],
        ),
        thread_email(
            "mail-4",
            ("Taylor Brooks", "taylor.brooks@example.com"),
            &[USER_ADDRESS, "jamie.lee@example.com"],
            &[],
            "Calendar Invite: Tuesday Lunch at Bella's Deli",
            &[
                "Calendar invite sent for Tuesday at 12:00 PM at Bella's Deli.",
                "See you both then!\n\nTaylor",
            ],
        ),
    ]
}

/// Single stand-alone email used when no sample list is available.
///
/// The mail id embeds `now` so repeated runs never collide server-side.
#[must_use]
pub fn generated_email(now: DateTime<Utc>) -> Email {
    let stamp = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());
    Email {
        mail_id: format!("mail-{stamp}"),
        external_id: None,
        thread_id: "thread-project-launch".to_owned(),
        from_name: Some("Priya Singh".to_owned()),
        from_email: "pm@example.com".to_owned(),
        to: vec![
            "alice.johnson@example.com".to_owned(),
            "diego.martinez@example.com".to_owned(),
        ],
        cc: vec![
            "finance@example.com".to_owned(),
            "product@example.com".to_owned(),
        ],
        subject: Some("Re: Project Launch - Kickoff Prep".to_owned()),
        body: [
            "Looks solid now! Finance confirmed the numbers on slide 6.",
            "I suggest we trim slide 9 a bit -- too much detail for kickoff.",
            "Otherwise, I think we're ready to present tomorrow.",
            "Please let me know if you're available. Please respond.\n\n- Priya",
        ]
        .join(" "),
    }
}

/// Load a JSON array of emails from `path`.
pub fn load_emails(path: &Path) -> Result<Vec<Email>, SampleError> {
    let raw = fs::read_to_string(path).map_err(|source| SampleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let emails: Vec<Email> = serde_json::from_str(&raw).map_err(|source| SampleError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if emails.is_empty() {
        return Err(SampleError::Empty(path.to_path_buf()));
    }
    Ok(emails)
}

/// Returns `emails`, or a one-element list with a generated email when empty.
#[must_use]
pub fn or_generated(emails: Vec<Email>, now: DateTime<Utc>) -> Vec<Email> {
    if emails.is_empty() {
        return vec![generated_email(now)];
    }
    emails
}

fn thread_email(
    mail_id: &str,
    from: (&str, &str),
    to: &[&str],
    cc: &[&str],
    subject: &str,
    body_parts: &[&str],
) -> Email {
    Email {
        mail_id: mail_id.to_owned(),
        external_id: None,
        thread_id: LUNCH_THREAD_ID.to_owned(),
        from_name: Some(from.0.to_owned()),
        from_email: from.1.to_owned(),
        to: to.iter().map(|addr| (*addr).to_owned()).collect(),
        cc: cc.iter().map(|addr| (*addr).to_owned()).collect(),
        subject: Some(subject.to_owned()),
        body: body_parts.join(" "),
    }
}
