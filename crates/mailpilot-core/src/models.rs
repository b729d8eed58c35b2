//! Wire model for the review gateway.
//!
//! Field names follow the backend JSON contract; optional fields are omitted
//! on serialization when absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Arbitrary JSON object, used for action payloads and results.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// An email submitted for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub mail_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    pub from_email: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

impl Email {
    /// Subject with surrounding whitespace removed; empty when absent.
    #[must_use]
    pub fn subject_text(&self) -> &str {
        self.subject.as_deref().map_or("", str::trim)
    }

    /// Sender display name with surrounding whitespace removed; empty when absent.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.from_name.as_deref().map_or("", str::trim)
    }
}

/// Generated recap of an email thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

/// Category probabilities and the backend's selection decisions.
///
/// Both maps are ordered by category name. A category may appear in only one
/// of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,
    #[serde(default)]
    pub decisions: BTreeMap<String, bool>,
}

impl Classification {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Missing decisions count as not selected.
    #[must_use]
    pub fn is_selected(&self, category: &str) -> bool {
        self.decisions.get(category).copied().unwrap_or(false)
    }
}

/// A proposed operation attached to an email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_id: Option<String>,
    #[serde(rename = "type")]
    pub action_type: String,
    pub status: String,
    #[serde(default)]
    pub payload: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonObject>,
}

/// Response to submitting an email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub mail_id: String,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub proposed_actions: Vec<Action>,
    #[serde(default)]
    pub classification: Classification,
}

impl SubmissionResult {
    #[must_use]
    pub fn has_actions(&self) -> bool {
        !self.proposed_actions.is_empty()
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.proposed_actions.len()
    }

    #[must_use]
    pub fn action(&self, index: usize) -> Option<&Action> {
        self.proposed_actions.get(index)
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut Action> {
        self.proposed_actions.get_mut(index)
    }

    /// Summary text when one was generated and is not blank.
    #[must_use]
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .map(|summary| summary.text.trim())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_omits_absent_optional_fields() {
        let email = Email {
            mail_id: "mail-1".to_owned(),
            external_id: None,
            thread_id: "thread-1".to_owned(),
            from_name: None,
            from_email: "a@example.com".to_owned(),
            to: vec!["b@example.com".to_owned()],
            cc: Vec::new(),
            subject: None,
            body: "hi".to_owned(),
        };
        let value = serde_json::to_value(&email).unwrap_or_default();
        assert!(value.get("from_name").is_none());
        assert!(value.get("subject").is_none());
        assert!(value.get("external_id").is_none());
        assert_eq!(value["cc"], json!([]));
        assert_eq!(value["to"], json!(["b@example.com"]));
    }

    #[test]
    fn email_subject_and_sender_are_trimmed() {
        let email: Email = serde_json::from_value(json!({
            "mail_id": "m",
            "thread_id": "t",
            "from_name": "  Jamie Lee ",
            "from_email": "jamie@example.com",
            "subject": "  Lunch?  ",
            "body": ""
        }))
        .unwrap_or_else(|err| panic!("decode email: {err}"));
        assert_eq!(email.subject_text(), "Lunch?");
        assert_eq!(email.sender_name(), "Jamie Lee");
        assert!(email.to.is_empty());
    }

    #[test]
    fn action_decodes_type_tag_and_optional_result() {
        let action: Action = serde_json::from_value(json!({
            "action_id": "act-1",
            "type": "draft_reply",
            "status": "pending",
            "payload": {"to": ["x@example.com"], "body": "Sure"}
        }))
        .unwrap_or_else(|err| panic!("decode action: {err}"));
        assert_eq!(action.action_type, "draft_reply");
        assert!(action.result.is_none());
        assert!(action.mail_id.is_none());
        assert_eq!(action.payload["body"], json!("Sure"));

        let encoded = serde_json::to_value(&action).unwrap_or_default();
        assert_eq!(encoded["type"], json!("draft_reply"));
        assert!(encoded.get("result").is_none());
    }

    #[test]
    fn submission_result_tolerates_missing_summary_and_actions() {
        let result: SubmissionResult = serde_json::from_value(json!({
            "mail_id": "mail-9",
            "summary": null,
            "classification": {"probabilities": {"urgent": 0.2}}
        }))
        .unwrap_or_else(|err| panic!("decode result: {err}"));
        assert!(!result.has_actions());
        assert!(result.summary_text().is_none());
        assert!(!result.classification.is_selected("urgent"));
        assert!(!result.classification.is_empty());
    }

    #[test]
    fn blank_summary_text_is_treated_as_absent() {
        let result = SubmissionResult {
            mail_id: "m".to_owned(),
            summary: Some(Summary {
                text: "   ".to_owned(),
            }),
            proposed_actions: Vec::new(),
            classification: Classification::default(),
        };
        assert!(result.summary_text().is_none());
    }

    #[test]
    fn classification_decisions_default_to_unselected() {
        let mut classification = Classification::default();
        classification.probabilities.insert("urgent".to_owned(), 0.9);
        classification.decisions.insert("spam".to_owned(), true);
        assert!(!classification.is_selected("urgent"));
        assert!(classification.is_selected("spam"));
    }
}
