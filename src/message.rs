//! Inbox message models.
//!
//! The list endpoint returns summaries only; the full body is fetched on
//! demand when a message is opened.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    pub from: String,
    pub subject: String,
    /// Seconds since the Unix epoch at which the backend accepted the mail.
    pub received_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub received_at: i64,
    /// Plain-text rendering of the mail body.
    #[serde(default)]
    pub text: String,
}

impl MessageSummary {
    /// One-line listing used by the inbox list and the headless printer.
    pub fn listing_line(&self) -> String {
        format!("{} | {}", self.from, self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_decodes_camel_case() {
        let raw = r#"{"id":"m1","from":"a@b.c","subject":"hi","receivedAt":1700000000}"#;
        let summary: MessageSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.id, "m1");
        assert_eq!(summary.received_at, 1_700_000_000);
    }

    #[test]
    fn body_text_defaults_to_empty() {
        let raw = r#"{"id":"m1","from":"a@b.c","subject":"hi","receivedAt":0}"#;
        let body: MessageBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.text, "");
    }

    #[test]
    fn listing_line_shows_sender_and_subject() {
        let summary = MessageSummary {
            id: "m1".into(),
            from: "noreply@example.com".into(),
            subject: "Your code".into(),
            received_at: 0,
        };
        assert_eq!(summary.listing_line(), "noreply@example.com | Your code");
    }
}
