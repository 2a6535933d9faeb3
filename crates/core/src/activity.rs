//! Chat messages and their promotion into typed activity-feed entries.
//!
//! A message is free text. Optional metadata turns it into an approval, a
//! change request, or tagged feedback so the feed can render it distinctly.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a message body.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Maximum number of feedback tags on a single message.
pub const MAX_FEEDBACK_TAGS: usize = 10;

/// Metadata value marking a message as an approval.
pub const ACTION_APPROVAL: &str = "approval";

/// Metadata value marking a message as a change request.
pub const ACTION_CHANGE_REQUEST: &str = "change_request";

/// All valid action values.
pub const VALID_ACTIONS: &[&str] = &[ACTION_APPROVAL, ACTION_CHANGE_REQUEST];

/// Structured metadata that may accompany a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback_tags: Vec<String>,
}

define_wire_enum! {
    /// How an entry shows up in the activity feed.
    ActivityKind {
        Chat => "chat",
        Approval => "approval",
        ChangeRequest => "change_request",
        Feedback => "feedback",
    }
}

impl MessageMetadata {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(action) = &self.action {
            if !VALID_ACTIONS.contains(&action.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Invalid action '{action}'. Must be one of: {}",
                    VALID_ACTIONS.join(", ")
                )));
            }
        }
        if self.feedback_tags.len() > MAX_FEEDBACK_TAGS {
            return Err(CoreError::Validation(format!(
                "At most {MAX_FEEDBACK_TAGS} feedback tags are allowed"
            )));
        }
        if self.feedback_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Feedback tags must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// The feed kind this metadata promotes a message to.
    pub fn activity_kind(&self) -> ActivityKind {
        match self.action.as_deref() {
            Some(ACTION_APPROVAL) => ActivityKind::Approval,
            Some(ACTION_CHANGE_REQUEST) => ActivityKind::ChangeRequest,
            _ if !self.feedback_tags.is_empty() => ActivityKind::Feedback,
            _ => ActivityKind::Chat,
        }
    }
}

/// Classify a stored message by its (optional, schema-free) metadata.
///
/// Metadata that does not parse is treated as absent: the message still
/// shows up, just as plain chat.
pub fn classify_message(metadata: Option<&serde_json::Value>) -> (ActivityKind, Vec<String>) {
    let parsed = metadata
        .and_then(|m| serde_json::from_value::<MessageMetadata>(m.clone()).ok())
        .unwrap_or_default();
    (parsed.activity_kind(), parsed.feedback_tags)
}

/// Validate a message body.
pub fn validate_message_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message must not be empty".to_string(),
        ));
    }
    if body.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_message_is_chat() {
        assert_eq!(classify_message(None).0, ActivityKind::Chat);
        assert_eq!(classify_message(Some(&json!({}))).0, ActivityKind::Chat);
    }

    #[test]
    fn actions_promote_messages() {
        assert_eq!(
            classify_message(Some(&json!({"action": "approval"}))).0,
            ActivityKind::Approval
        );
        assert_eq!(
            classify_message(Some(&json!({"action": "change_request"}))).0,
            ActivityKind::ChangeRequest
        );
    }

    #[test]
    fn tags_promote_to_feedback() {
        let (kind, tags) = classify_message(Some(&json!({"feedback_tags": ["color"]})));
        assert_eq!(kind, ActivityKind::Feedback);
        assert_eq!(tags, vec!["color"]);
    }

    #[test]
    fn garbage_metadata_degrades_to_chat() {
        assert_eq!(classify_message(Some(&json!("nope"))).0, ActivityKind::Chat);
    }

    #[test]
    fn metadata_validation() {
        let bad = MessageMetadata {
            action: Some("delete_everything".into()),
            feedback_tags: vec![],
        };
        assert!(bad.validate().is_err());

        let too_many = MessageMetadata {
            action: None,
            feedback_tags: (0..11).map(|i| i.to_string()).collect(),
        };
        assert!(too_many.validate().is_err());

        let ok = MessageMetadata {
            action: Some(ACTION_APPROVAL.into()),
            feedback_tags: vec!["layout".into()],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn body_bounds() {
        assert!(validate_message_body("hi").is_ok());
        assert!(validate_message_body(" ").is_err());
        assert!(validate_message_body(&"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }
}
