//! Revision request statuses and input validation.

use crate::error::CoreError;
use crate::steps::validate_step_key;
use crate::types::{parse_db_id, DbId};

/// Maximum length of a respondent's answer to a revision request.
pub const MAX_RESPONSE_LENGTH: usize = 5_000;

/// Maximum length of the owner's revision question.
pub const MAX_QUESTION_LENGTH: usize = 2_000;

/// Maximum length of an optional field key.
pub const MAX_FIELD_KEY_LENGTH: usize = 100;

define_wire_enum! {
    /// A revision request is answered exactly once.
    RevisionStatus {
        Pending => "pending",
        Responded => "responded",
    }
}

/// Validate the owner's input when opening a request.
pub fn validate_new_request(
    step_key: &str,
    field_key: Option<&str>,
    message: &str,
) -> Result<(), CoreError> {
    validate_step_key(step_key)?;

    if let Some(field_key) = field_key {
        if field_key.trim().is_empty() || field_key.len() > MAX_FIELD_KEY_LENGTH {
            return Err(CoreError::Validation(format!(
                "Field key must be 1-{MAX_FIELD_KEY_LENGTH} characters"
            )));
        }
    }

    if message.trim().is_empty() {
        return Err(CoreError::Validation(
            "Revision message must not be empty".to_string(),
        ));
    }
    if message.chars().count() > MAX_QUESTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Revision message exceeds {MAX_QUESTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the respondent's answer text.
pub fn validate_response_text(response: &str) -> Result<(), CoreError> {
    if response.trim().is_empty() {
        return Err(CoreError::Validation(
            "Response must not be empty".to_string(),
        ));
    }
    if response.chars().count() > MAX_RESPONSE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Response exceeds {MAX_RESPONSE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Parse the id of the request being answered. Runs before any lookup.
pub fn parse_request_id(raw: &str) -> Result<DbId, CoreError> {
    parse_db_id(raw, "revision request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_wire_strings() {
        assert_eq!(RevisionStatus::Pending.as_str(), "pending");
        assert_eq!(
            "responded".parse::<RevisionStatus>().unwrap(),
            RevisionStatus::Responded
        );
    }

    #[test]
    fn new_request_requires_step_and_message() {
        assert!(validate_new_request("business_info", None, "Which year?").is_ok());
        assert!(validate_new_request("business_info", Some("founded"), "Which year?").is_ok());
        assert_matches!(
            validate_new_request("", None, "Which year?"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_new_request("business_info", None, "   "),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_new_request("business_info", Some(""), "q"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn response_length_is_bounded() {
        assert!(validate_response_text(&"a".repeat(MAX_RESPONSE_LENGTH)).is_ok());
        assert_matches!(
            validate_response_text(&"a".repeat(MAX_RESPONSE_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_response_text(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn request_id_format_is_strict() {
        assert_eq!(parse_request_id("42").unwrap(), 42);
        assert!(parse_request_id("42abc").is_err());
        assert!(parse_request_id("../42").is_err());
    }
}
