//! Project categories and input validation for project creation.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length for a project title.
pub const MAX_TITLE_LENGTH: usize = 200;

define_wire_enum! {
    /// What kind of work the project is about.
    ProjectCategory {
        Branding => "branding",
        Logo => "logo",
        Website => "website",
        Marketing => "marketing",
        Packaging => "packaging",
        Other => "other",
    }
}

/// Validate a project title: non-blank and bounded.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project title exceeds {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an email address for the respondent (or owner).
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_from_wire() {
        assert_eq!(
            "website".parse::<ProjectCategory>().unwrap(),
            ProjectCategory::Website
        );
        assert!("podcast".parse::<ProjectCategory>().is_err());
    }

    #[test]
    fn title_bounds() {
        assert!(validate_title("Acme rebrand").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("client@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }
}
