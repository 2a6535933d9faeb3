use crate::types::DbId;

/// Domain error taxonomy shared by every layer above `core`.
///
/// Each variant carries a stable wire code (see [`CoreError::code`]) so the
/// HTTP layer and tests can match on outcomes without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad, missing or revoked token, or a caller acting outside its role.
    #[error("Access denied")]
    AccessDenied,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid transition from '{current}' to '{requested}'")]
    InvalidTransition { current: String, requested: String },

    #[error("Project has already been submitted")]
    AlreadySubmitted,

    #[error("Revision request has already been responded to")]
    AlreadyResponded,

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Opaque downstream failure. The message is for logs only.
    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::AccessDenied => "ACCESS_DENIED",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CoreError::AlreadySubmitted => "ALREADY_SUBMITTED",
            CoreError::AlreadyResponded => "ALREADY_RESPONDED",
            CoreError::Validation(_) => "VALIDATION_FAILED",
            CoreError::Storage(_) => "STORAGE_FAILURE",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build an [`CoreError::InvalidTransition`] from any displayable states.
    pub fn invalid_transition(current: impl ToString, requested: impl ToString) -> Self {
        CoreError::InvalidTransition {
            current: current.to_string(),
            requested: requested.to_string(),
        }
    }

    /// `true` for outcomes that are expected user-facing results rather than
    /// faults (idempotency guards).
    pub fn is_idempotency_guard(&self) -> bool {
        matches!(
            self,
            CoreError::AlreadySubmitted | CoreError::AlreadyResponded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(CoreError::AccessDenied.code(), "ACCESS_DENIED");
        assert_eq!(
            CoreError::NotFound {
                entity: "Project",
                id: 1
            }
            .code(),
            "NOT_FOUND"
        );
        assert_eq!(
            CoreError::invalid_transition("draft", "reviewed").code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(CoreError::AlreadySubmitted.code(), "ALREADY_SUBMITTED");
        assert_eq!(CoreError::AlreadyResponded.code(), "ALREADY_RESPONDED");
        assert_eq!(
            CoreError::Validation("x".into()).code(),
            "VALIDATION_FAILED"
        );
        assert_eq!(CoreError::Storage("x".into()).code(), "STORAGE_FAILURE");
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = CoreError::invalid_transition("draft", "reviewed");
        assert_eq!(
            err.to_string(),
            "Invalid transition from 'draft' to 'reviewed'"
        );
    }

    #[test]
    fn only_already_variants_are_idempotency_guards() {
        assert!(CoreError::AlreadySubmitted.is_idempotency_guard());
        assert!(CoreError::AlreadyResponded.is_idempotency_guard());
        assert!(!CoreError::AccessDenied.is_idempotency_guard());
    }
}
