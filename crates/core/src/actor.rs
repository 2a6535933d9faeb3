//! Explicit caller identity passed into every workflow operation.

use std::fmt;

use crate::error::CoreError;
use crate::types::DbId;

define_wire_enum! {
    /// Which side of the collaboration an actor is on.
    ActorKind {
        Owner => "owner",
        Respondent => "respondent",
    }
}

impl ActorKind {
    /// The other side of the conversation.
    pub fn counterpart(self) -> Self {
        match self {
            ActorKind::Owner => ActorKind::Respondent,
            ActorKind::Respondent => ActorKind::Owner,
        }
    }
}

/// The caller of a workflow operation.
///
/// Owners arrive with a session already validated by the transport layer.
/// Respondents arrive with whatever token they presented (possibly none);
/// the workflow verifies it against the project before doing anything else.
#[derive(Clone, PartialEq, Eq)]
pub enum ActorContext {
    Owner {
        user_id: DbId,
        email: Option<String>,
    },
    Respondent {
        presented_token: Option<String>,
    },
}

impl ActorContext {
    pub fn owner(user_id: DbId) -> Self {
        ActorContext::Owner {
            user_id,
            email: None,
        }
    }

    pub fn respondent(presented_token: Option<&str>) -> Self {
        ActorContext::Respondent {
            presented_token: presented_token.map(str::to_string),
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            ActorContext::Owner { .. } => ActorKind::Owner,
            ActorContext::Respondent { .. } => ActorKind::Respondent,
        }
    }

    /// The owner's user id, or `AccessDenied` for a respondent.
    pub fn require_owner(&self) -> Result<DbId, CoreError> {
        match self {
            ActorContext::Owner { user_id, .. } => Ok(*user_id),
            ActorContext::Respondent { .. } => Err(CoreError::AccessDenied),
        }
    }

    /// The presented token, or `AccessDenied` for an owner.
    pub fn require_respondent(&self) -> Result<Option<&str>, CoreError> {
        match self {
            ActorContext::Respondent { presented_token } => Ok(presented_token.as_deref()),
            ActorContext::Owner { .. } => Err(CoreError::AccessDenied),
        }
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for ActorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorContext::Owner { user_id, .. } => {
                f.debug_struct("Owner").field("user_id", user_id).finish()
            }
            ActorContext::Respondent { presented_token } => f
                .debug_struct("Respondent")
                .field("has_token", &presented_token.is_some())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn counterpart_flips_side() {
        assert_eq!(ActorKind::Owner.counterpart(), ActorKind::Respondent);
        assert_eq!(ActorKind::Respondent.counterpart(), ActorKind::Owner);
    }

    #[test]
    fn role_checks() {
        let owner = ActorContext::owner(7);
        let respondent = ActorContext::respondent(Some("tok"));

        assert_eq!(owner.require_owner().unwrap(), 7);
        assert_matches!(owner.require_respondent(), Err(CoreError::AccessDenied));
        assert_eq!(respondent.require_respondent().unwrap(), Some("tok"));
        assert_matches!(respondent.require_owner(), Err(CoreError::AccessDenied));
    }

    #[test]
    fn debug_output_hides_token() {
        let respondent = ActorContext::respondent(Some("super-secret"));
        let rendered = format!("{respondent:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("has_token: true"));
    }

    #[test]
    fn actor_kind_round_trips_wire_string() {
        assert_eq!("owner".parse::<ActorKind>().unwrap(), ActorKind::Owner);
        assert_eq!(ActorKind::Respondent.to_string(), "respondent");
        assert_eq!(
            serde_json::to_value(ActorKind::Owner).unwrap(),
            serde_json::json!("owner")
        );
        assert_matches!("admin".parse::<ActorKind>(), Err(CoreError::Validation(_)));
    }
}
