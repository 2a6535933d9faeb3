//! In-app notification kinds.

define_wire_enum! {
    /// Type of an in-app notification record.
    NotificationKind {
        StatusChanged => "status_changed",
        NewMessage => "new_message",
        RevisionRequested => "revision_requested",
        RevisionResponse => "revision_response",
        BriefSubmitted => "brief_submitted",
        DeliverablesReady => "deliverables_ready",
    }
}

/// Default page size when listing notifications.
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

/// Upper bound on a notification listing page.
pub const MAX_NOTIFICATION_LIMIT: i64 = 200;

/// Clamp a caller-supplied page size into the allowed range.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
        .clamp(1, MAX_NOTIFICATION_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_response_wire_string() {
        assert_eq!(NotificationKind::RevisionResponse.as_str(), "revision_response");
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_NOTIFICATION_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_NOTIFICATION_LIMIT);
    }
}
