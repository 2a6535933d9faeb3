//! Project status and phase state machines, blockers, and the advisory
//! health score.
//!
//! Status (`draft → sent → in_progress → completed → reviewed`) is coarse and
//! driven by both actors. Phase is fine-grained and moved only by the owner.
//! The two are deliberately not coupled: [`phase_implied_by_status`] exists
//! for display and health scoring only and never drives a transition.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

define_wire_enum! {
    /// Coarse-grained project status.
    ProjectStatus {
        Draft => "draft",
        Sent => "sent",
        InProgress => "in_progress",
        Completed => "completed",
        Reviewed => "reviewed",
    }
}

impl ProjectStatus {
    /// The respondent's answers have been frozen into a brief.
    ///
    /// `completed_at` is set exactly when this returns `true`.
    pub fn is_submitted(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Reviewed)
    }

    /// The respondent may still save answers.
    pub fn accepts_respondent_edits(self) -> bool {
        matches!(self, ProjectStatus::Sent | ProjectStatus::InProgress)
    }

    /// Whether the edge `self → next` exists in the state machine.
    ///
    /// This only answers "is the edge legal"; which actor and which operation
    /// may take it is decided by the workflow layer. `completed →
    /// in_progress` is the single backward edge and belongs to the revision
    /// workflow.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Sent, InProgress)
                | (Sent, Completed)
                | (InProgress, Completed)
                | (Completed, Reviewed)
                | (Completed, InProgress)
        )
    }
}

/// Reject an edge that the state machine does not contain.
pub fn validate_status_transition(
    current: ProjectStatus,
    requested: ProjectStatus,
) -> Result<(), CoreError> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(CoreError::invalid_transition(current, requested))
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

define_wire_enum! {
    /// Fine-grained collaboration phase.
    Phase {
        Discovery => "discovery",
        Proposal => "proposal",
        Design => "design",
        Feedback => "feedback",
        Revision => "revision",
        Delivery => "delivery",
        Completed => "completed",
    }
}

impl Phase {
    /// Zero-based position in the phase order.
    pub fn index(self) -> usize {
        match self {
            Phase::Discovery => 0,
            Phase::Proposal => 1,
            Phase::Design => 2,
            Phase::Feedback => 3,
            Phase::Revision => 4,
            Phase::Delivery => 5,
            Phase::Completed => 6,
        }
    }

    /// The phase after this one, if any.
    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.index() + 1).copied()
    }
}

/// A phase the project has left, with the time it was left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPhase {
    pub phase: Phase,
    pub completed_at: Timestamp,
}

/// Result of a forward phase move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseAdvance {
    pub from: Phase,
    pub to: Phase,
    /// Phases left behind by this move, oldest first.
    pub completed: Vec<CompletedPhase>,
}

/// Plan a forward move from `current`.
///
/// With no `target` the project moves to the next phase. A target must lie
/// strictly ahead; every phase from `current` up to (not including) the
/// target is recorded as completed at `now`.
pub fn plan_phase_advance(
    current: Phase,
    target: Option<Phase>,
    now: Timestamp,
) -> Result<PhaseAdvance, CoreError> {
    let to = match target {
        Some(target) => target,
        None => current
            .next()
            .ok_or_else(|| CoreError::invalid_transition(current, "next phase"))?,
    };

    if to.index() <= current.index() {
        return Err(CoreError::invalid_transition(current, to));
    }

    let completed = Phase::ALL[current.index()..to.index()]
        .iter()
        .map(|&phase| CompletedPhase {
            phase,
            completed_at: now,
        })
        .collect();

    Ok(PhaseAdvance {
        from: current,
        to,
        completed,
    })
}

/// Where a new revision cycle moves the phase, if anywhere.
///
/// Projects already past `revision` fall back to it; earlier phases stay
/// where they are.
pub fn revision_regression_target(current: Phase) -> Option<Phase> {
    (current.index() > Phase::Revision.index()).then_some(Phase::Revision)
}

/// The phase a status loosely corresponds to. Display and health only.
pub fn phase_implied_by_status(status: ProjectStatus) -> Option<Phase> {
    match status {
        ProjectStatus::Draft => None,
        ProjectStatus::Sent | ProjectStatus::InProgress => Some(Phase::Discovery),
        ProjectStatus::Completed => Some(Phase::Proposal),
        ProjectStatus::Reviewed => Some(Phase::Completed),
    }
}

// ---------------------------------------------------------------------------
// Blockers
// ---------------------------------------------------------------------------

/// Maximum length of a blocker description.
pub const MAX_BLOCKER_DESCRIPTION_LENGTH: usize = 500;

define_wire_enum! {
    /// How badly a blocker hurts the project.
    BlockerSeverity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl BlockerSeverity {
    /// Health points deducted while a blocker of this severity is open.
    pub fn penalty(self) -> u32 {
        match self {
            BlockerSeverity::Low => 5,
            BlockerSeverity::Medium => 10,
            BlockerSeverity::High => 20,
            BlockerSeverity::Critical => 30,
        }
    }
}

/// An open issue holding the project back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    pub id: String,
    pub description: String,
    pub severity: BlockerSeverity,
    pub created_at: Timestamp,
}

impl Blocker {
    /// Validate input and build a blocker with a fresh id.
    pub fn new(
        description: &str,
        severity: BlockerSeverity,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::Validation(
                "Blocker description must not be empty".to_string(),
            ));
        }
        if description.chars().count() > MAX_BLOCKER_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Blocker description exceeds {MAX_BLOCKER_DESCRIPTION_LENGTH} characters"
            )));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            severity,
            created_at: now,
        })
    }
}

// ---------------------------------------------------------------------------
// Health score
// ---------------------------------------------------------------------------

/// Per-request deduction for outstanding revision requests.
const PENDING_REVISION_PENALTY: u32 = 5;

/// Cap on the total revision-request deduction.
const MAX_PENDING_REVISION_PENALTY: u32 = 20;

/// Deduction when the phase lags behind what the status implies.
const PHASE_LAG_PENALTY: u32 = 10;

/// Inputs to [`compute_health_score`].
#[derive(Debug, Clone)]
pub struct HealthSignals<'a> {
    pub status: ProjectStatus,
    pub current_phase: Phase,
    pub blockers: &'a [Blocker],
    pub pending_revisions: usize,
    pub last_accessed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
}

/// Advisory 0–100 score. Safe to recompute at any time; never gates anything.
pub fn compute_health_score(signals: &HealthSignals<'_>, now: Timestamp) -> u8 {
    let mut penalty: u32 = signals
        .blockers
        .iter()
        .map(|b| b.severity.penalty())
        .sum();

    penalty += (signals.pending_revisions as u32 * PENDING_REVISION_PENALTY)
        .min(MAX_PENDING_REVISION_PENALTY);

    if signals.status.accepts_respondent_edits() {
        if let Some(since) = signals.last_accessed_at.or(signals.sent_at) {
            penalty += inactivity_penalty(now - since);
        }
    }

    if let Some(implied) = phase_implied_by_status(signals.status) {
        if signals.current_phase.index() < implied.index() {
            penalty += PHASE_LAG_PENALTY;
        }
    }

    100u32.saturating_sub(penalty) as u8
}

fn inactivity_penalty(idle: Duration) -> u32 {
    match idle.num_days() {
        d if d > 14 => 30,
        d if d > 7 => 20,
        d if d > 3 => 10,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    #[test]
    fn status_wire_strings() {
        assert_eq!(ProjectStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            "reviewed".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Reviewed
        );
        assert!("delivered".parse::<ProjectStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn forward_edges_are_allowed() {
        use ProjectStatus::*;
        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Reviewed));
    }

    #[test]
    fn only_one_backward_edge_exists() {
        use ProjectStatus::*;
        for &from in ProjectStatus::ALL {
            for &to in ProjectStatus::ALL {
                let backward = to_index(to) < to_index(from);
                if backward && from.can_transition_to(to) {
                    assert_eq!((from, to), (Completed, InProgress));
                }
            }
        }
    }

    fn to_index(s: ProjectStatus) -> usize {
        ProjectStatus::ALL.iter().position(|x| *x == s).unwrap()
    }

    #[test]
    fn reviewed_from_draft_is_invalid() {
        let err =
            validate_status_transition(ProjectStatus::Draft, ProjectStatus::Reviewed).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidTransition { ref current, ref requested }
                if current == "draft" && requested == "reviewed"
        );
    }

    #[test]
    fn completed_at_tracks_submitted_statuses() {
        assert!(!ProjectStatus::InProgress.is_submitted());
        assert!(ProjectStatus::Completed.is_submitted());
        assert!(ProjectStatus::Reviewed.is_submitted());
    }

    #[test]
    fn phase_order_and_next() {
        assert_eq!(Phase::Discovery.next(), Some(Phase::Proposal));
        assert_eq!(Phase::Delivery.next(), Some(Phase::Completed));
        assert_eq!(Phase::Completed.next(), None);
        for (i, p) in Phase::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn advance_to_next_records_current_phase() {
        let now = Utc::now();
        let plan = plan_phase_advance(Phase::Discovery, None, now).unwrap();
        assert_eq!(plan.to, Phase::Proposal);
        assert_eq!(
            plan.completed,
            vec![CompletedPhase {
                phase: Phase::Discovery,
                completed_at: now
            }]
        );
    }

    #[test]
    fn advance_to_target_records_skipped_phases() {
        let now = Utc::now();
        let plan = plan_phase_advance(Phase::Proposal, Some(Phase::Revision), now).unwrap();
        let phases: Vec<_> = plan.completed.iter().map(|c| c.phase).collect();
        assert_eq!(phases, vec![Phase::Proposal, Phase::Design, Phase::Feedback]);
    }

    #[test]
    fn advance_backwards_or_in_place_is_invalid() {
        let now = Utc::now();
        assert_matches!(
            plan_phase_advance(Phase::Design, Some(Phase::Design), now),
            Err(CoreError::InvalidTransition { .. })
        );
        assert_matches!(
            plan_phase_advance(Phase::Design, Some(Phase::Discovery), now),
            Err(CoreError::InvalidTransition { .. })
        );
        assert_matches!(
            plan_phase_advance(Phase::Completed, None, now),
            Err(CoreError::InvalidTransition { .. })
        );
    }

    #[test]
    fn regression_only_from_beyond_revision() {
        assert_eq!(revision_regression_target(Phase::Delivery), Some(Phase::Revision));
        assert_eq!(revision_regression_target(Phase::Completed), Some(Phase::Revision));
        assert_eq!(revision_regression_target(Phase::Revision), None);
        assert_eq!(revision_regression_target(Phase::Design), None);
    }

    #[test]
    fn implied_phase_mapping() {
        assert_eq!(phase_implied_by_status(ProjectStatus::Draft), None);
        assert_eq!(
            phase_implied_by_status(ProjectStatus::InProgress),
            Some(Phase::Discovery)
        );
        assert_eq!(
            phase_implied_by_status(ProjectStatus::Reviewed),
            Some(Phase::Completed)
        );
    }

    #[test]
    fn blocker_validation() {
        let now = Utc::now();
        assert!(Blocker::new("  ", BlockerSeverity::Low, now).is_err());
        assert!(Blocker::new(&"x".repeat(501), BlockerSeverity::Low, now).is_err());
        let blocker = Blocker::new(" Waiting on logo files ", BlockerSeverity::High, now).unwrap();
        assert_eq!(blocker.description, "Waiting on logo files");
        assert!(!blocker.id.is_empty());
    }

    fn signals(status: ProjectStatus) -> HealthSignals<'static> {
        HealthSignals {
            status,
            current_phase: Phase::Discovery,
            blockers: &[],
            pending_revisions: 0,
            last_accessed_at: None,
            sent_at: None,
        }
    }

    #[test]
    fn healthy_project_scores_full() {
        assert_eq!(compute_health_score(&signals(ProjectStatus::Draft), Utc::now()), 100);
    }

    #[test]
    fn blockers_and_revisions_reduce_score() {
        let now = Utc::now();
        let blockers = vec![
            Blocker::new("a", BlockerSeverity::Critical, now).unwrap(),
            Blocker::new("b", BlockerSeverity::Medium, now).unwrap(),
        ];
        let mut s = signals(ProjectStatus::Draft);
        s.blockers = &blockers;
        s.pending_revisions = 10;
        // 30 + 10 + capped 20
        assert_eq!(compute_health_score(&s, now), 40);
    }

    #[test]
    fn inactivity_only_counts_while_respondent_can_act() {
        let now = Utc::now();
        let mut s = signals(ProjectStatus::Sent);
        s.sent_at = Some(now - Duration::days(10));
        assert_eq!(compute_health_score(&s, now), 80);

        s.last_accessed_at = Some(now - Duration::days(1));
        assert_eq!(compute_health_score(&s, now), 100);

        let mut done = signals(ProjectStatus::Draft);
        done.sent_at = Some(now - Duration::days(30));
        assert_eq!(compute_health_score(&done, now), 100);
    }

    #[test]
    fn phase_lag_is_penalized() {
        let now = Utc::now();
        let s = signals(ProjectStatus::Completed);
        assert_eq!(compute_health_score(&s, now), 90);
    }

    #[test]
    fn score_never_underflows() {
        let now = Utc::now();
        let blockers: Vec<_> = (0..10)
            .map(|_| Blocker::new("x", BlockerSeverity::Critical, now).unwrap())
            .collect();
        let mut s = signals(ProjectStatus::Draft);
        s.blockers = &blockers;
        assert_eq!(compute_health_score(&s, now), 0);
    }
}
