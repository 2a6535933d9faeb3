//! The coordination core: every operation an owner or a respondent can
//! perform on a project.
//!
//! Operations are grouped into zero-sized component structs whose methods
//! take the shared [`WorkflowContext`] and the caller's
//! [`ActorContext`](brieflink_core::actor::ActorContext) explicitly. Each
//! one resolves role, input validation and access before it mutates
//! anything, and hands notifications to the dispatcher as a detached side
//! effect after the primary write has committed.

pub mod access;
pub mod activity;
pub mod context;
pub mod deliverables;
pub mod inbox;
pub mod lifecycle;
pub mod questionnaire;
pub mod revision;
pub mod share;
pub mod submission;
pub mod views;

pub use activity::ActivityFeed;
pub use context::WorkflowContext;
pub use deliverables::Deliverables;
pub use inbox::Inbox;
pub use lifecycle::LifecycleEngine;
pub use questionnaire::Questionnaire;
pub use revision::RevisionWorkflow;
pub use share::ShareLinks;
pub use submission::SubmissionPipeline;
