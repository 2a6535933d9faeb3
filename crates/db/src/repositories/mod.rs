//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Commands that touch more than one
//! table open their own transaction.

pub mod asset_repo;
pub mod brief_repo;
pub mod lifecycle_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod response_repo;
pub mod revision_request_repo;

pub use asset_repo::AssetRepo;
pub use brief_repo::BriefRepo;
pub use lifecycle_repo::LifecycleRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use response_repo::ResponseRepo;
pub use revision_request_repo::RevisionRequestRepo;
