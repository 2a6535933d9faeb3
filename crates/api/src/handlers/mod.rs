pub mod activity;
pub mod deliverables;
pub mod notification;
pub mod portal;
pub mod project;
pub mod revision;
pub mod shared;
