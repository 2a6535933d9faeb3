//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO carrying the caller-supplied fields for inserts

pub mod asset;
pub mod brief;
pub mod lifecycle;
pub mod message;
pub mod notification;
pub mod project;
pub mod response;
pub mod revision_request;
