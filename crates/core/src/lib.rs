//! Domain vocabulary for the brieflink coordination core.
//!
//! Everything in this crate is pure: no storage, no network. The `db`,
//! `events` and `workflow` crates build on these types.

#[macro_use]
mod macros;

pub mod access_token;
pub mod activity;
pub mod actor;
pub mod brief;
pub mod error;
pub mod lifecycle;
pub mod notification;
pub mod project;
pub mod revision;
pub mod steps;
pub mod types;
