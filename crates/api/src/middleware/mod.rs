//! Caller identification extractors.
//!
//! - [`auth::AuthUser`] -- owner session from a JWT Bearer token.
//! - [`auth::MagicToken`] -- respondent token from header or query.
//! - [`auth::Participant`] -- either of the two, decided by the presence of
//!   an `Authorization` header.

pub mod auth;
