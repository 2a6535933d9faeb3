//! Primitive id and time types shared by every crate.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Canonical textual form of a [`DbId`]: a positive decimal without sign,
/// padding or surrounding whitespace, at most 18 digits so it always fits.
static DB_ID_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{0,17}$").expect("static regex is valid"));

/// Parse an externally supplied identifier, rejecting anything that is not
/// in canonical form before it can reach the record store.
pub fn parse_db_id(raw: &str, entity: &str) -> Result<DbId, CoreError> {
    if !DB_ID_FORMAT.is_match(raw) {
        return Err(CoreError::Validation(format!(
            "Malformed {entity} identifier"
        )));
    }
    raw.parse::<DbId>()
        .map_err(|_| CoreError::Validation(format!("Malformed {entity} identifier")))
}
