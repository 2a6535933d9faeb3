//! Respondent access tokens and share tokens.
//!
//! A project carries two independent secrets: the access token embedded in
//! the respondent's link (read + write) and an optional share token that
//! exposes the finished brief read-only. Both are generated here and both
//! are checked with [`verify_token`], whose running time depends only on the
//! token length, never on where the first mismatching byte sits.

use rand::Rng;
use subtle::ConstantTimeEq;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of a generated token (alphanumeric characters, ~285 bits).
pub const TOKEN_LENGTH: usize = 48;

/// Header carrying the respondent token.
pub const TOKEN_HEADER: &str = "x-magic-token";

/// Query parameter carrying the respondent token.
pub const TOKEN_QUERY_PARAM: &str = "token";

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

/// Generate a fresh random token.
///
/// Every call draws new randomness; callers issue the access token and the
/// share token through separate calls so one never reveals the other.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Compare a presented token with the stored one.
///
/// Returns `false` when either side is missing or empty, or when the lengths
/// differ (token length is public). Otherwise the bytes are compared in
/// constant time.
pub fn verify_token(presented: Option<&str>, stored: Option<&str>) -> bool {
    let (Some(presented), Some(stored)) = (presented, stored) else {
        return false;
    };
    if presented.is_empty() || stored.is_empty() {
        return false;
    }
    if presented.len() != stored.len() {
        return false;
    }
    constant_time_eq(presented.as_bytes(), stored.as_bytes())
}

/// Equal-length byte comparison that always inspects every byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    #[cfg(test)]
    tests::CT_COMPARISONS.with(|n| n.set(n.get() + 1));
    a.ct_eq(b).into()
}

/// Pick the token a respondent presented.
///
/// The header wins over the query parameter when both carry a value. Blank
/// values are treated as absent.
pub fn select_presented_token<'a>(
    header: Option<&'a str>,
    query: Option<&'a str>,
) -> Option<&'a str> {
    let non_blank = |v: &&str| !v.trim().is_empty();
    header
        .filter(non_blank)
        .or_else(|| query.filter(non_blank))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    thread_local! {
        /// Number of comparisons routed through [`constant_time_eq`].
        pub(super) static CT_COMPARISONS: Cell<usize> = const { Cell::new(0) };
    }

    /// Run `verify_token` and report how many constant-time comparisons it made.
    fn verify_counting(presented: &str, stored: &str) -> (bool, usize) {
        let before = CT_COMPARISONS.with(Cell::get);
        let verdict = verify_token(Some(presented), Some(stored));
        (verdict, CT_COMPARISONS.with(Cell::get) - before)
    }

    #[test]
    fn length_mismatch_skips_byte_comparison() {
        let token = generate_token();
        let (verdict, comparisons) = verify_counting(&token[..TOKEN_LENGTH - 1], &token);
        assert!(!verdict);
        assert_eq!(comparisons, 0);
    }

    #[test]
    fn generated_token_has_expected_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_tokens_are_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn matching_token_verifies() {
        let token = generate_token();
        assert!(verify_token(Some(&token), Some(&token)));
    }

    #[test]
    fn missing_or_empty_tokens_fail() {
        let token = generate_token();
        assert!(!verify_token(None, Some(&token)));
        assert!(!verify_token(Some(&token), None));
        assert!(!verify_token(Some(""), Some("")));
        assert!(!verify_token(None, None));
    }

    #[test]
    fn header_takes_precedence_over_query() {
        assert_eq!(select_presented_token(Some("h"), Some("q")), Some("h"));
        assert_eq!(select_presented_token(None, Some("q")), Some("q"));
        assert_eq!(select_presented_token(Some("  "), Some("q")), Some("q"));
        assert_eq!(select_presented_token(None, Some("")), None);
    }

    proptest! {
        #[test]
        fn verify_agrees_with_equality_for_equal_lengths(
            a in "[A-Za-z0-9]{48}",
            b in "[A-Za-z0-9]{48}",
        ) {
            prop_assert_eq!(verify_token(Some(&a), Some(&b)), a == b);
        }

        #[test]
        fn single_byte_flip_anywhere_fails(
            token in "[A-Za-z0-9]{48}",
            pos in 0usize..48,
        ) {
            let mut bytes = token.clone().into_bytes();
            bytes[pos] = if bytes[pos] == b'a' { b'b' } else { b'a' };
            let tampered = String::from_utf8(bytes).unwrap();
            prop_assert!(!verify_token(Some(&tampered), Some(&token)));
        }

        #[test]
        fn equal_lengths_always_take_the_constant_time_path(
            token in "[A-Za-z0-9]{1,64}",
        ) {
            let (verdict, comparisons) = verify_counting(&token, &token);
            prop_assert!(verdict);
            prop_assert_eq!(comparisons, 1);

            // Every mismatch position yields the same verdict through the
            // same single comparison.
            for pos in 0..token.len() {
                let mut bytes = token.clone().into_bytes();
                bytes[pos] = if bytes[pos] == b'x' { b'y' } else { b'x' };
                let tampered = String::from_utf8(bytes).unwrap();

                let (verdict, comparisons) = verify_counting(&tampered, &token);
                prop_assert!(!verdict, "mismatch at byte {} verified", pos);
                prop_assert_eq!(comparisons, 1, "mismatch at byte {} bypassed ct_eq", pos);
            }
        }
    }
}
