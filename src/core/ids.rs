//! Identifier minting for new transactions and members.
//!
//! Ids are short uppercase hex suffixes cut from a random uuid behind a
//! prefix (`D-4F9A2C`, `EMP-7E1C`). Every candidate is checked against ids
//! already taken so a fresh id never collides with a stored one.

use uuid::Uuid;

/// Length of the random part of a transaction id
pub const TRANSACTION_SUFFIX_LEN: usize = 6;
/// Length of the random part of a member id
pub const MEMBER_SUFFIX_LEN: usize = 4;

/// Leading hex digits of a v4 uuid, uppercased. At most 32 characters.
fn random_suffix(len: usize) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(len);
    suffix.make_ascii_uppercase();
    suffix
}

/// Mints `{prefix}-{suffix}` ids that `is_taken` reports as unused.
pub fn mint(prefix: &str, suffix_len: usize, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = format!("{prefix}-{}", random_suffix(suffix_len));
        if !is_taken(&candidate) {
            return candidate;
        }
        tracing::trace!(%candidate, "Generated id already taken, retrying");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn test_mint_shape() {
        let id = mint("D", TRANSACTION_SUFFIX_LEN, |_| false);
        assert!(id.starts_with("D-"));
        let suffix = &id[2..];
        assert_eq!(suffix.len(), TRANSACTION_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_mint_skips_taken_ids() {
        let attempts = Cell::new(0);
        let id = mint("EMP", MEMBER_SUFFIX_LEN, |_| {
            attempts.set(attempts.get() + 1);
            attempts.get() < 3
        });
        assert_eq!(attempts.get(), 3);
        assert!(id.starts_with("EMP-"));
    }

    #[test]
    fn test_mint_produces_distinct_ids() {
        let ids: HashSet<String> = (0..200)
            .map(|_| mint("W", TRANSACTION_SUFFIX_LEN, |_| false))
            .collect();
        assert!(ids.len() > 195);
    }
}
