//! Profile entity - Represents a fund member or the administrator.
//!
//! Each profile has an id, display name, email, role, signed balance, a plaintext
//! PIN, and a cosmetic avatar URL. A negative balance means the member owes the fund.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier reserved for the root administrator. This profile can never be deleted.
pub const ROOT_ADMIN_ID: &str = "@admin";

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Access level of a profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage members and see every screen
    Admin,
    /// Regular fund member
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Employee => f.write_str("employee"),
        }
    }
}

/// Profile model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier (`@admin` for the root administrator, `EMP-xxxx` by convention otherwise)
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Contact email, also accepted as a login identifier
    pub email: String,
    /// Access level
    pub role: Role,
    /// Fund balance in dollars; negative when the member owes the fund
    pub balance: f64,
    /// Shared-secret PIN, stored and compared in clear
    pub pin: String,
    /// Avatar URL derived from the display name
    #[serde(rename = "profilePic", default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn is_root_admin(&self) -> bool {
        self.id == ROOT_ADMIN_ID
    }

    #[must_use]
    pub fn is_debtor(&self) -> bool {
        self.role == Role::Employee && self.balance < 0.0
    }

    /// Returns true when `identifier` names this profile by id or email, ignoring case.
    #[must_use]
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.id.eq_ignore_ascii_case(identifier) || self.email.eq_ignore_ascii_case(identifier)
    }
}

/// Derives the avatar URL for a display name. Purely cosmetic.
#[must_use]
pub fn avatar_url(full_name: &str) -> String {
    let seed: String = full_name
        .chars()
        .map(|c| if c.is_whitespace() { '+' } else { c })
        .collect();
    format!("{AVATAR_BASE_URL}{seed}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::employee;

    #[test]
    fn test_matches_identifier_ignores_case() {
        let profile = employee("EMP-001", 10.0);
        assert!(profile.matches_identifier("emp-001"));
        assert!(profile.matches_identifier("EMP-001@CREATEEVER.COM"));
        assert!(!profile.matches_identifier("EMP-002"));
    }

    #[test]
    fn test_is_debtor_only_for_negative_employees() {
        assert!(employee("EMP-003", -500.0).is_debtor());
        assert!(!employee("EMP-001", 0.0).is_debtor());

        let mut admin = employee(ROOT_ADMIN_ID, -1.0);
        admin.role = Role::Admin;
        assert!(!admin.is_debtor());
        assert!(admin.is_root_admin());
    }

    #[test]
    fn test_avatar_url_is_deterministic() {
        assert_eq!(
            avatar_url("Sarah Chen"),
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Sarah+Chen"
        );
        assert_eq!(avatar_url("Sarah Chen"), avatar_url("Sarah Chen"));
    }

    #[test]
    fn test_profile_serializes_avatar_as_profile_pic() {
        let mut profile = employee("EMP-001", 1.0);
        profile.profile_pic = Some(avatar_url("Sarah"));
        let toml = toml::to_string(&profile).unwrap();
        assert!(toml.contains("profilePic"));
        assert!(toml.contains("role = \"employee\""));
    }
}
