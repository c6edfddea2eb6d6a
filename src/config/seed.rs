//! Seed data loading from config.toml
//!
//! The profiles and transactions listed under `[[profiles]]` and
//! `[[transactions]]` are published through the bus at startup, so the store
//! is populated exactly the way runtime changes populate it. When no seed is
//! configured the built-in demo roster is used.

use crate::{
    core::bus::{NotificationBus, ProfileEvent, TransactionEvent},
    entities::{
        Profile, ROOT_ADMIN_ID, Role, Transaction, TransactionKind, TransactionStatus, avatar_url,
    },
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

/// Initial collections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    /// Profiles to register, in display order
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Transactions to record, oldest first
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Seed {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty() && self.transactions.is_empty()
    }

    /// The demo roster: the root admin, three employees and January contributions.
    #[must_use]
    pub fn demo(offset: FixedOffset) -> Self {
        let day = |month: u32, day: u32| local_midnight(offset, 2026, month, day);
        let profile = |id: &str,
                       name: &str,
                       email: &str,
                       role: Role,
                       balance: f64,
                       pin: &str,
                       created_at: DateTime<Utc>| Profile {
            id: id.to_string(),
            full_name: name.to_string(),
            email: email.to_string(),
            role,
            balance,
            pin: pin.to_string(),
            profile_pic: Some(avatar_url(name.split(' ').next().unwrap_or(name))),
            created_at,
        };
        let transaction = |id: &str,
                           profile_id: &str,
                           amount: f64,
                           kind: TransactionKind,
                           description: &str,
                           created_at: DateTime<Utc>| Transaction {
            id: id.to_string(),
            profile_id: profile_id.to_string(),
            amount,
            kind,
            status: TransactionStatus::Approved,
            description: description.to_string(),
            created_at,
        };

        Self {
            profiles: vec![
                profile(
                    ROOT_ADMIN_ID,
                    "Master Administrator",
                    "admin@createever.com",
                    Role::Admin,
                    0.0,
                    "1234",
                    day(1, 1),
                ),
                profile(
                    "EMP-001",
                    "Sarah Chen",
                    "sarah@createever.com",
                    Role::Employee,
                    4200.0,
                    "1111",
                    day(1, 5),
                ),
                profile(
                    "EMP-002",
                    "Marcus Bell",
                    "marcus@createever.com",
                    Role::Employee,
                    2100.0,
                    "2222",
                    day(1, 10),
                ),
                profile(
                    "EMP-003",
                    "Elena Vance",
                    "elena@createever.com",
                    Role::Employee,
                    -500.0,
                    "3333",
                    day(1, 15),
                ),
            ],
            transactions: vec![
                transaction(
                    "t1",
                    "EMP-001",
                    500.0,
                    TransactionKind::Deposit,
                    "Monthly Contribution",
                    day(1, 20),
                ),
                transaction(
                    "t2",
                    "EMP-002",
                    300.0,
                    TransactionKind::Deposit,
                    "Monthly Contribution",
                    day(1, 22),
                ),
                transaction(
                    "t3",
                    "EMP-003",
                    500.0,
                    TransactionKind::Withdrawal,
                    "Emergency Advance",
                    day(1, 25),
                ),
            ],
        }
    }

    /// Publishes every seeded entity on `bus`.
    pub fn publish(&self, bus: &NotificationBus) {
        if !self.profiles.iter().any(Profile::is_root_admin) {
            warn!("Seed has no root admin profile; member management will be unavailable");
        }
        for profile in &self.profiles {
            bus.notify(ProfileEvent::Upserted(profile.clone()));
        }
        for transaction in &self.transactions {
            bus.notify(TransactionEvent::Recorded(transaction.clone()));
        }
        info!(
            profiles = self.profiles.len(),
            transactions = self.transactions.len(),
            "Seed data published"
        );
    }
}

/// Midnight of the given local date at `offset`, as UTC.
#[must_use]
pub fn local_midnight(offset: FixedOffset, year: i32, month: u32, day: u32) -> DateTime<Utc> {
    offset
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .map_or_else(Utc::now, |local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::store::{ViewStore, attach};
    use crate::test_utils::gmt6;

    #[test]
    fn test_parse_seed_tables() {
        let toml_str = r#"
            [[profiles]]
            id = "@admin"
            full_name = "Master Administrator"
            email = "admin@createever.com"
            role = "admin"
            balance = 0.0
            pin = "1234"
            created_at = "2026-01-01T00:00:00+06:00"

            [[transactions]]
            id = "t1"
            profile_id = "EMP-001"
            amount = 500.0
            type = "deposit"
            description = "Monthly Contribution"
            created_at = "2026-01-20T00:00:00+06:00"
        "#;

        let seed: Seed = toml::from_str(toml_str).unwrap();
        assert_eq!(seed.profiles.len(), 1);
        assert!(seed.profiles[0].is_admin());
        assert!(seed.profiles[0].profile_pic.is_none());
        assert_eq!(seed.transactions[0].kind, TransactionKind::Deposit);
        assert_eq!(seed.transactions[0].status, TransactionStatus::Approved);
        assert_eq!(
            seed.transactions[0].created_at,
            local_midnight(gmt6(), 2026, 1, 20)
        );
    }

    #[test]
    fn test_publish_populates_attached_store() {
        let bus = NotificationBus::new();
        let store = ViewStore::new().shared();
        let _subs = attach(&bus, &store);

        Seed::demo(gmt6()).publish(&bus);

        let store = store.read();
        assert_eq!(store.profiles().len(), 4);
        assert_eq!(store.profiles()[0].id, ROOT_ADMIN_ID);
        let ids: Vec<&str> = store.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_duplicate_seed_ids_collapse_to_last() {
        let mut seed = Seed::demo(gmt6());
        let mut duplicate = seed.profiles[1].clone();
        duplicate.balance = 1.0;
        seed.profiles.push(duplicate);

        let bus = NotificationBus::new();
        let store = ViewStore::new().shared();
        let _subs = attach(&bus, &store);
        seed.publish(&bus);

        let store = store.read();
        assert_eq!(store.profiles().len(), 4);
        assert_eq!(store.profile("EMP-001").unwrap().balance, 1.0);
    }
}
