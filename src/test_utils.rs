//! Shared test utilities for the fund console.
//!
//! This module provides helpers for building buses and stores wired together,
//! and for creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    config::seed::{Seed, local_midnight},
    core::{
        bus::NotificationBus,
        store::{SharedStore, StoreSubscriptions, ViewStore, attach},
    },
    entities::{Profile, Role, Transaction, TransactionKind, TransactionStatus},
};
use chrono::{FixedOffset, Utc};

/// The GMT+6 display offset used by the demo roster.
#[must_use]
pub fn gmt6() -> FixedOffset {
    FixedOffset::east_opt(6 * 3600).unwrap()
}

/// Creates an employee profile with sensible defaults.
///
/// # Defaults
/// * `full_name`: the id
/// * `email`: `{id}@createever.com`
/// * `pin`: `"0000"`
#[must_use]
pub fn employee(id: &str, balance: f64) -> Profile {
    Profile {
        id: id.to_string(),
        full_name: id.to_string(),
        email: format!("{id}@createever.com"),
        role: Role::Employee,
        balance,
        pin: "0000".to_string(),
        profile_pic: None,
        created_at: Utc::now(),
    }
}

/// Creates an approved transaction timestamped now.
#[must_use]
pub fn transaction(id: &str, profile_id: &str, amount: f64, kind: TransactionKind) -> Transaction {
    Transaction {
        id: id.to_string(),
        profile_id: profile_id.to_string(),
        amount,
        kind,
        status: TransactionStatus::Approved,
        description: "Test transaction".to_string(),
        created_at: Utc::now(),
    }
}

/// Creates an approved transaction at local midnight (GMT+6) of the given date.
#[must_use]
pub fn dated_transaction(
    id: &str,
    profile_id: &str,
    amount: f64,
    kind: TransactionKind,
    year: i32,
    month: u32,
    day: u32,
) -> Transaction {
    Transaction {
        created_at: local_midnight(gmt6(), year, month, day),
        ..transaction(id, profile_id, amount, kind)
    }
}

/// The demo roster: `@admin` (PIN 1234), `EMP-001` (1111), `EMP-002` (2222), `EMP-003` (3333).
#[must_use]
pub fn demo_profiles() -> Vec<Profile> {
    Seed::demo(gmt6()).profiles
}

/// An empty store attached to a fresh bus.
#[must_use]
pub fn attached_store() -> (NotificationBus, SharedStore, StoreSubscriptions) {
    let bus = NotificationBus::new();
    let store = ViewStore::new().shared();
    let subscriptions = attach(&bus, &store);
    (bus, store, subscriptions)
}

/// A store attached to a fresh bus and populated with the demo seed.
#[must_use]
pub fn demo_store() -> (NotificationBus, SharedStore, StoreSubscriptions) {
    let (bus, store, subscriptions) = attached_store();
    Seed::demo(gmt6()).publish(&bus);
    (bus, store, subscriptions)
}
