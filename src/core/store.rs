//! View store - The in-memory profile and transaction collections every screen reads.
//!
//! The store is only changed by applying bus events: profile upserts replace in
//! place or append, profile deletions filter, transactions are prepended. The
//! active session lives here too so a balance change to the logged-in member is
//! reflected in the session immediately.

use crate::{
    core::bus::{NotificationBus, ProfileEvent, Subscription, TransactionEvent},
    entities::{Profile, Transaction},
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Store shared between the bus handlers and the console.
pub type SharedStore = Arc<RwLock<ViewStore>>;

/// Profile and transaction collections plus the active session.
#[derive(Debug, Clone, Default)]
pub struct ViewStore {
    profiles: Vec<Profile>,
    transactions: Vec<Transaction>,
    session: Option<Profile>,
}

impl ViewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a store for sharing with bus handlers.
    #[must_use]
    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Profiles in insertion order
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Transactions, most recent first
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The logged-in profile, if any
    #[must_use]
    pub const fn session(&self) -> Option<&Profile> {
        self.session.as_ref()
    }

    pub fn begin_session(&mut self, profile: Profile) {
        info!(profile_id = %profile.id, "Session started");
        self.session = Some(profile);
    }

    pub fn end_session(&mut self) -> Option<Profile> {
        let ended = self.session.take();
        if let Some(profile) = &ended {
            info!(profile_id = %profile.id, "Session ended");
        }
        ended
    }

    pub fn apply_profile_event(&mut self, event: &ProfileEvent) {
        match event {
            ProfileEvent::Upserted(profile) => self.upsert_profile(profile.clone()),
            ProfileEvent::Deleted { id } => self.remove_profile(id),
        }
    }

    pub fn apply_transaction_event(&mut self, event: &TransactionEvent) {
        match event {
            TransactionEvent::Recorded(transaction) => self.upsert_transaction(transaction.clone()),
        }
    }

    fn upsert_profile(&mut self, profile: Profile) {
        if self
            .session
            .as_ref()
            .is_some_and(|current| current.id == profile.id)
        {
            self.session = Some(profile.clone());
        }

        if let Some(existing) = self.profiles.iter_mut().find(|p| p.id == profile.id) {
            debug!(profile_id = %profile.id, "Profile replaced");
            *existing = profile;
        } else {
            debug!(profile_id = %profile.id, "Profile appended");
            self.profiles.push(profile);
        }
    }

    fn remove_profile(&mut self, id: &str) {
        if id == crate::entities::ROOT_ADMIN_ID {
            warn!(profile_id = id, "Ignoring deletion of root admin");
            return;
        }

        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            debug!(profile_id = id, "Deletion for unknown profile ignored");
            return;
        }

        if self.session.as_ref().is_some_and(|current| current.id == id) {
            warn!(profile_id = id, "Active profile was deleted, ending session");
            self.session = None;
        }
    }

    fn upsert_transaction(&mut self, transaction: Transaction) {
        self.transactions.retain(|t| t.id != transaction.id);
        debug!(transaction_id = %transaction.id, "Transaction prepended");
        self.transactions.insert(0, transaction);
    }
}

/// Subscriptions that keep a [`SharedStore`] in sync with a bus.
#[derive(Debug)]
#[must_use = "dropping the handle leaves the store attached; call detach() on teardown"]
pub struct StoreSubscriptions {
    profiles: Subscription,
    transactions: Subscription,
}

impl StoreSubscriptions {
    /// Stops the store from reacting to further events.
    pub fn detach(self) {
        self.profiles.unsubscribe();
        self.transactions.unsubscribe();
    }
}

/// Subscribes `store` to both channels of `bus`.
pub fn attach(bus: &NotificationBus, store: &SharedStore) -> StoreSubscriptions {
    let profile_store = Arc::clone(store);
    let profiles = bus.subscribe_profiles(move |event| {
        profile_store.write().apply_profile_event(event);
    });

    let transaction_store = Arc::clone(store);
    let transactions = bus.subscribe_transactions(move |event| {
        transaction_store.write().apply_transaction_event(event);
    });

    StoreSubscriptions {
        profiles,
        transactions,
    }
}
