//! Transaction business logic - Deposit and withdrawal confirmation.
//!
//! A confirmation is a small state machine: it starts `Closed`, is opened for a
//! target profile and a kind, collects an amount, and is either confirmed
//! (publishing the transaction and the updated profile) or aborted. Withdrawals
//! may take a balance below zero; no overdraft limit is enforced.

use crate::{
    core::{
        bus::{NotificationBus, ProfileEvent, TransactionEvent},
        ids,
        store::SharedStore,
    },
    entities::{Profile, Transaction, TransactionKind, TransactionStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use tracing::{info, warn};

/// A transaction waiting for its amount.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    /// Id of the profile the transaction applies to
    pub profile_id: String,
    /// Display name of the target, for prompts
    pub full_name: String,
    /// Deposit or withdrawal
    pub kind: TransactionKind,
    /// Raw amount as typed by the user
    pub amount_input: String,
}

/// Confirmation state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Confirmation {
    /// No transaction in progress
    #[default]
    Closed,
    /// Waiting for a valid amount
    AmountEntry(PendingTransaction),
}

impl Confirmation {
    /// Opens amount entry for `profile`, discarding any earlier draft.
    pub fn open(&mut self, profile: &Profile, kind: TransactionKind) {
        *self = Self::AmountEntry(PendingTransaction {
            profile_id: profile.id.clone(),
            full_name: profile.full_name.clone(),
            kind,
            amount_input: String::new(),
        });
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingTransaction> {
        match self {
            Self::Closed => None,
            Self::AmountEntry(pending) => Some(pending),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::AmountEntry(_))
    }

    /// Replaces the typed amount.
    pub fn enter_amount(&mut self, input: &str) -> Result<()> {
        match self {
            Self::Closed => Err(Error::NoTransactionOpen),
            Self::AmountEntry(pending) => {
                input.trim().clone_into(&mut pending.amount_input);
                Ok(())
            }
        }
    }

    /// Aborts amount entry and discards the typed amount.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Validates the amount and publishes the transaction.
    ///
    /// On a validation error the state stays in amount entry so the user can
    /// correct the value. On success the state returns to `Closed`.
    pub fn confirm(&mut self, bus: &NotificationBus, store: &SharedStore) -> Result<Transaction> {
        let Self::AmountEntry(pending) = self else {
            return Err(Error::NoTransactionOpen);
        };

        let amount = parse_amount(&pending.amount_input)?;
        let transaction = post_transaction(bus, store, &pending.profile_id, pending.kind, amount)?;
        *self = Self::Closed;
        Ok(transaction)
    }
}

/// Parses a user-typed amount; it must be a finite number greater than zero.
pub fn parse_amount(input: &str) -> Result<f64> {
    let invalid = || Error::InvalidAmount {
        input: input.to_string(),
    };
    let amount: f64 = input.trim().parse().map_err(|_| invalid())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid());
    }
    Ok(amount)
}

/// Records a transaction against the current state of `profile_id`.
///
/// Publishes the transaction on the transactions channel first, then the
/// profile with its new balance on the profiles channel.
pub fn post_transaction(
    bus: &NotificationBus,
    store: &SharedStore,
    profile_id: &str,
    kind: TransactionKind,
    amount: f64,
) -> Result<Transaction> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount {
            input: amount.to_string(),
        });
    }

    // Read the latest balance so a stale draft cannot overwrite newer changes
    let (profile, id) = {
        let store = store.read();
        let profile = store.profile(profile_id).cloned().ok_or_else(|| {
            warn!(profile_id, "Transaction target no longer exists");
            Error::ProfileNotFound {
                id: profile_id.to_string(),
            }
        })?;
        let id = ids::mint(kind.id_prefix(), ids::TRANSACTION_SUFFIX_LEN, |candidate| {
            store.transactions().iter().any(|t| t.id == candidate)
        });
        (profile, id)
    };

    let transaction = Transaction {
        id,
        profile_id: profile.id.clone(),
        amount,
        kind,
        status: TransactionStatus::Approved,
        description: format!("Disbursement: {}", kind.to_string().to_uppercase()),
        created_at: Utc::now(),
    };
    let new_balance = kind.apply(profile.balance, amount);

    bus.notify(TransactionEvent::Recorded(transaction.clone()));
    bus.notify(ProfileEvent::Upserted(Profile {
        balance: new_balance,
        ..profile
    }));

    info!(
        transaction_id = %transaction.id,
        profile_id = %transaction.profile_id,
        %kind,
        amount,
        new_balance,
        "Transaction finalized"
    );
    Ok(transaction)
}
