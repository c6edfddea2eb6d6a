//! Transaction entity - An immutable record of a balance-affecting event.
//!
//! Each transaction references a profile by id (not enforced), carries a positive
//! amount, a kind (deposit/withdrawal), a status, a description and a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money paid into the fund
    Deposit,
    /// Money paid out of the fund
    Withdrawal,
}

impl TransactionKind {
    /// Applies this kind to a balance. Withdrawals may drive the balance negative.
    #[must_use]
    pub fn apply(self, balance: f64, amount: f64) -> f64 {
        match self {
            Self::Deposit => balance + amount,
            Self::Withdrawal => balance - amount,
        }
    }

    /// Single-letter prefix used for generated transaction ids
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Deposit => "D",
            Self::Withdrawal => "W",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

/// Approval state. Every flow creates transactions as `Approved`; the other states are reserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting review
    Pending,
    /// Applied to the balance
    #[default]
    Approved,
    /// Refused
    Rejected,
}

/// Transaction model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    /// Id of the profile this transaction belongs to
    pub profile_id: String,
    /// Positive magnitude in dollars
    pub amount: f64,
    /// Deposit or withdrawal
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Approval state
    #[serde(default)]
    pub status: TransactionStatus,
    /// Human-readable description
    pub description: String,
    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}
