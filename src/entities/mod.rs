//! Entity module - Contains the two record types held by the view store.
//! Profiles are mutated by upsert and removed by deletion events; transactions
//! are only ever inserted.

pub mod profile;
pub mod transaction;

pub use profile::{PIN_LENGTH, Profile, ROOT_ADMIN_ID, Role, avatar_url};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
