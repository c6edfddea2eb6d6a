//! Core business logic - framework-agnostic notification, store and fund operations.

/// Two-step login flow
pub mod auth;
/// Channel-keyed publish/subscribe bus
pub mod bus;
/// Fresh id generation
pub mod ids;
/// Member registration, editing and deletion
pub mod member;
/// Aggregations over the current collections
pub mod report;
/// In-memory collections kept in sync with the bus
pub mod store;
/// Deposit/withdrawal confirmation
pub mod transaction;
