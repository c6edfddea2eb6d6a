//! Unified error types for the fund console.
//!
//! Every error here is local and recoverable: the console turns each one into a
//! user-facing message and leaves the store untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Invalid amount '{input}': must be a number greater than zero")]
    InvalidAmount { input: String },

    #[error("Required field '{field}' is missing")]
    MissingField { field: &'static str },

    #[error("PIN must be exactly 4 digits")]
    InvalidPinFormat,

    #[error("Clearance failed: ID '{identifier}' not found")]
    IdentityNotFound { identifier: String },

    #[error("Authentication PIN invalid")]
    InvalidPin,

    #[error("Operation denied: {action} requires administrator clearance")]
    Unauthorized { action: &'static str },

    #[error("Operation denied: cannot delete root admin '{id}'")]
    ProtectedProfile { id: String },

    #[error("Profile '{id}' already exists")]
    DuplicateProfile { id: String },

    #[error("Profile '{id}' not found")]
    ProfileNotFound { id: String },

    #[error("No transaction is open")]
    NoTransactionOpen,

    #[error("Unknown command: {input}")]
    UnknownCommand { input: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
