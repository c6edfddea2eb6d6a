//! Two-step login: identity first, then PIN.
//!
//! The identity step accepts a profile id or email, case-insensitively. The PIN
//! step keeps only the first four digits typed, re-resolves the identifier
//! against the current profiles and compares the PIN by plain string equality.
//! There is no lockout or rate limiting.

use crate::{
    entities::{PIN_LENGTH, Profile},
    errors::{Error, Result},
};
use tracing::{info, warn};

/// Where the login form currently is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoginStep {
    /// Waiting for an id or email
    #[default]
    Identity,
    /// Waiting for the PIN belonging to `identifier`
    Pin {
        /// Identifier accepted by the first step, as typed
        identifier: String,
    },
}

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginFlow {
    step: LoginStep,
    pin_input: String,
}

impl LoginFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> &LoginStep {
        &self.step
    }

    /// PIN typed so far; cleared after a failed attempt
    #[must_use]
    pub fn pin_input(&self) -> &str {
        &self.pin_input
    }

    /// Checks `identifier` against every profile's id and email.
    ///
    /// Advances to the PIN step on a match; otherwise stays on the identity step.
    pub fn submit_identity(&mut self, profiles: &[Profile], identifier: &str) -> Result<()> {
        let identifier = identifier.trim();
        if profiles.iter().any(|p| p.matches_identifier(identifier)) {
            self.step = LoginStep::Pin {
                identifier: identifier.to_string(),
            };
            self.pin_input.clear();
            Ok(())
        } else {
            warn!(identifier, "Login identity not found");
            Err(Error::IdentityNotFound {
                identifier: identifier.to_string(),
            })
        }
    }

    /// Checks `pin` for the identifier accepted in the first step.
    ///
    /// On success the form resets to the identity step and the matched profile
    /// is returned. On failure the form stays on the PIN step with the PIN cleared.
    pub fn submit_pin(&mut self, profiles: &[Profile], pin: &str) -> Result<Profile> {
        let LoginStep::Pin { identifier } = &self.step else {
            return Err(Error::IdentityNotFound {
                identifier: String::new(),
            });
        };

        self.pin_input = pin
            .chars()
            .filter(char::is_ascii_digit)
            .take(PIN_LENGTH)
            .collect();
        let matched = profiles
            .iter()
            .find(|p| p.matches_identifier(identifier) && p.pin == self.pin_input)
            .cloned();

        if let Some(profile) = matched {
            info!(profile_id = %profile.id, "Access granted");
            self.reset();
            Ok(profile)
        } else {
            warn!(identifier = %identifier, "Invalid PIN");
            self.pin_input.clear();
            Err(Error::InvalidPin)
        }
    }

    /// Returns from the PIN step to the identity step.
    pub fn back(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.step = LoginStep::Identity;
        self.pin_input.clear();
    }
}
