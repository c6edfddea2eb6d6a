//! Member management - Registration, editing and deletion of fund members.
//!
//! Every mutation requires an administrator and is published on the bus, so
//! deletions reach every subscribed view the same way upserts do. The root
//! administrator can never be deleted, whoever asks.

use crate::{
    core::{
        bus::{NotificationBus, ProfileEvent},
        ids,
        store::SharedStore,
    },
    entities::{PIN_LENGTH, Profile, ROOT_ADMIN_ID, Role, avatar_url},
    errors::{Error, Result},
};
use chrono::Utc;
use tracing::{info, warn};

/// Registration form fields as typed by the administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberForm {
    /// Requested id; a fresh `EMP-XXXX` id is generated when empty
    pub id: Option<String>,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Opening balance; defaults to zero when empty
    pub balance: Option<String>,
    /// Login PIN, exactly four digits
    pub pin: String,
}

impl MemberForm {
    /// Pre-fills the form from an existing profile, for editing.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: Some(profile.id.clone()),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            balance: Some(profile.balance.to_string()),
            pin: profile.pin.clone(),
        }
    }

    fn validate(&self) -> Result<f64> {
        if self.full_name.trim().is_empty() {
            return Err(Error::MissingField { field: "full_name" });
        }
        if self.email.trim().is_empty() {
            return Err(Error::MissingField { field: "email" });
        }
        if self.pin.trim().is_empty() {
            return Err(Error::MissingField { field: "pin" });
        }
        let pin = self.pin.trim();
        if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidPinFormat);
        }

        match self.balance.as_deref().map(str::trim) {
            None | Some("") => Ok(0.0),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|balance| balance.is_finite())
                .ok_or_else(|| Error::InvalidAmount {
                    input: raw.to_string(),
                }),
        }
    }
}

fn require_admin(actor: &Profile, action: &'static str) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        warn!(actor = %actor.id, action, "Refused non-admin member management");
        Err(Error::Unauthorized { action })
    }
}

/// Creates a member, or replaces `editing` when given, and publishes it.
///
/// When editing, the id, role and creation time of the existing profile are kept.
pub fn save_member(
    bus: &NotificationBus,
    store: &SharedStore,
    actor: &Profile,
    form: &MemberForm,
    editing: Option<&Profile>,
) -> Result<Profile> {
    require_admin(actor, "saving a member")?;
    let balance = form.validate()?;
    let full_name = form.full_name.trim().to_string();

    let profile = match editing {
        Some(existing) => Profile {
            id: existing.id.clone(),
            full_name: full_name.clone(),
            email: form.email.trim().to_string(),
            role: existing.role,
            balance,
            pin: form.pin.trim().to_string(),
            profile_pic: Some(avatar_url(&full_name)),
            created_at: existing.created_at,
        },
        None => {
            let id = match form.id.as_deref().map(str::trim) {
                Some(requested) if !requested.is_empty() => {
                    if store.read().profile(requested).is_some() {
                        warn!(
                            actor = %actor.id,
                            id = requested,
                            "Refused registration over an existing profile"
                        );
                        return Err(Error::DuplicateProfile {
                            id: requested.to_string(),
                        });
                    }
                    requested.to_string()
                }
                _ => {
                    let store = store.read();
                    ids::mint("EMP", ids::MEMBER_SUFFIX_LEN, |candidate| {
                        store.profile(candidate).is_some()
                    })
                }
            };
            Profile {
                id,
                full_name: full_name.clone(),
                email: form.email.trim().to_string(),
                role: Role::Employee,
                balance,
                pin: form.pin.trim().to_string(),
                profile_pic: Some(avatar_url(&full_name)),
                created_at: Utc::now(),
            }
        }
    };

    bus.notify(ProfileEvent::Upserted(profile.clone()));
    info!(
        profile_id = %profile.id,
        edited = editing.is_some(),
        "Registry updated"
    );
    Ok(profile)
}

/// First step of deletion: resolves the target and refuses protected profiles.
pub fn initiate_delete(store: &SharedStore, actor: &Profile, id: &str) -> Result<Profile> {
    if id == ROOT_ADMIN_ID {
        warn!(actor = %actor.id, "Refused deletion of root admin");
        return Err(Error::ProtectedProfile { id: id.to_string() });
    }
    require_admin(actor, "deleting a member")?;

    store
        .read()
        .profile(id)
        .cloned()
        .ok_or_else(|| Error::ProfileNotFound { id: id.to_string() })
}

/// Deletes a member by publishing a deletion event.
pub fn delete_member(
    bus: &NotificationBus,
    store: &SharedStore,
    actor: &Profile,
    id: &str,
) -> Result<Profile> {
    let target = initiate_delete(store, actor, id)?;
    bus.notify(ProfileEvent::Deleted {
        id: target.id.clone(),
    });
    info!(profile_id = %target.id, "Personnel purged");
    Ok(target)
}
