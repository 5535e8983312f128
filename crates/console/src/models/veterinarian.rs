//! Veterinarian record and provisioning form types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use alifi_core::{AccountId, Email, VeterinarianId};

use crate::error::ConsoleError;

/// A veterinarian's profile document (collection `veterinarians`, keyed by
/// the veterinarian's own account ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianRecord {
    /// The owning account ID; equals the document ID.
    pub uid: AccountId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub specialization: String,
    pub experience: String,
    #[serde(default)]
    pub license: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_online: bool,
    /// Verified on creation: the record is provisioned by an admin.
    pub is_verified: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    /// Discriminator read by the mobile clients.
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin-supplied form data for provisioning a new veterinarian.
#[derive(Debug, Clone)]
pub struct NewVeterinarian {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub specialization: String,
    pub experience: String,
    pub license: String,
    /// Initial password for the new account. Policy enforcement beyond
    /// non-empty is the provider's.
    pub password: SecretString,
}

impl NewVeterinarian {
    /// Pre-flight validation; makes no provider calls.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` naming the first missing field.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        use secrecy::ExposeSecret;

        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("specialization", &self.specialization),
            ("experience", &self.experience),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(ConsoleError::Validation(format!("{label} is required")));
            }
        }
        if self.password.expose_secret().is_empty() {
            return Err(ConsoleError::Validation("password is required".to_owned()));
        }
        Ok(())
    }

    /// Build the profile record for a freshly created account.
    #[must_use]
    pub fn into_record(self, uid: AccountId, now: DateTime<Utc>) -> VeterinarianRecord {
        VeterinarianRecord {
            uid,
            name: self.name,
            email: self.email,
            phone: self.phone,
            specialization: self.specialization,
            experience: self.experience,
            license: self.license,
            is_active: true,
            is_online: false,
            is_verified: true,
            is_deleted: false,
            rating: 0.0,
            total_ratings: 0,
            user_type: "veterinarian".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Editable subset of a veterinarian's profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianUpdate {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub specialization: String,
    pub experience: String,
    pub license: String,
}

impl VeterinarianRecord {
    /// The record's ID within the `veterinarians` collection.
    #[must_use]
    pub fn id(&self) -> VeterinarianId {
        self.uid.clone().into()
    }
}
