use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, validate_email, ContentKind};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

/// A message left by a visitor in a portfolio owner's inbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

/// Public submission addressed to a portfolio owner
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    /// Recipient
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Split into recipient and a fresh, unread message
    pub fn into_message(self) -> (Uuid, Contact) {
        (
            self.user_id,
            Contact {
                name: self.name,
                email: self.email,
                subject: self.subject,
                message: self.message,
                read: false,
            },
        )
    }
}

/// Owners only toggle the read flag
#[derive(Debug, Clone, Deserialize)]
pub struct ContactUpdate {
    pub read: bool,
}

impl ContentKind for Contact {
    const NAME: &'static str = "Contact message";
    const PATH: &'static str = "contact";
    const PUBLIC: bool = false;

    type Update = ContactUpdate;

    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        validate_email("email", &self.email)?;
        require_text("subject", &self.subject)?;
        require_text("message", &self.message)
    }

    fn is_published(&self) -> bool {
        false
    }

    fn apply_update(self, update: ContactUpdate) -> Self {
        Self {
            read: update.read,
            ..self
        }
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.contacts()
    }
}
