use serde::{Deserialize, Serialize};

use super::{require_text, ContentKind};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

/// A link to one of the owner's profiles elsewhere. `account_type` is free
/// text ("github", "linkedin", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    #[serde(default)]
    pub account: Option<String>,
    pub account_name: String,
    pub account_type: String,
}

impl ContentKind for SocialAccount {
    const NAME: &'static str = "Social account";
    const PATH: &'static str = "social-account";
    const LINKED_FROM_SECTIONS: bool = true;

    type Update = SocialAccount;

    fn validate(&self) -> Result<()> {
        require_text("accountName", &self.account_name)?;
        require_text("accountType", &self.account_type)
    }

    // Social accounts show wherever a published section references them
    fn is_published(&self) -> bool {
        true
    }

    fn apply_update(self, update: SocialAccount) -> Self {
        update
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.social_accounts()
    }
}
