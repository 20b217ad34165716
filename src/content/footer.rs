use serde::{Deserialize, Serialize};

use super::{default_true, remove_id, require_text, ContentKind};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainFooter {
    #[serde(default)]
    pub social_account_ids: Vec<i64>,
    pub description_myself: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: String,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for MainFooter {
    const NAME: &'static str = "Main footer";
    const PATH: &'static str = "main-footer";

    type Update = MainFooter;

    fn validate(&self) -> Result<()> {
        require_text("descriptionMyself", &self.description_myself)?;
        require_text("address", &self.address)
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: MainFooter) -> Self {
        update
    }

    fn social_account_ids(&self) -> &[i64] {
        &self.social_account_ids
    }

    fn detach_social_account(&mut self, social_account_id: i64) -> bool {
        remove_id(&mut self.social_account_ids, social_account_id)
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.main_footers()
    }
}
