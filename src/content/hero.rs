use serde::{Deserialize, Serialize};

use super::{default_true, remove_id, require_text, validate_email, validate_url, ContentKind};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    #[serde(default)]
    pub social_account_ids: Vec<i64>,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub email: String,
    #[serde(default)]
    pub cv_url: Option<String>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for HeroSection {
    const NAME: &'static str = "Hero section";
    const PATH: &'static str = "hero";

    type Update = HeroSection;

    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("subtitle", &self.subtitle)?;
        require_text("description", &self.description)?;
        validate_email("email", &self.email)?;
        validate_url("cvUrl", self.cv_url.as_deref())
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: HeroSection) -> Self {
        update
    }

    fn social_account_ids(&self) -> &[i64] {
        &self.social_account_ids
    }

    fn detach_social_account(&mut self, social_account_id: i64) -> bool {
        remove_id(&mut self.social_account_ids, social_account_id)
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.hero_sections()
    }
}
