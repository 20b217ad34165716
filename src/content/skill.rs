use serde::{Deserialize, Serialize};

use super::{default_true, require_text, ContentKind};
use crate::error::{Result, RustyFolioError};
use crate::storage::traits::{ContentStorage, StorageProvider};

pub const MIN_SKILL_LEVEL: i32 = 1;
pub const MAX_SKILL_LEVEL: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub level: i32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for Skill {
    const NAME: &'static str = "Skill";
    const PATH: &'static str = "skills";

    type Update = Skill;

    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&self.level) {
            return Err(RustyFolioError::ValidationError(format!(
                "level must be between {} and {}",
                MIN_SKILL_LEVEL, MAX_SKILL_LEVEL
            )));
        }
        Ok(())
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: Skill) -> Self {
        update
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.skills()
    }
}
