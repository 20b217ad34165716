use serde::{Deserialize, Serialize};

use super::{default_true, remove_id, ContentKind};
use crate::error::Result;
use crate::storage::traits::{ContentStorage, StorageProvider};

/// Site header: only the social links shown next to the owner's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainHeader {
    #[serde(default)]
    pub social_account_ids: Vec<i64>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for MainHeader {
    const NAME: &'static str = "Main header";
    const PATH: &'static str = "main-header";

    type Update = MainHeader;

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: MainHeader) -> Self {
        update
    }

    fn social_account_ids(&self) -> &[i64] {
        &self.social_account_ids
    }

    fn detach_social_account(&mut self, social_account_id: i64) -> bool {
        remove_id(&mut self.social_account_ids, social_account_id)
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.main_headers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_social_account() {
        let mut header = MainHeader {
            social_account_ids: vec![1, 2, 3],
            published: true,
        };
        assert!(header.detach_social_account(2));
        assert_eq!(header.social_account_ids(), &[1, 3]);
        assert!(!header.detach_social_account(2));
    }
}
