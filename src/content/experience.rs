use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{default_true, require_text, ContentKind, Record};
use crate::error::{Result, RustyFolioError};
use crate::storage::traits::{ContentStorage, StorageProvider};

/// A position held, dates as `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl ContentKind for Experience {
    const NAME: &'static str = "Experience";
    const PATH: &'static str = "experience";

    type Update = Experience;

    fn validate(&self) -> Result<()> {
        require_text("company", &self.company)?;
        require_text("position", &self.position)?;
        require_text("description", &self.description)?;
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(RustyFolioError::ValidationError(
                    "endDate must not be before startDate".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn is_published(&self) -> bool {
        self.published
    }

    fn apply_update(self, update: Experience) -> Self {
        update
    }

    // Most recent position first
    fn sort(records: &mut [Record<Self>]) {
        records.sort_by(|a, b| {
            b.fields
                .start_date
                .cmp(&a.fields.start_date)
                .then(b.id.cmp(&a.id))
        });
    }

    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self> {
        provider.experiences()
    }
}
