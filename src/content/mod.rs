//! Portfolio content kinds
//!
//! Every kind is a plain field struct implementing [`ContentKind`]. Storage
//! wraps the fields in a [`Record`] carrying the server-assigned id, the
//! owning user and timestamps.

pub mod contact;
pub mod experience;
pub mod footer;
pub mod header;
pub mod hero;
pub mod project;
pub mod service;
pub mod skill;
pub mod social;
pub mod views;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::error::{Result, RustyFolioError};
use crate::storage::traits::{ContentStorage, StorageProvider};

pub use contact::{Contact, ContactSubmission, ContactUpdate};
pub use experience::Experience;
pub use footer::MainFooter;
pub use header::MainHeader;
pub use hero::HeroSection;
pub use project::Project;
pub use service::ContentService;
pub use skill::Skill;
pub use social::SocialAccount;
pub use views::{DashboardStats, PortfolioView, ProfileView, SectionView};

/// A stored content row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which rows of an owner a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Admin view
    All,
    /// Public view
    PublishedOnly,
}

/// Optional filters on a public listing (`?featured=true`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListingQuery {
    pub featured: Option<bool>,
}

/// A content kind owned by a user
pub trait ContentKind:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable name used in errors and logs
    const NAME: &'static str;
    /// Route segment under `/api`
    const PATH: &'static str;
    /// Whether rows of this kind can ever be shown to other users
    const PUBLIC: bool = true;
    /// Whether sections keep references to rows of this kind
    const LINKED_FROM_SECTIONS: bool = false;

    /// Request body accepted by `PUT /api/{kind}/{id}`
    type Update: DeserializeOwned + Send + Sync + 'static;

    fn validate(&self) -> Result<()>;

    fn is_published(&self) -> bool;

    /// Merge an update into the current fields
    fn apply_update(self, update: Self::Update) -> Self;

    /// Whether this row passes a listing's query filters. Kinds without
    /// filterable fields ignore the query.
    fn matches(&self, _query: &ListingQuery) -> bool {
        true
    }

    /// Social accounts referenced by this row
    fn social_account_ids(&self) -> &[i64] {
        &[]
    }

    /// Drop a reference to a deleted social account. Returns true if the
    /// row changed.
    fn detach_social_account(&mut self, _social_account_id: i64) -> bool {
        false
    }

    /// Listing order, newest first by default
    fn sort(records: &mut [Record<Self>]) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    }

    /// This kind's table in a storage backend
    fn storage(provider: &dyn StorageProvider) -> &dyn ContentStorage<Self>;
}

impl<T: ContentKind> Record<T> {
    pub fn is_visible(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::All => true,
            Visibility::PublishedOnly => T::PUBLIC && self.fields.is_published(),
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Reject empty or whitespace-only text
pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RustyFolioError::ValidationError(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}

/// Optional URL fields must be absolute http(s) URLs when present
pub(crate) fn validate_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    match url::Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(RustyFolioError::ValidationError(format!(
            "{} must be an http(s) URL",
            field
        ))),
    }
}

pub(crate) fn validate_email(field: &str, value: &str) -> Result<()> {
    require_text(field, value)?;
    if !value.contains('@') {
        return Err(RustyFolioError::ValidationError(format!(
            "{} must be an email address",
            field
        )));
    }
    Ok(())
}

/// Shared detach for kinds holding a `social_account_ids` list
pub(crate) fn remove_id(ids: &mut Vec<i64>, id: i64) -> bool {
    let before = ids.len();
    ids.retain(|existing| *existing != id);
    ids.len() != before
}
