//! Abstract storage interfaces for pluggable backends
//!
//! This module defines the user table and one generic table per content kind.
//! The relational store of a production deployment implements the same traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::user::User;
use crate::content::{
    Contact, ContentKind, Experience, HeroSection, MainFooter, MainHeader, Project, Record, Skill,
    SocialAccount, Visibility,
};
use crate::error::Result;

/// User account storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Create a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by (normalized) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Replace a user's stored data
    async fn update_user(&self, user: User) -> Result<User>;

    /// Delete a user together with every row they own
    async fn delete_user(&self, user_id: Uuid) -> Result<User>;
}

/// Storage for one content kind. Rows always belong to an existing user.
#[async_trait]
pub trait ContentStorage<T: ContentKind>: Send + Sync {
    /// Insert a row owned by `owner`. Fails with `NotFound` for an unknown owner.
    async fn create(&self, owner: Uuid, fields: T) -> Result<Record<T>>;

    /// Get a row by ID
    async fn get(&self, id: i64) -> Result<Option<Record<T>>>;

    /// Rows owned by `owner`, in the kind's listing order
    async fn list_by_owner(&self, owner: Uuid, visibility: Visibility) -> Result<Vec<Record<T>>>;

    /// Replace a row's fields
    async fn update(&self, id: i64, fields: T) -> Result<Record<T>>;

    /// Delete a row, returning it
    async fn delete(&self, id: i64) -> Result<Record<T>>;
}

/// Combined storage provider interface
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Get user storage backend
    fn user_storage(&self) -> &dyn UserStorage;

    fn projects(&self) -> &dyn ContentStorage<Project>;

    fn skills(&self) -> &dyn ContentStorage<Skill>;

    fn experiences(&self) -> &dyn ContentStorage<Experience>;

    fn contacts(&self) -> &dyn ContentStorage<Contact>;

    fn hero_sections(&self) -> &dyn ContentStorage<HeroSection>;

    fn main_headers(&self) -> &dyn ContentStorage<MainHeader>;

    fn main_footers(&self) -> &dyn ContentStorage<MainFooter>;

    fn social_accounts(&self) -> &dyn ContentStorage<SocialAccount>;

    /// Initialize the storage backend (create tables, etc.)
    async fn initialize(&self) -> Result<()>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<bool>;
}
