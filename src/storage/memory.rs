//! In-memory storage implementation for development and testing
//!
//! This provides a complete storage implementation that keeps all data
//! in memory. Suitable for development, testing, or small deployments.
//!
//! Lock order is always users, then user emails, then a content table.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::*;
use crate::auth::user::User;
use crate::content::{
    Contact, ContentKind, Experience, HeroSection, MainFooter, MainHeader, Project, Record, Skill,
    SocialAccount, Visibility,
};
use crate::error::{Result, RustyFolioError};

type UserTable = Arc<RwLock<HashMap<Uuid, User>>>;

/// In-memory table for one content kind
pub struct MemoryContentTable<T: ContentKind> {
    users: UserTable,
    rows: Arc<RwLock<HashMap<i64, Record<T>>>>,
    next_id: Arc<RwLock<i64>>,
}

impl<T: ContentKind> MemoryContentTable<T> {
    fn new(users: UserTable) -> Self {
        Self {
            users,
            rows: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    async fn generate_id(&self) -> i64 {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    /// Drop every row of `owner`. Caller holds the users write lock.
    async fn remove_owner(&self, owner: Uuid) -> usize {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, record| record.user_id != owner);
        before - rows.len()
    }
}

#[async_trait]
impl<T: ContentKind> ContentStorage<T> for MemoryContentTable<T> {
    async fn create(&self, owner: Uuid, fields: T) -> Result<Record<T>> {
        // Held until the row is in, so a concurrent user delete cannot orphan it
        let users = self.users.read().await;
        if !users.contains_key(&owner) {
            return Err(RustyFolioError::not_found("User", owner));
        }

        let now = Utc::now();
        let record = Record {
            id: self.generate_id().await,
            user_id: owner,
            fields,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<Record<T>>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: Uuid, visibility: Visibility) -> Result<Vec<Record<T>>> {
        let rows = self.rows.read().await;
        let mut records: Vec<Record<T>> = rows
            .values()
            .filter(|record| record.user_id == owner && record.is_visible(visibility))
            .cloned()
            .collect();
        T::sort(&mut records);
        Ok(records)
    }

    async fn update(&self, id: i64, fields: T) -> Result<Record<T>> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(record) => {
                record.fields = fields;
                record.updated_at = Utc::now();
                Ok(record.clone())
            }
            None => Err(RustyFolioError::not_found(T::NAME, id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<Record<T>> {
        self.rows
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| RustyFolioError::not_found(T::NAME, id))
    }
}

/// In-memory storage provider
pub struct MemoryStorageProvider {
    users: UserTable,
    user_emails: Arc<RwLock<HashMap<String, Uuid>>>, // email -> user_id
    projects: MemoryContentTable<Project>,
    skills: MemoryContentTable<Skill>,
    experiences: MemoryContentTable<Experience>,
    contacts: MemoryContentTable<Contact>,
    hero_sections: MemoryContentTable<HeroSection>,
    main_headers: MemoryContentTable<MainHeader>,
    main_footers: MemoryContentTable<MainFooter>,
    social_accounts: MemoryContentTable<SocialAccount>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        let users: UserTable = Arc::new(RwLock::new(HashMap::new()));
        Self {
            user_emails: Arc::new(RwLock::new(HashMap::new())),
            projects: MemoryContentTable::new(users.clone()),
            skills: MemoryContentTable::new(users.clone()),
            experiences: MemoryContentTable::new(users.clone()),
            contacts: MemoryContentTable::new(users.clone()),
            hero_sections: MemoryContentTable::new(users.clone()),
            main_headers: MemoryContentTable::new(users.clone()),
            main_footers: MemoryContentTable::new(users.clone()),
            social_accounts: MemoryContentTable::new(users.clone()),
            users,
        }
    }
}

impl Default for MemoryStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn user_storage(&self) -> &dyn UserStorage {
        self
    }

    fn projects(&self) -> &dyn ContentStorage<Project> {
        &self.projects
    }

    fn skills(&self) -> &dyn ContentStorage<Skill> {
        &self.skills
    }

    fn experiences(&self) -> &dyn ContentStorage<Experience> {
        &self.experiences
    }

    fn contacts(&self) -> &dyn ContentStorage<Contact> {
        &self.contacts
    }

    fn hero_sections(&self) -> &dyn ContentStorage<HeroSection> {
        &self.hero_sections
    }

    fn main_headers(&self) -> &dyn ContentStorage<MainHeader> {
        &self.main_headers
    }

    fn main_footers(&self) -> &dyn ContentStorage<MainFooter> {
        &self.main_footers
    }

    fn social_accounts(&self) -> &dyn ContentStorage<SocialAccount> {
        &self.social_accounts
    }

    async fn initialize(&self) -> Result<()> {
        // Nothing to initialize for memory storage
        log::info!("Memory storage provider initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        // Memory storage is always healthy
        Ok(true)
    }
}

#[async_trait]
impl UserStorage for MemoryStorageProvider {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        let mut user_emails = self.user_emails.write().await;

        if user_emails.contains_key(&user.email) {
            return Err(RustyFolioError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        user_emails.insert(user.email.clone(), user.id);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        let user_emails = self.user_emails.read().await;
        Ok(user_emails
            .get(email)
            .and_then(|user_id| users.get(user_id))
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        let mut user_emails = self.user_emails.write().await;

        let previous_email = match users.get(&user.id) {
            Some(existing) => existing.email.clone(),
            None => return Err(RustyFolioError::not_found("User", user.id)),
        };

        if previous_email != user.email {
            if user_emails.contains_key(&user.email) {
                return Err(RustyFolioError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
            user_emails.remove(&previous_email);
            user_emails.insert(user.email.clone(), user.id);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .remove(&user_id)
            .ok_or_else(|| RustyFolioError::not_found("User", user_id))?;
        self.user_emails.write().await.remove(&user.email);

        let removed = self.projects.remove_owner(user_id).await
            + self.skills.remove_owner(user_id).await
            + self.experiences.remove_owner(user_id).await
            + self.contacts.remove_owner(user_id).await
            + self.hero_sections.remove_owner(user_id).await
            + self.main_headers.remove_owner(user_id).await
            + self.main_footers.remove_owner(user_id).await
            + self.social_accounts.remove_owner(user_id).await;

        log::info!("Deleted user {} and {} owned rows", user_id, removed);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::AuthProvider;

    async fn user(storage: &MemoryStorageProvider, email: &str) -> User {
        storage
            .create_user(User::new(
                email.to_string(),
                None,
                "Test".to_string(),
                AuthProvider::Credentials,
            ))
            .await
            .unwrap()
    }

    fn skill(name: &str, published: bool) -> Skill {
        Skill {
            name: name.to_string(),
            category: "Backend".to_string(),
            level: 3,
            icon: None,
            published,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let storage = MemoryStorageProvider::new();
        user(&storage, "a@x.com").await;
        let err = storage
            .create_user(User::new(
                "a@x.com".to_string(),
                None,
                "Other".to_string(),
                AuthProvider::Credentials,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, RustyFolioError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_for_unknown_owner_fails() {
        let storage = MemoryStorageProvider::new();
        let err = storage
            .skills()
            .create(Uuid::new_v4(), skill("Go", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RustyFolioError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_is_owner_scoped_and_ordered() {
        let storage = MemoryStorageProvider::new();
        let u = user(&storage, "u@x.com").await;
        let v = user(&storage, "v@x.com").await;

        let first = storage.skills().create(u.id, skill("Go", true)).await.unwrap();
        let second = storage.skills().create(u.id, skill("Rust", false)).await.unwrap();
        storage.skills().create(v.id, skill("Java", true)).await.unwrap();

        let all = storage.skills().list_by_owner(u.id, Visibility::All).await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        let public = storage
            .skills()
            .list_by_owner(u.id, Visibility::PublishedOnly)
            .await
            .unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].fields.name, "Go");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let storage = MemoryStorageProvider::new();
        let u = user(&storage, "u@x.com").await;
        let record = storage.skills().create(u.id, skill("Go", true)).await.unwrap();

        let updated = storage
            .skills()
            .update(record.id, skill("Golang", true))
            .await
            .unwrap();
        assert_eq!(updated.fields.name, "Golang");
        assert_eq!(updated.created_at, record.created_at);

        storage.skills().delete(record.id).await.unwrap();
        assert!(matches!(
            storage.skills().delete(record.id).await,
            Err(RustyFolioError::NotFound(_))
        ));
        assert!(matches!(
            storage.skills().update(record.id, skill("Go", true)).await,
            Err(RustyFolioError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let storage = MemoryStorageProvider::new();
        let u = user(&storage, "u@x.com").await;
        let v = user(&storage, "v@x.com").await;
        storage.skills().create(u.id, skill("Go", true)).await.unwrap();
        storage.skills().create(v.id, skill("Java", true)).await.unwrap();
        storage
            .social_accounts()
            .create(
                u.id,
                SocialAccount {
                    account: None,
                    account_name: "u".to_string(),
                    account_type: "github".to_string(),
                },
            )
            .await
            .unwrap();

        storage.delete_user(u.id).await.unwrap();

        assert!(storage.get_user(u.id).await.unwrap().is_none());
        assert!(storage.get_user_by_email("u@x.com").await.unwrap().is_none());
        assert!(storage
            .skills()
            .list_by_owner(u.id, Visibility::All)
            .await
            .unwrap()
            .is_empty());
        assert!(storage
            .social_accounts()
            .list_by_owner(u.id, Visibility::All)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            storage.skills().list_by_owner(v.id, Visibility::All).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_email_can_be_reused_after_delete() {
        let storage = MemoryStorageProvider::new();
        let u = user(&storage, "u@x.com").await;
        storage.delete_user(u.id).await.unwrap();
        user(&storage, "u@x.com").await;
    }
}
