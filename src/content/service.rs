//! Owner-scoped content operations
//!
//! Every mutation takes the acting [`Identity`]; the owner of a new row is
//! always the identity's user.

use std::collections::HashSet;
use uuid::Uuid;

use super::views::{DashboardStats, PortfolioView, ProfileView, PublicUser, SectionView};
use super::{
    Contact, ContactSubmission, ContentKind, Experience, HeroSection, ListingQuery, MainFooter,
    MainHeader, Project, Record, Skill, SocialAccount, Visibility,
};
use crate::auth::gate::{authorize_owner, authorize_read, listing_visibility, Identity};
use crate::auth::user::User;
use crate::error::{Result, RustyFolioError};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::SharedStorage;

#[derive(Clone)]
pub struct ContentService {
    storage: SharedStorage,
}

impl ContentService {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    fn table<T: ContentKind>(&self) -> &dyn crate::storage::ContentStorage<T> {
        T::storage(self.storage.as_ref())
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User> {
        self.storage
            .user_storage()
            .get_user(user_id)
            .await?
            .ok_or_else(|| RustyFolioError::not_found("User", user_id))
    }

    async fn require_row<T: ContentKind>(&self, id: i64) -> Result<Record<T>> {
        self.table::<T>()
            .get(id)
            .await?
            .ok_or_else(|| RustyFolioError::not_found(T::NAME, id))
    }

    /// All of the caller's rows
    pub async fn list_own<T: ContentKind>(&self, identity: &Identity) -> Result<Vec<Record<T>>> {
        self.table::<T>()
            .list_by_owner(identity.user_id, Visibility::All)
            .await
    }

    /// `owner`'s rows as the caller may see them
    pub async fn list_for_user<T: ContentKind>(
        &self,
        identity: Option<&Identity>,
        owner: Uuid,
        query: &ListingQuery,
    ) -> Result<Vec<Record<T>>> {
        let visibility = listing_visibility::<T>(identity, owner).await?;
        let mut records = self.table::<T>().list_by_owner(owner, visibility).await?;
        records.retain(|record| record.fields.matches(query));
        Ok(records)
    }

    pub async fn get<T: ContentKind>(&self, identity: Option<&Identity>, id: i64) -> Result<Record<T>> {
        let record = self.require_row::<T>(id).await?;
        authorize_read(identity, &record).await?;
        Ok(record)
    }

    pub async fn create<T: ContentKind>(&self, identity: &Identity, fields: T) -> Result<Record<T>> {
        self.check_fields(identity, &fields).await?;
        let record = self.table::<T>().create(identity.user_id, fields).await?;
        log::debug!("{} {} created by {}", T::NAME, record.id, identity.user_id);
        Ok(record)
    }

    pub async fn update<T: ContentKind>(
        &self,
        identity: &Identity,
        id: i64,
        update: T::Update,
    ) -> Result<Record<T>> {
        let current = self.require_row::<T>(id).await?;
        authorize_owner(identity, current.user_id, "update", &format!("{}/{}", T::PATH, id)).await?;

        let fields = current.fields.apply_update(update);
        self.check_fields(identity, &fields).await?;
        self.table::<T>().update(id, fields).await
    }

    pub async fn delete<T: ContentKind>(&self, identity: &Identity, id: i64) -> Result<Record<T>> {
        let current = self.require_row::<T>(id).await?;
        authorize_owner(identity, current.user_id, "delete", &format!("{}/{}", T::PATH, id)).await?;

        let deleted = self.table::<T>().delete(id).await?;
        if T::LINKED_FROM_SECTIONS {
            self.detach_social_account(deleted.user_id, deleted.id).await?;
        }
        Ok(deleted)
    }

    async fn check_fields<T: ContentKind>(&self, identity: &Identity, fields: &T) -> Result<()> {
        if let Err(e) = fields.validate() {
            log_security_event(SecurityEvent::InvalidInput {
                user_id: Some(identity.user_id),
                input_type: T::PATH.to_string(),
                details: e.to_string(),
            })
            .await;
            return Err(e);
        }
        self.check_social_references(identity.user_id, fields.social_account_ids())
            .await
    }

    /// Sections may only link the owner's own social accounts
    async fn check_social_references(&self, owner: Uuid, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let owned: HashSet<i64> = self
            .storage
            .social_accounts()
            .list_by_owner(owner, Visibility::All)
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();

        match ids.iter().find(|id| !owned.contains(id)) {
            Some(id) => Err(RustyFolioError::ValidationError(format!(
                "Unknown social account {}",
                id
            ))),
            None => Ok(()),
        }
    }

    async fn detach_social_account(&self, owner: Uuid, social_account_id: i64) -> Result<()> {
        self.detach_from::<HeroSection>(owner, social_account_id).await?;
        self.detach_from::<MainHeader>(owner, social_account_id).await?;
        self.detach_from::<MainFooter>(owner, social_account_id).await
    }

    async fn detach_from<T: ContentKind>(&self, owner: Uuid, social_account_id: i64) -> Result<()> {
        let table = self.table::<T>();
        for mut record in table.list_by_owner(owner, Visibility::All).await? {
            if record.fields.detach_social_account(social_account_id) {
                table.update(record.id, record.fields).await?;
            }
        }
        Ok(())
    }

    /// Public contact form: drop a message in `recipient`'s inbox
    pub async fn submit_contact(&self, submission: ContactSubmission) -> Result<Record<Contact>> {
        let (recipient, message) = submission.into_message();
        if let Err(e) = message.validate() {
            log_security_event(SecurityEvent::InvalidInput {
                user_id: None,
                input_type: Contact::PATH.to_string(),
                details: e.to_string(),
            })
            .await;
            return Err(e);
        }
        let record = self.storage.contacts().create(recipient, message).await?;
        log::info!("Contact message {} delivered to {}", record.id, recipient);
        Ok(record)
    }

    pub async fn unread_count(&self, identity: &Identity) -> Result<usize> {
        Ok(self
            .list_own::<Contact>(identity)
            .await?
            .iter()
            .filter(|message| !message.fields.read)
            .count())
    }

    /// Most recent published section of a kind, with its social accounts
    async fn published_section<T: ContentKind>(
        &self,
        owner: Uuid,
        social_accounts: &[Record<SocialAccount>],
    ) -> Result<Option<SectionView<T>>> {
        let section = self
            .table::<T>()
            .list_by_owner(owner, Visibility::PublishedOnly)
            .await?
            .into_iter()
            .next();

        Ok(section.map(|section| {
            let linked = section.fields.social_account_ids();
            let social_accounts = social_accounts
                .iter()
                .filter(|account| linked.contains(&account.id))
                .cloned()
                .collect();
            SectionView {
                section,
                social_accounts,
            }
        }))
    }

    /// Everything a visitor sees on `owner`'s portfolio
    pub async fn portfolio(&self, owner: Uuid) -> Result<PortfolioView> {
        let user = self.require_user(owner).await?;
        let unfiltered = ListingQuery::default();
        let social_accounts = self
            .table::<SocialAccount>()
            .list_by_owner(owner, Visibility::PublishedOnly)
            .await?;

        Ok(PortfolioView {
            user: PublicUser::from(&user),
            header: self.published_section(owner, &social_accounts).await?,
            hero: self.published_section(owner, &social_accounts).await?,
            footer: self.published_section(owner, &social_accounts).await?,
            projects: self.list_for_user::<Project>(None, owner, &unfiltered).await?,
            skills: self.list_for_user::<Skill>(None, owner, &unfiltered).await?,
            experiences: self.list_for_user::<Experience>(None, owner, &unfiltered).await?,
        })
    }

    pub async fn profile(&self, owner: Uuid) -> Result<ProfileView> {
        let user = self.require_user(owner).await?;
        Ok(ProfileView {
            user: PublicUser::from(&user),
            social_accounts: self
                .table::<SocialAccount>()
                .list_by_owner(owner, Visibility::PublishedOnly)
                .await?,
        })
    }

    pub async fn dashboard(&self, identity: &Identity) -> Result<DashboardStats> {
        let messages = self.list_own::<Contact>(identity).await?;
        Ok(DashboardStats {
            projects: self.list_own::<Project>(identity).await?.len(),
            skills: self.list_own::<Skill>(identity).await?.len(),
            experiences: self.list_own::<Experience>(identity).await?.len(),
            unread_messages: messages.iter().filter(|message| !message.fields.read).count(),
            messages: messages.len(),
            social_accounts: self.list_own::<SocialAccount>(identity).await?.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;
    use crate::auth::user::AuthProvider;
    use crate::content::ContactUpdate;
    use crate::storage::create_memory_storage;

    struct Fixture {
        service: ContentService,
        storage: SharedStorage,
    }

    impl Fixture {
        fn new() -> Self {
            let storage = create_memory_storage();
            Self {
                service: ContentService::new(storage.clone()),
                storage,
            }
        }

        async fn identity(&self, email: &str) -> Identity {
            let user = self
                .storage
                .user_storage()
                .create_user(User::new(
                    email.to_string(),
                    None,
                    "Owner".to_string(),
                    AuthProvider::Credentials,
                ))
                .await
                .unwrap();
            Identity {
                user_id: user.id,
                email: user.email.clone(),
                claims: Claims::new(user.id, user.email, 1),
            }
        }
    }

    fn social(name: &str) -> SocialAccount {
        SocialAccount {
            account: Some(format!("https://github.com/{}", name)),
            account_name: name.to_string(),
            account_type: "github".to_string(),
        }
    }

    fn header(ids: Vec<i64>) -> MainHeader {
        MainHeader {
            social_account_ids: ids,
            published: true,
        }
    }

    fn skill(name: &str, level: i32, published: bool) -> Skill {
        Skill {
            name: name.to_string(),
            category: "Backend".to_string(),
            level,
            icon: None,
            published,
        }
    }

    fn submission(recipient: Uuid, subject: &str) -> ContactSubmission {
        ContactSubmission {
            user_id: recipient,
            name: "Visitor".to_string(),
            email: "visitor@x.com".to_string(),
            subject: subject.to_string(),
            message: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_other_user_cannot_mutate() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        let v = f.identity("v@x.com").await;
        let record = f.service.create(&v, skill("Go", 4, true)).await.unwrap();

        assert!(matches!(
            f.service.update::<Skill>(&u, record.id, skill("Hacked", 1, true)).await,
            Err(RustyFolioError::Forbidden)
        ));
        assert!(matches!(
            f.service.delete::<Skill>(&u, record.id).await,
            Err(RustyFolioError::Forbidden)
        ));
        let unchanged = f.service.get::<Skill>(Some(&v), record.id).await.unwrap();
        assert_eq!(unchanged.fields.name, "Go");
    }

    #[tokio::test]
    async fn test_invalid_fields_rejected() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        assert!(matches!(
            f.service.create(&u, skill("Go", 9, true)).await,
            Err(RustyFolioError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_sections_only_link_own_social_accounts() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        let v = f.identity("v@x.com").await;
        let mine = f.service.create(&u, social("u")).await.unwrap();
        let theirs = f.service.create(&v, social("v")).await.unwrap();

        assert!(f.service.create(&u, header(vec![mine.id])).await.is_ok());
        assert!(matches!(
            f.service.create(&u, header(vec![theirs.id])).await,
            Err(RustyFolioError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_social_account_detaches_it() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        let keep = f.service.create(&u, social("keep")).await.unwrap();
        let drop = f.service.create(&u, social("drop")).await.unwrap();
        let section = f
            .service
            .create(&u, header(vec![keep.id, drop.id]))
            .await
            .unwrap();

        f.service.delete::<SocialAccount>(&u, drop.id).await.unwrap();

        let section = f.service.get::<MainHeader>(Some(&u), section.id).await.unwrap();
        assert_eq!(section.fields.social_account_ids, vec![keep.id]);
    }

    #[tokio::test]
    async fn test_contact_inbox() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        let v = f.identity("v@x.com").await;

        let first = f.service.submit_contact(submission(u.user_id, "One")).await.unwrap();
        f.service.submit_contact(submission(u.user_id, "Two")).await.unwrap();
        assert_eq!(f.service.unread_count(&u).await.unwrap(), 2);

        // Inbox is private
        assert!(matches!(
            f.service.get::<Contact>(Some(&v), first.id).await,
            Err(RustyFolioError::Forbidden)
        ));
        assert!(matches!(
            f.service.list_for_user::<Contact>(Some(&v), u.user_id, &ListingQuery::default()).await,
            Err(RustyFolioError::Forbidden)
        ));

        let read = f
            .service
            .update::<Contact>(&u, first.id, ContactUpdate { read: true })
            .await
            .unwrap();
        assert!(read.fields.read);
        assert!(f.service.get::<Contact>(Some(&u), first.id).await.unwrap().fields.read);
        assert_eq!(f.service.unread_count(&u).await.unwrap(), 1);

        assert!(matches!(
            f.service.submit_contact(submission(Uuid::new_v4(), "Lost")).await,
            Err(RustyFolioError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_portfolio_shows_published_only() {
        let f = Fixture::new();
        let u = f.identity("u@x.com").await;
        let account = f.service.create(&u, social("u")).await.unwrap();
        f.service.create(&u, header(vec![account.id])).await.unwrap();
        f.service.create(&u, skill("Go", 4, true)).await.unwrap();
        f.service.create(&u, skill("Secret", 2, false)).await.unwrap();

        let portfolio = f.service.portfolio(u.user_id).await.unwrap();
        assert_eq!(portfolio.skills.len(), 1);
        assert_eq!(portfolio.skills[0].fields.name, "Go");
        let header = portfolio.header.unwrap();
        assert_eq!(header.social_accounts.len(), 1);
        assert!(portfolio.hero.is_none());

        let stats = f.service.dashboard(&u).await.unwrap();
        assert_eq!(stats.skills, 2);
        assert_eq!(stats.social_accounts, 1);

        assert!(matches!(
            f.service.portfolio(Uuid::new_v4()).await,
            Err(RustyFolioError::NotFound(_))
        ));
    }
}
