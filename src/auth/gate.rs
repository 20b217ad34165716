//! Ownership checks between the session identity and stored rows
//!
//! The acting user always comes from a resolved session. Path or body user
//! ids only ever select which public content to show.

use uuid::Uuid;

use crate::auth::token::Claims;
use crate::content::{ContentKind, Record, Visibility};
use crate::error::{Result, RustyFolioError};
use crate::security_logger::{log_security_event, SecurityEvent};

/// Request-scoped identity resolved from a session token
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub claims: Claims,
}

impl Identity {
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id
    }
}

/// Allow only the owner through
pub async fn authorize_owner(identity: &Identity, owner_id: Uuid, action: &str, resource: &str) -> Result<()> {
    if identity.owns(owner_id) {
        return Ok(());
    }

    log_security_event(SecurityEvent::PermissionDenied {
        user_id: identity.user_id,
        action: action.to_string(),
        resource: resource.to_string(),
    })
    .await;
    Err(RustyFolioError::Forbidden)
}

/// A single row is readable by its owner, or by anyone when published
pub async fn authorize_read<T: ContentKind>(identity: Option<&Identity>, record: &Record<T>) -> Result<()> {
    if record.is_visible(Visibility::PublishedOnly) {
        return Ok(());
    }

    let resource = format!("{}/{}", T::PATH, record.id);
    match identity {
        Some(identity) => authorize_owner(identity, record.user_id, "read", &resource).await,
        None => {
            log_security_event(SecurityEvent::UnauthorizedAccess { resource }).await;
            Err(RustyFolioError::Unauthorized)
        }
    }
}

/// Listing visibility for `owner_id`'s rows. Private kinds are owner-only.
pub async fn listing_visibility<T: ContentKind>(identity: Option<&Identity>, owner_id: Uuid) -> Result<Visibility> {
    match identity {
        Some(identity) if identity.owns(owner_id) => Ok(Visibility::All),
        _ if T::PUBLIC => Ok(Visibility::PublishedOnly),
        Some(identity) => {
            authorize_owner(identity, owner_id, "list", T::PATH).await?;
            Ok(Visibility::All)
        }
        None => {
            log_security_event(SecurityEvent::UnauthorizedAccess {
                resource: T::PATH.to_string(),
            })
            .await;
            Err(RustyFolioError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Contact, Skill};
    use chrono::Utc;

    fn identity(user_id: Uuid) -> Identity {
        Identity {
            user_id,
            email: "u@x.com".to_string(),
            claims: Claims::new(user_id, "u@x.com".to_string(), 1),
        }
    }

    fn record<T>(owner: Uuid, fields: T) -> Record<T> {
        Record {
            id: 1,
            user_id: owner,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn skill(published: bool) -> Skill {
        Skill {
            name: "Go".to_string(),
            category: "Backend".to_string(),
            level: 4,
            icon: None,
            published,
        }
    }

    #[tokio::test]
    async fn test_owner_allowed_other_denied() {
        let u = Uuid::new_v4();
        let v = Uuid::new_v4();
        assert!(authorize_owner(&identity(u), u, "update", "skills/1").await.is_ok());
        assert!(matches!(
            authorize_owner(&identity(u), v, "update", "skills/1").await,
            Err(RustyFolioError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_unpublished_rows_are_private() {
        let u = Uuid::new_v4();
        let v = Uuid::new_v4();
        let private = record(v, skill(false));
        let public = record(v, skill(true));

        assert!(authorize_read(Some(&identity(u)), &public).await.is_ok());
        assert!(authorize_read(None, &public).await.is_ok());
        assert!(matches!(
            authorize_read(Some(&identity(u)), &private).await,
            Err(RustyFolioError::Forbidden)
        ));
        assert!(matches!(
            authorize_read(None, &private).await,
            Err(RustyFolioError::Unauthorized)
        ));
        assert!(authorize_read(Some(&identity(v)), &private).await.is_ok());
    }

    #[tokio::test]
    async fn test_listing_visibility() {
        let u = Uuid::new_v4();
        let v = Uuid::new_v4();

        assert_eq!(
            listing_visibility::<Skill>(Some(&identity(u)), u).await.unwrap(),
            Visibility::All
        );
        assert_eq!(
            listing_visibility::<Skill>(Some(&identity(u)), v).await.unwrap(),
            Visibility::PublishedOnly
        );
        assert_eq!(
            listing_visibility::<Skill>(None, v).await.unwrap(),
            Visibility::PublishedOnly
        );
        assert!(matches!(
            listing_visibility::<Contact>(Some(&identity(u)), v).await,
            Err(RustyFolioError::Forbidden)
        ));
        assert!(matches!(
            listing_visibility::<Contact>(None, v).await,
            Err(RustyFolioError::Unauthorized)
        ));
    }
}
