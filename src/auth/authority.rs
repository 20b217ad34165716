//! Credential and session authority
//!
//! Turns credentials (email and password, or an OAuth assertion) into signed
//! session tokens, resolves tokens back into an [`Identity`], and revokes
//! them on logout or account deletion.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::gate::Identity;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::provider::IdentityProviders;
use crate::auth::token::TokenManager;
use crate::auth::user::{normalize_email, AuthProvider, User, UserInfo};
use crate::constants::AUTH_MIN_DURATION_MS;
use crate::core::rate_limiter::LoginRateLimiter;
use crate::error::{Result, RustyFolioError};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::token_revocation::RevocationReason;
use crate::storage::SharedStorage;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An established session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionAuthority {
    storage: SharedStorage,
    tokens: Arc<TokenManager>,
    providers: IdentityProviders,
    limiter: Arc<LoginRateLimiter>,
    min_duration: Duration,
}

impl SessionAuthority {
    pub fn new(
        storage: SharedStorage,
        tokens: Arc<TokenManager>,
        providers: IdentityProviders,
        limiter: Arc<LoginRateLimiter>,
    ) -> Self {
        Self {
            storage,
            tokens,
            providers,
            limiter,
            min_duration: Duration::from_millis(AUTH_MIN_DURATION_MS),
        }
    }

    /// Override the minimum authentication response time
    pub fn with_min_duration(mut self, min_duration: Duration) -> Self {
        self.min_duration = min_duration;
        self
    }

    pub fn token_ttl_hours(&self) -> i64 {
        self.tokens.ttl_hours()
    }

    /// Create a credentials account. Does not open a session.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserInfo> {
        let timer = AuthTimer::new(self.min_duration);
        let result = self.register_inner(request).await;
        timer.wait().await;
        result
    }

    async fn register_inner(&self, request: RegisterRequest) -> Result<UserInfo> {
        let email = normalize_email(&request.email);
        let name = request.name.trim().to_string();

        if !email.contains('@') {
            return Err(RustyFolioError::ValidationError("A valid email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(RustyFolioError::ValidationError("Password is required".to_string()));
        }
        if name.is_empty() {
            return Err(RustyFolioError::ValidationError("Name is required".to_string()));
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = self
            .storage
            .user_storage()
            .create_user(User::new(email, Some(password_hash), name, AuthProvider::Credentials))
            .await?;

        log_security_event(SecurityEvent::AccountCreated {
            user_id: user.id,
            provider: user.provider.as_str().to_string(),
        })
        .await;
        Ok(user.to_info())
    }

    /// Email and password login
    pub async fn login_password(&self, request: LoginRequest) -> Result<Session> {
        let timer = AuthTimer::new(self.min_duration);
        let result = self.login_password_inner(request).await;
        timer.wait().await;
        result
    }

    async fn login_password_inner(&self, request: LoginRequest) -> Result<Session> {
        let email = normalize_email(&request.email);

        // Counted before the password is checked; a success clears it
        if !self.limiter.try_begin(&email).await {
            log_security_event(SecurityEvent::RateLimitExceeded {
                key: email,
                limit_type: "login".to_string(),
            })
            .await;
            return Err(RustyFolioError::TooManyRequests(
                "Too many failed login attempts, try again later".to_string(),
            ));
        }

        let user = self.storage.user_storage().get_user_by_email(&email).await?;
        let verified = match user.as_ref().and_then(|user| user.password_hash.clone()) {
            Some(hash) => verify_password_blocking(request.password, hash).await?,
            None => false,
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    email: Some(email),
                    reason: "invalid credentials".to_string(),
                })
                .await;
                return Err(RustyFolioError::InvalidCredentials);
            }
        };

        self.limiter.reset(&email).await;
        self.open_session(&user).await
    }

    /// Login with an identity assertion from a registered provider,
    /// provisioning an account on first use
    pub async fn login_oauth(&self, provider_name: &str, assertion: &str) -> Result<Session> {
        let timer = AuthTimer::new(self.min_duration);
        let result = self.login_oauth_inner(provider_name, assertion).await;
        timer.wait().await;
        result
    }

    async fn login_oauth_inner(&self, provider_name: &str, assertion: &str) -> Result<Session> {
        let provider = self.providers.get(provider_name).ok_or_else(|| {
            RustyFolioError::NotFound(format!("Unknown identity provider: {}", provider_name))
        })?;

        let identity = match provider.verify(assertion).await {
            Ok(identity) => identity,
            Err(e) => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    email: None,
                    reason: format!("{} assertion rejected: {}", provider_name, e),
                })
                .await;
                return Err(e);
            }
        };

        let users = self.storage.user_storage();
        let user = match users.get_user_by_email(&identity.email).await? {
            Some(user) => user,
            None => {
                let name = identity
                    .name
                    .clone()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| identity.email.clone());
                let user = users
                    .create_user(User::new(identity.email.clone(), None, name, identity.provider))
                    .await?;
                log_security_event(SecurityEvent::AccountCreated {
                    user_id: user.id,
                    provider: identity.provider.as_str().to_string(),
                })
                .await;
                user
            }
        };

        self.open_session(&user).await
    }

    async fn open_session(&self, user: &User) -> Result<Session> {
        let issued = self.tokens.issue(user)?;
        let expires_at = Utc
            .timestamp_opt(issued.claims.exp, 0)
            .single()
            .ok_or_else(|| RustyFolioError::ServerError("Invalid token expiry".to_string()))?;

        log_security_event(SecurityEvent::AuthenticationSuccess {
            user_id: user.id,
            provider: user.provider.as_str().to_string(),
        })
        .await;

        Ok(Session {
            token: issued.token,
            user: user.to_info(),
            expires_at,
        })
    }

    /// Resolve a session token to the identity it proves
    pub async fn resolve(&self, token: &str) -> Result<Identity> {
        let claims = match self.tokens.validate_token(token).await {
            Ok(claims) => claims,
            Err(e) => {
                log_security_event(SecurityEvent::TokenValidationFailed {
                    reason: e.to_string(),
                })
                .await;
                return Err(RustyFolioError::Unauthorized);
            }
        };

        let user_id = claims.user_id()?;
        // Sessions do not outlive their account
        let user = self
            .storage
            .user_storage()
            .get_user(user_id)
            .await?
            .ok_or(RustyFolioError::Unauthorized)?;

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            claims,
        })
    }

    /// Current user's account
    pub async fn current_user(&self, identity: &Identity) -> Result<UserInfo> {
        self.storage
            .user_storage()
            .get_user(identity.user_id)
            .await?
            .map(|user| user.to_info())
            .ok_or(RustyFolioError::Unauthorized)
    }

    /// Revoke the session behind `identity`
    pub async fn logout(&self, identity: &Identity) -> Result<()> {
        self.tokens
            .revoke(&identity.claims, RevocationReason::UserLogout)
            .await?;
        log_security_event(SecurityEvent::SessionRevoked {
            user_id: identity.user_id,
            token_id: identity.claims.jti.clone(),
        })
        .await;
        Ok(())
    }

    /// Change the display name
    pub async fn rename(&self, identity: &Identity, name: &str) -> Result<UserInfo> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RustyFolioError::ValidationError("Name is required".to_string()));
        }

        let users = self.storage.user_storage();
        let mut user = users
            .get_user(identity.user_id)
            .await?
            .ok_or(RustyFolioError::Unauthorized)?;
        user.name = name.to_string();
        Ok(users.update_user(user).await?.to_info())
    }

    /// Delete the caller's account with everything it owns, then revoke the
    /// session used to do it
    pub async fn delete_account(&self, identity: &Identity) -> Result<UserInfo> {
        let user = self.storage.user_storage().delete_user(identity.user_id).await?;
        self.tokens
            .revoke(&identity.claims, RevocationReason::AccountDeleted)
            .await?;
        log_security_event(SecurityEvent::AccountDeleted { user_id: user.id }).await;
        Ok(user.to_info())
    }
}
