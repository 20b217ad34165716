//! Pluggable OAuth identity providers
//!
//! A provider turns an identity assertion sent by the client (for Google, an
//! ID token obtained by the browser sign-in flow) into a verified email and
//! display name. The credential authority then maps that identity onto a
//! local account.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::user::{normalize_email, AuthProvider};
use crate::error::{Result, RustyFolioError};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// A verified external identity
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthIdentity {
    pub provider: AuthProvider,
    pub email: String,
    pub name: Option<String>,
}

/// Trait for OAuth identity providers
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an assertion and return the identity it proves
    async fn verify(&self, assertion: &str) -> Result<OAuthIdentity>;

    /// Which provider this is
    fn provider(&self) -> AuthProvider;

    /// Name used in routes and logs
    fn provider_name(&self) -> &'static str {
        self.provider().as_str()
    }
}

/// Subset of Google's tokeninfo response
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: Option<String>,
    // tokeninfo reports booleans as strings
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
}

impl GoogleTokenInfo {
    fn is_email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(verified)) => *verified,
            Some(serde_json::Value::String(verified)) => verified == "true",
            _ => false,
        }
    }
}

/// Verifies Google ID tokens against the tokeninfo endpoint
pub struct GoogleIdentityProvider {
    client_id: String,
    tokeninfo_url: String,
    http: reqwest::Client,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn identity_from(&self, info: GoogleTokenInfo) -> Result<OAuthIdentity> {
        if info.aud != self.client_id {
            return Err(RustyFolioError::AuthError(
                "ID token was issued for another client".to_string(),
            ));
        }
        if !info.is_email_verified() {
            return Err(RustyFolioError::AuthError(
                "Google account email is not verified".to_string(),
            ));
        }
        let email = info
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| email.contains('@'))
            .ok_or_else(|| RustyFolioError::AuthError("ID token carries no email".to_string()))?;

        Ok(OAuthIdentity {
            provider: AuthProvider::Google,
            email,
            name: info.name,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, assertion: &str) -> Result<OAuthIdentity> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", assertion)])
            .send()
            .await
            .map_err(|e| RustyFolioError::ServerError(format!("Google tokeninfo request failed: {}", e)))?;

        if !response.status().is_success() {
            log::debug!("Google rejected ID token with status {}", response.status());
            return Err(RustyFolioError::AuthError("Invalid Google ID token".to_string()));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| RustyFolioError::ServerError(format!("Malformed tokeninfo response: {}", e)))?;

        self.identity_from(info)
    }

    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }
}

/// Fixed assertion table, for development and testing
pub struct StaticIdentityProvider {
    provider: AuthProvider,
    identities: HashMap<String, OAuthIdentity>,
}

impl StaticIdentityProvider {
    pub fn new(provider: AuthProvider) -> Self {
        Self {
            provider,
            identities: HashMap::new(),
        }
    }

    pub fn with_identity(mut self, assertion: &str, email: &str, name: Option<&str>) -> Self {
        self.identities.insert(
            assertion.to_string(),
            OAuthIdentity {
                provider: self.provider,
                email: normalize_email(email),
                name: name.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, assertion: &str) -> Result<OAuthIdentity> {
        self.identities
            .get(assertion)
            .cloned()
            .ok_or_else(|| RustyFolioError::AuthError("Unknown identity assertion".to_string()))
    }

    fn provider(&self) -> AuthProvider {
        self.provider
    }
}

/// Registered providers, looked up by route name
#[derive(Clone, Default)]
pub struct IdentityProviders {
    providers: HashMap<&'static str, Arc<dyn IdentityProvider>>,
}

impl IdentityProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider, replacing any previous one with the same name
    pub fn add_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.providers.insert(provider.provider_name(), provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
