//! Shared application state handed to every request handler

use std::sync::Arc;

use crate::auth::provider::{GoogleIdentityProvider, IdentityProviders};
use crate::auth::{SessionAuthority, TokenManager};
use crate::config::ServerConfig;
use crate::content::ContentService;
use crate::core::rate_limiter::LoginRateLimiter;
use crate::storage::{SharedStorage, SharedTokenRevocationStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub storage: SharedStorage,
    pub authority: Arc<SessionAuthority>,
    pub content: ContentService,
    pub login_limiter: Arc<LoginRateLimiter>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        storage: SharedStorage,
        revocations: SharedTokenRevocationStore,
        providers: IdentityProviders,
    ) -> Self {
        let tokens = Arc::new(TokenManager::new(
            &config.session_secret,
            config.session_ttl_hours,
            revocations,
        ));
        let login_limiter = Arc::new(LoginRateLimiter::new(
            config.login_max_attempts,
            config.login_window,
        ));
        let authority = Arc::new(SessionAuthority::new(
            storage.clone(),
            tokens,
            providers,
            login_limiter.clone(),
        ));

        Self {
            config: Arc::new(config),
            content: ContentService::new(storage.clone()),
            storage,
            authority,
            login_limiter,
        }
    }
}

/// Identity providers enabled by the configuration
pub fn configured_providers(config: &ServerConfig) -> IdentityProviders {
    let mut providers = IdentityProviders::new();
    match &config.google_client_id {
        Some(client_id) => {
            providers = providers.add_provider(Arc::new(GoogleIdentityProvider::new(client_id.clone())));
            log::info!("Google sign-in enabled");
        }
        None => log::info!("Google sign-in disabled: no client id configured"),
    }
    providers
}
