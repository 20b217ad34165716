//! Server configuration module
//! Handles configuration parameters for the portfolio API server

use crate::constants::{
    DEFAULT_HOST, DEFAULT_LOGIN_MAX_ATTEMPTS, DEFAULT_LOGIN_WINDOW_SECS, DEFAULT_PORT,
    DEFAULT_SESSION_TTL_HOURS,
};
use crate::error::{Result, RustyFolioError};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Secret used to sign session tokens
    pub session_secret: String,
    /// Lifetime of an issued session, in hours
    pub session_ttl_hours: i64,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub secure_cookies: bool,
    /// Password login attempts allowed per email inside `login_window`
    pub login_max_attempts: u32,
    pub login_window: Duration,
    /// Google OAuth client id; the Google login path is disabled when unset
    pub google_client_id: Option<String>,
    /// Development mode (relaxes cookie security)
    pub development_mode: bool,
    /// TLS configuration
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    /// Enable TLS
    pub enable_tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            session_secret: "test-session-signing-key-only-for-unit-tests-0123456789"
                .to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            secure_cookies: false,
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_window: Duration::from_secs(DEFAULT_LOGIN_WINDOW_SECS),
            google_client_id: None,
            development_mode: true,
            tls_cert_path: None,
            tls_key_path: None,
            enable_tls: false,
        }
    }

    /// Validate that the session secret meets security requirements
    fn validate_session_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(RustyFolioError::ConfigError(
                "Session secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "default",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(RustyFolioError::ConfigError(format!(
                    "Session secret contains insecure pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyFolioError::ConfigError(
                "Session secret should contain mixed characters (letters, numbers, symbols)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("FOLIO_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env_parse("FOLIO_PORT", DEFAULT_PORT);

        let session_secret = env::var("FOLIO_SESSION_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                RustyFolioError::ConfigError(
                    "FOLIO_SESSION_SECRET environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let session_ttl_hours = env_parse("FOLIO_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS);
        if session_ttl_hours <= 0 {
            return Err(RustyFolioError::ConfigError(
                "FOLIO_SESSION_TTL_HOURS must be positive".to_string(),
            ));
        }

        let login_max_attempts = env_parse("FOLIO_LOGIN_MAX_ATTEMPTS", DEFAULT_LOGIN_MAX_ATTEMPTS);
        if login_max_attempts == 0 {
            return Err(RustyFolioError::ConfigError(
                "FOLIO_LOGIN_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        let login_window_secs = env_parse("FOLIO_LOGIN_WINDOW_SECS", DEFAULT_LOGIN_WINDOW_SECS);

        let google_client_id = env::var("FOLIO_GOOGLE_CLIENT_ID")
            .or_else(|_| env::var("GOOGLE_CLIENT_ID"))
            .ok()
            .filter(|id| !id.trim().is_empty());

        let development_mode = env_flag("FOLIO_DEVELOPMENT_MODE");

        // Cookies default to Secure outside development mode
        let secure_cookies = match env::var("FOLIO_SECURE_COOKIES") {
            Ok(_) => env_flag("FOLIO_SECURE_COOKIES"),
            Err(_) => !development_mode,
        };

        // TLS configuration
        let enable_tls = env_flag("FOLIO_ENABLE_TLS");
        let tls_cert_path = env::var("FOLIO_TLS_CERT_PATH").ok();
        let tls_key_path = env::var("FOLIO_TLS_KEY_PATH").ok();

        if enable_tls {
            match (&tls_cert_path, &tls_key_path) {
                (Some(cert_path), Some(key_path)) => {
                    if !std::path::Path::new(cert_path).exists() {
                        return Err(RustyFolioError::ConfigError(format!(
                            "TLS certificate file does not exist: {}",
                            cert_path
                        )));
                    }
                    if !std::path::Path::new(key_path).exists() {
                        return Err(RustyFolioError::ConfigError(format!(
                            "TLS private key file does not exist: {}",
                            key_path
                        )));
                    }
                }
                _ => {
                    return Err(RustyFolioError::ConfigError(
                        "TLS is enabled but FOLIO_TLS_CERT_PATH or FOLIO_TLS_KEY_PATH is not set"
                            .to_string(),
                    ))
                }
            }
        }

        Self::validate_session_secret(&session_secret)?;

        Ok(Self {
            host,
            port,
            session_secret,
            session_ttl_hours,
            secure_cookies,
            login_max_attempts,
            login_window: Duration::from_secs(login_window_secs),
            google_client_id,
            development_mode,
            tls_cert_path,
            tls_key_path,
            enable_tls,
        })
    }
}
