//! Security-focused logging module to track security events

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { email: Option<String>, reason: String },
    AuthenticationSuccess { user_id: Uuid, provider: String },
    AccountCreated { user_id: Uuid, provider: String },
    AccountDeleted { user_id: Uuid },
    SessionRevoked { user_id: Uuid, token_id: String },
    TokenValidationFailed { reason: String },

    // Authorization events
    PermissionDenied { user_id: Uuid, action: String, resource: String },
    UnauthorizedAccess { resource: String },

    // Abuse
    RateLimitExceeded { key: String, limit_type: String },
    InvalidInput { user_id: Option<Uuid>, input_type: String, details: String },

    // System security
    ConfigurationError { component: String, error: String },
}

impl SecurityEvent {
    /// Event key for counting and thresholds
    fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::AccountCreated { .. } => "account_created",
            SecurityEvent::AccountDeleted { .. } => "account_deleted",
            SecurityEvent::SessionRevoked { .. } => "session_revoked",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::UnauthorizedAccess { .. } => "unauthorized_access",
            SecurityEvent::RateLimitExceeded { .. } => "rate_limit",
            SecurityEvent::InvalidInput { .. } => "invalid_input",
            SecurityEvent::ConfigurationError { .. } => "config_error",
        }
    }
}

/// Security logger: forwards events to `log` and raises an alert every
/// time a type's count crosses a multiple of its threshold
pub struct SecurityLogger {
    event_counts: RwLock<HashMap<&'static str, usize>>,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);
        alert_thresholds.insert("permission_denied", 20);
        alert_thresholds.insert("unauthorized_access", 20);
        alert_thresholds.insert("rate_limit", 10);
        alert_thresholds.insert("config_error", 1);

        Self {
            event_counts: RwLock::new(HashMap::new()),
            alert_thresholds,
        }
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let event_key = event.key();

        // Update counters and check for alerts
        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(event_key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(event_key) {
                if *count % threshold == 0 {
                    log::error!(
                        "SECURITY ALERT: {} events of type '{}' detected. Sample: {:?}",
                        count,
                        event_key,
                        event
                    );
                }
            }
        }

        match event {
            SecurityEvent::AuthenticationFailed { email, reason } => {
                log::warn!("SECURITY: Authentication failed - Email: {:?}, Reason: {}", email, reason);
            }
            SecurityEvent::AuthenticationSuccess { user_id, provider } => {
                log::info!("SECURITY: Authentication success - User: {}, Provider: {}", user_id, provider);
            }
            SecurityEvent::AccountCreated { user_id, provider } => {
                log::info!("SECURITY: Account created - User: {}, Provider: {}", user_id, provider);
            }
            SecurityEvent::AccountDeleted { user_id } => {
                log::info!("SECURITY: Account deleted - User: {}", user_id);
            }
            SecurityEvent::SessionRevoked { user_id, token_id } => {
                log::info!("SECURITY: Session revoked - User: {}, Token: {}", user_id, token_id);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::warn!("SECURITY: Token validation failed - Reason: {}", reason);
            }
            SecurityEvent::PermissionDenied { user_id, action, resource } => {
                log::warn!("SECURITY: Permission denied - User: {}, Action: {}, Resource: {}", user_id, action, resource);
            }
            SecurityEvent::UnauthorizedAccess { resource } => {
                log::warn!("SECURITY: Unauthenticated access attempt - Resource: {}", resource);
            }
            SecurityEvent::RateLimitExceeded { key, limit_type } => {
                log::warn!("SECURITY: Rate limit exceeded - Key: {}, Type: {}", key, limit_type);
            }
            SecurityEvent::InvalidInput { user_id, input_type, details } => {
                log::debug!("SECURITY: Invalid input - User: {:?}, Type: {}, Details: {}", user_id, input_type, details);
            }
            SecurityEvent::ConfigurationError { component, error } => {
                log::error!("SECURITY: Configuration error - Component: {}, Error: {}", component, error);
            }
        }
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global security logger instance - thread-safe singleton
static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger
pub fn init_security_logger() {
    SECURITY_LOGGER.get_or_init(|| Arc::new(SecurityLogger::new()));
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger
pub async fn log_security_event(event: SecurityEvent) {
    match get_security_logger() {
        Some(logger) => logger.log_event(event).await,
        // Not initialized (library use, tests): plain log output only
        None => log::debug!("SECURITY: {:?}", event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_are_counted() {
        let logger = SecurityLogger::new();
        let user_id = Uuid::new_v4();
        for _ in 0..3 {
            logger
                .log_event(SecurityEvent::PermissionDenied {
                    user_id,
                    action: "update".to_string(),
                    resource: "projects/1".to_string(),
                })
                .await;
        }
        logger
            .log_event(SecurityEvent::AuthenticationFailed {
                email: Some("a@x.com".to_string()),
                reason: "bad password".to_string(),
            })
            .await;

        let counts = logger.event_counts.read().await;
        assert_eq!(counts.get("permission_denied"), Some(&3));
        assert_eq!(counts.get("auth_failed"), Some(&1));
        assert_eq!(counts.get("rate_limit"), None);
    }

    #[tokio::test]
    async fn test_global_logger_initializes_once() {
        init_security_logger();
        let first = get_security_logger().unwrap();
        init_security_logger();
        assert!(Arc::ptr_eq(&first, &get_security_logger().unwrap()));

        log_security_event(SecurityEvent::TokenValidationFailed {
            reason: "expired".to_string(),
        })
        .await;
    }
}
