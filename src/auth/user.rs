use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account-level role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    // Registered portfolio owners administer their own dashboard
    fn default() -> Self {
        UserRole::Admin
    }
}

/// How an account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Credentials,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Credentials => "credentials",
            AuthProvider::Google => "google",
        }
    }
}

/// A registered account, as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, lowercased) and unique
    pub email: String,
    /// Argon2 PHC string; `None` for OAuth-provisioned accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub name: String,
    pub role: UserRole,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh id
    pub fn new(
        email: String,
        password_hash: Option<String>,
        name: String,
        provider: AuthProvider,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role: UserRole::default(),
            provider,
            created_at: Utc::now(),
        }
    }

    /// Convert to the client-safe projection
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            provider: self.provider,
            created_at: self.created_at,
        }
    }
}

/// User information safe to send to the client (never includes the hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

/// Normalize an email for lookup and uniqueness checks
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "a@x.com".to_string(),
            None,
            "Alice".to_string(),
            AuthProvider::Google,
        );
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new(
            "a@x.com".to_string(),
            Some("$argon2id$secret".to_string()),
            "Alice".to_string(),
            AuthProvider::Credentials,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        let info = serde_json::to_value(user.to_info()).unwrap();
        assert_eq!(info["provider"], "credentials");
        assert_eq!(info["role"], "admin");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
