use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::user::User;
use crate::constants::SESSION_ISSUER;
use crate::error::{Result, RustyFolioError};
use crate::storage::token_revocation::{RevocationReason, RevokedToken, SharedTokenRevocationStore};

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email at issue time
    pub email: String,
    /// Token id, used for revocation
    pub jti: String,
    pub iss: String,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Not before (as UTC timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates new claims for a user, valid for `ttl_hours`
    pub fn new(user_id: Uuid, email: String, ttl_hours: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            jti: Uuid::new_v4().to_string(),
            iss: SESSION_ISSUER.to_string(),
            exp: now + ttl_hours * 3600,
            iat: now,
            nbf: now,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| RustyFolioError::AuthError("Invalid token subject".to_string()))
    }
}

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Manages session token signing, validation and revocation
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: i64,
    revocation_store: SharedTokenRevocationStore,
}

impl TokenManager {
    pub fn new(secret: &str, ttl_hours: i64, revocation_store: SharedTokenRevocationStore) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.validate_nbf = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_hours,
            revocation_store,
        }
    }

    pub fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    /// Signs a new session token for the user
    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let claims = Claims::new(user.id, user.email.clone(), self.ttl_hours);
        let token = self.generate_token(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Generates a signed token for the given claims
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| RustyFolioError::AuthError(format!("Failed to generate token: {}", e)))
    }

    /// Validates signature, expiry and revocation, returning the claims
    pub async fn validate_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| RustyFolioError::AuthError(format!("Invalid token: {}", e)))?
            .claims;

        if claims.is_expired() {
            return Err(RustyFolioError::AuthError("Token expired".to_string()));
        }

        if self.revocation_store.is_token_revoked(&claims.jti).await? {
            return Err(RustyFolioError::AuthError("Token revoked".to_string()));
        }

        Ok(claims)
    }

    /// Revokes the token described by `claims` until it would have expired
    pub async fn revoke(&self, claims: &Claims, reason: RevocationReason) -> Result<()> {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);

        self.revocation_store
            .revoke_token(RevokedToken {
                token_id: claims.jti.clone(),
                user_id: claims.user_id()?,
                revoked_at: Utc::now(),
                expires_at,
                reason,
            })
            .await
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
