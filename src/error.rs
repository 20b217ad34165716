use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum RustyFolioError {
    // Lookup errors
    NotFound(String),

    // Auth errors
    InvalidCredentials,
    AuthError(String),
    Unauthorized,
    Forbidden,
    TooManyRequests(String),

    // Input errors
    ValidationError(String),
    Conflict(String),

    // Storage errors
    StorageError(String),

    // System errors
    ServerError(String),

    // Configuration errors
    ConfigError(String),
}

impl RustyFolioError {
    /// HTTP status used when this error reaches a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::AuthError(_) | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::StorageError(_) | Self::ServerError(_) | Self::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to a client. Internal failures are not leaked.
    pub fn public_message(&self) -> String {
        match self {
            Self::StorageError(_) | Self::ServerError(_) | Self::ConfigError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn not_found(kind: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", kind, id))
    }
}

impl fmt::Display for RustyFolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            Self::Unauthorized => write!(f, "Authentication required"),
            Self::Forbidden => write!(f, "Forbidden: resource belongs to another user"),
            Self::TooManyRequests(msg) => write!(f, "Too many requests: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::Conflict(msg) => write!(f, "{}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ServerError(msg) => write!(f, "Server error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RustyFolioError {}

impl warp::reject::Reject for RustyFolioError {}

// Generic result type for RustyFolio
pub type Result<T> = std::result::Result<T, RustyFolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RustyFolioError::not_found("Project", 3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RustyFolioError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(RustyFolioError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            RustyFolioError::ValidationError("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RustyFolioError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let err = RustyFolioError::StorageError("table users missing".into());
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.to_string().contains("table users missing"));
    }

    #[test]
    fn test_not_found_message() {
        let err = RustyFolioError::not_found("Skill", 42);
        assert_eq!(err.to_string(), "Skill 42 not found");
    }
}
