//! Authentication and authorization module

pub mod authority;
pub mod gate;
pub mod password;
pub mod provider;
pub mod token;
pub mod user;

// Re-export main components
pub use authority::{LoginRequest, RegisterRequest, Session, SessionAuthority};
pub use gate::Identity;
pub use provider::{GoogleIdentityProvider, IdentityProvider, IdentityProviders, StaticIdentityProvider};
pub use token::{Claims, TokenManager};
pub use user::{AuthProvider, User, UserInfo, UserRole};
