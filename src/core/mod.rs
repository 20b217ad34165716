//! Core functionality shared by the HTTP handlers

pub mod rate_limiter;
pub mod server;

// Re-export main components for convenience
pub use rate_limiter::LoginRateLimiter;
pub use server::{configured_providers, AppState};
