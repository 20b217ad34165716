//! Rusty Folio - A multi-tenant portfolio builder API implemented in Rust
//!
//! Each registered user manages their own portfolio content (projects,
//! skills, experience, hero, header, footer, social accounts and a contact
//! inbox) through an owner-only admin API, while visitors read the published
//! part of any portfolio.

pub mod auth;
pub mod config;
pub mod constants;
pub mod content;
pub mod core;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use crate::core::AppState;
pub use error::{Result, RustyFolioError};
pub use handlers::routes;
