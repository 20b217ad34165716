//! Request handlers for the JSON API

pub mod auth;
pub mod content;
pub mod portfolio;
pub mod rejection;

use std::convert::Infallible;
use warp::{Filter, Reply};

use crate::content::{Experience, HeroSection, MainFooter, MainHeader, Project, Skill, SocialAccount};
use crate::core::AppState;
use crate::security::with_api_security_headers;

pub use rejection::handle_rejection;

/// The complete route tree, with error recovery and security headers
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    auth::auth_routes(state.clone())
        .or(content::content_routes::<Project>(&state))
        .unify()
        .or(content::content_routes::<Skill>(&state))
        .unify()
        .or(content::content_routes::<Experience>(&state))
        .unify()
        .or(content::contact_routes(&state))
        .unify()
        .or(content::content_routes::<HeroSection>(&state))
        .unify()
        .or(content::content_routes::<MainHeader>(&state))
        .unify()
        .or(content::content_routes::<MainFooter>(&state))
        .unify()
        .or(content::content_routes::<SocialAccount>(&state))
        .unify()
        .or(portfolio::portfolio_routes(&state))
        .unify()
        .recover(handle_rejection)
        .unify()
        .with(warp::log("rusty_folio::api"))
        .map(with_api_security_headers)
}
