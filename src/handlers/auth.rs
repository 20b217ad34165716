//! Session filters and authentication endpoints

use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::auth::token::extract_bearer_token;
use crate::auth::{Identity, LoginRequest, RegisterRequest, Session};
use crate::constants::{MAX_JSON_BODY_BYTES, SESSION_COOKIE};
use crate::core::AppState;
use crate::error::RustyFolioError;

/// Helper to include the application state in a request
pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// JSON body with a size limit
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_JSON_BODY_BYTES).and(warp::body::json())
}

/// Session token from `Authorization: Bearer`, falling back to the cookie
fn session_token() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .map(|authorization: Option<String>, cookie: Option<String>| {
            authorization
                .as_deref()
                .and_then(extract_bearer_token)
                .or(cookie.filter(|token| !token.is_empty()))
        })
}

/// Require a valid session
pub fn with_identity(state: AppState) -> impl Filter<Extract = (Identity,), Error = Rejection> + Clone {
    session_token()
        .and(with_state(state))
        .and_then(|token: Option<String>, state: AppState| async move {
            let token = token.ok_or_else(|| warp::reject::custom(RustyFolioError::Unauthorized))?;
            state
                .authority
                .resolve(&token)
                .await
                .map_err(warp::reject::custom)
        })
}

/// Resolve a session if one is presented; anonymous otherwise
pub fn optional_identity(
    state: AppState,
) -> impl Filter<Extract = (Option<Identity>,), Error = Rejection> + Clone {
    session_token()
        .and(with_state(state))
        .and_then(|token: Option<String>, state: AppState| async move {
            let identity = match token {
                Some(token) => state.authority.resolve(&token).await.ok(),
                None => None,
            };
            Ok::<_, Rejection>(identity)
        })
}

fn session_cookie(state: &AppState, token: &str) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.authority.token_ttl_hours() * 3600
    );
    if state.config.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn cleared_session_cookie(state: &AppState) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    if state.config.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

fn session_reply(state: &AppState, session: Session) -> Response {
    let cookie = session_cookie(state, &session.token);
    warp::reply::with_header(warp::reply::json(&session), "set-cookie", cookie).into_response()
}

#[derive(Debug, Deserialize)]
pub struct OAuthLoginRequest {
    /// Provider-issued assertion (a Google ID token)
    #[serde(alias = "idToken", alias = "credential")]
    pub assertion: String,
}

async fn register(request: RegisterRequest, state: AppState) -> Result<Response, Rejection> {
    let user = state
        .authority
        .register(request)
        .await
        .map_err(warp::reject::custom)?;
    log::info!("Registered user {}", user.id);
    Ok(warp::reply::with_status(warp::reply::json(&json!({ "user": user })), StatusCode::CREATED)
        .into_response())
}

async fn login(request: LoginRequest, state: AppState) -> Result<Response, Rejection> {
    let session = state
        .authority
        .login_password(request)
        .await
        .map_err(warp::reject::custom)?;
    Ok(session_reply(&state, session))
}

async fn oauth_login(
    provider: String,
    request: OAuthLoginRequest,
    state: AppState,
) -> Result<Response, Rejection> {
    let session = state
        .authority
        .login_oauth(&provider, &request.assertion)
        .await
        .map_err(warp::reject::custom)?;
    Ok(session_reply(&state, session))
}

async fn logout(identity: Identity, state: AppState) -> Result<Response, Rejection> {
    state
        .authority
        .logout(&identity)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::with_header(
        warp::reply::json(&json!({ "message": "Logged out" })),
        "set-cookie",
        cleared_session_cookie(&state),
    )
    .into_response())
}

async fn me(identity: Identity, state: AppState) -> Result<Response, Rejection> {
    let user = state
        .authority
        .current_user(&identity)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&user).into_response())
}

/// `/api/auth/*`
pub fn auth_routes(state: AppState) -> warp::filters::BoxedFilter<(Response,)> {
    let auth = warp::path("api").and(warp::path("auth"));

    let register_route = auth
        .clone()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<RegisterRequest>())
        .and(with_state(state.clone()))
        .and_then(register);

    let login_route = auth
        .clone()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_state(state.clone()))
        .and_then(login);

    let oauth_route = auth
        .clone()
        .and(warp::path("oauth"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<OAuthLoginRequest>())
        .and(with_state(state.clone()))
        .and_then(oauth_login);

    let logout_route = auth
        .clone()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(logout);

    let me_route = auth
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_identity(state.clone()))
        .and(with_state(state))
        .and_then(me);

    register_route
        .or(login_route)
        .unify()
        .or(oauth_route)
        .unify()
        .or(logout_route)
        .unify()
        .or(me_route)
        .unify()
        .boxed()
}
