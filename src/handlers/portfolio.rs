//! Profile, dashboard and public portfolio endpoints

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use super::auth::{cleared_session_cookie, json_body, with_identity, with_state};
use crate::auth::gate::authorize_owner;
use crate::auth::Identity;
use crate::core::AppState;

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

async fn profile(owner: Uuid, state: AppState) -> Result<Response, Rejection> {
    let profile = state
        .content
        .profile(owner)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&profile).into_response())
}

async fn rename(identity: Identity, request: RenameRequest, state: AppState) -> Result<Response, Rejection> {
    let user = state
        .authority
        .rename(&identity, &request.name)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&user).into_response())
}

async fn delete_account(identity: Identity, state: AppState) -> Result<Response, Rejection> {
    let user = state
        .authority
        .delete_account(&identity)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::with_header(
        warp::reply::json(&json!({ "message": "Account deleted", "user": user })),
        "set-cookie",
        cleared_session_cookie(&state),
    )
    .into_response())
}

async fn dashboard(identity: Identity, state: AppState) -> Result<Response, Rejection> {
    let stats = state
        .content
        .dashboard(&identity)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&stats).into_response())
}

async fn dashboard_for(owner: Uuid, identity: Identity, state: AppState) -> Result<Response, Rejection> {
    authorize_owner(&identity, owner, "read", "dashboard")
        .await
        .map_err(warp::reject::custom)?;
    dashboard(identity, state).await
}

async fn portfolio(owner: Uuid, state: AppState) -> Result<Response, Rejection> {
    let portfolio = state
        .content
        .portfolio(owner)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&portfolio).into_response())
}

async fn health(state: AppState) -> Result<Response, Rejection> {
    let healthy = state.storage.health_check().await.unwrap_or_else(|e| {
        log::error!("Storage health check failed: {}", e);
        false
    });
    let status = if healthy {
        warp::http::StatusCode::OK
    } else {
        warp::http::StatusCode::SERVICE_UNAVAILABLE
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "status": if healthy { "ok" } else { "unavailable" } })),
        status,
    )
    .into_response())
}

pub fn portfolio_routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let profile_route = warp::path!("api" / "profile" / Uuid)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(profile);

    let rename_route = warp::path!("api" / "profile")
        .and(warp::put())
        .and(with_identity(state.clone()))
        .and(json_body::<RenameRequest>())
        .and(with_state(state.clone()))
        .and_then(rename);

    let delete_account_route = warp::path!("api" / "profile")
        .and(warp::delete())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(delete_account);

    let dashboard_route = warp::path!("api" / "dashboard")
        .and(warp::get())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(dashboard);

    let dashboard_for_route = warp::path!("api" / "dashboard" / Uuid)
        .and(warp::get())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(dashboard_for);

    let portfolio_route = warp::path!("api" / "portfolio" / Uuid)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(portfolio);

    let health_route = warp::path(crate::constants::HEALTH_PATH)
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(health);

    profile_route
        .or(rename_route)
        .unify()
        .or(delete_account_route)
        .unify()
        .or(dashboard_route)
        .unify()
        .or(dashboard_for_route)
        .unify()
        .or(portfolio_route)
        .unify()
        .or(health_route)
        .unify()
        .boxed()
}
