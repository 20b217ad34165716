//! `/api/{kind}` endpoints, generic over the content kind

use serde_json::json;
use uuid::Uuid;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use super::auth::{json_body, optional_identity, with_identity, with_state};
use crate::auth::Identity;
use crate::content::{Contact, ContactSubmission, ContentKind, ListingQuery};
use crate::core::AppState;

fn kind_path<T: ContentKind>() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path("api").and(warp::path(T::PATH))
}

async fn list_own<T: ContentKind>(identity: Identity, state: AppState) -> Result<Response, Rejection> {
    let records = state
        .content
        .list_own::<T>(&identity)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&records).into_response())
}

async fn list_for_user<T: ContentKind>(
    owner: Uuid,
    identity: Option<Identity>,
    query: ListingQuery,
    state: AppState,
) -> Result<Response, Rejection> {
    let records = state
        .content
        .list_for_user::<T>(identity.as_ref(), owner, &query)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&records).into_response())
}

async fn get_one<T: ContentKind>(
    id: i64,
    identity: Option<Identity>,
    state: AppState,
) -> Result<Response, Rejection> {
    let record = state
        .content
        .get::<T>(identity.as_ref(), id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&record).into_response())
}

async fn create<T: ContentKind>(identity: Identity, fields: T, state: AppState) -> Result<Response, Rejection> {
    let record = state
        .content
        .create(&identity, fields)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::with_status(warp::reply::json(&record), StatusCode::CREATED).into_response())
}

async fn update<T: ContentKind>(
    id: i64,
    identity: Identity,
    update: T::Update,
    state: AppState,
) -> Result<Response, Rejection> {
    let record = state
        .content
        .update::<T>(&identity, id, update)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&record).into_response())
}

async fn delete<T: ContentKind>(id: i64, identity: Identity, state: AppState) -> Result<Response, Rejection> {
    let record = state
        .content
        .delete::<T>(&identity, id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&json!({
        "message": format!("{} deleted", T::NAME),
        "deleted": record,
    }))
    .into_response())
}

async fn submit_contact(submission: ContactSubmission, state: AppState) -> Result<Response, Rejection> {
    let record = state
        .content
        .submit_contact(submission)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::with_status(warp::reply::json(&record), StatusCode::CREATED).into_response())
}

/// Listing, single-row and mutation routes every kind shares
fn shared_routes<T: ContentKind>(state: &AppState) -> BoxedFilter<(Response,)> {
    let list_own_route = kind_path::<T>()
        .and(warp::path::end())
        .and(warp::get())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(list_own::<T>);

    let get_route = kind_path::<T>()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(optional_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(get_one::<T>);

    let list_for_user_route = kind_path::<T>()
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::get())
        .and(optional_identity(state.clone()))
        .and(warp::query::<ListingQuery>())
        .and(with_state(state.clone()))
        .and_then(list_for_user::<T>);

    let update_route = kind_path::<T>()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_identity(state.clone()))
        .and(json_body::<T::Update>())
        .and(with_state(state.clone()))
        .and_then(update::<T>);

    let delete_route = kind_path::<T>()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_identity(state.clone()))
        .and(with_state(state.clone()))
        .and_then(delete::<T>);

    list_own_route
        .or(get_route)
        .unify()
        .or(list_for_user_route)
        .unify()
        .or(update_route)
        .unify()
        .or(delete_route)
        .unify()
        .boxed()
}

/// Routes for a kind whose rows the session user creates
pub fn content_routes<T: ContentKind>(state: &AppState) -> BoxedFilter<(Response,)> {
    let create_route = kind_path::<T>()
        .and(warp::path::end())
        .and(warp::post())
        .and(with_identity(state.clone()))
        .and(json_body::<T>())
        .and(with_state(state.clone()))
        .and_then(create::<T>);

    create_route.or(shared_routes::<T>(state)).unify().boxed()
}

/// Contact inbox: anyone may post, only the recipient reads
pub fn contact_routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let submit_route = kind_path::<Contact>()
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<ContactSubmission>())
        .and(with_state(state.clone()))
        .and_then(submit_contact);

    submit_route.or(shared_routes::<Contact>(state)).unify().boxed()
}
