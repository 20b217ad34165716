mod common;

use serde_json::json;
use warp::http::StatusCode;

use common::{get, send, sign_up, skill_body, test_state};

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let response = get(&state, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_portfolio_shows_published_content() {
    let state = test_state();
    let (u, token) = sign_up(&state, "u@x.com").await;

    send(&state, "POST", "/api/skills", Some(&token), Some(skill_body("Go", 4, true))).await;
    send(&state, "POST", "/api/skills", Some(&token), Some(skill_body("Zig", 1, false))).await;
    send(
        &state,
        "POST",
        "/api/main-footer",
        Some(&token),
        Some(json!({ "descriptionMyself": "Backend developer", "address": "Lyon" })),
    )
    .await;
    send(
        &state,
        "POST",
        "/api/hero",
        Some(&token),
        Some(json!({
            "title": "Draft hero",
            "subtitle": "Unfinished",
            "description": "Not ready",
            "email": "u@x.com",
            "published": false,
        })),
    )
    .await;

    let portfolio = get(&state, &format!("/api/portfolio/{}", u), None).await;
    assert_eq!(portfolio.status, StatusCode::OK);
    assert_eq!(portfolio.body["user"]["id"], u.as_str());
    assert!(portfolio.body["user"].get("email").is_none());
    assert_eq!(portfolio.body["skills"].as_array().unwrap().len(), 1);
    assert_eq!(portfolio.body["skills"][0]["name"], "Go");
    assert_eq!(portfolio.body["footer"]["address"], "Lyon");
    assert!(portfolio.body["hero"].is_null());
    assert!(portfolio.body["header"].is_null());
    assert_eq!(portfolio.body["projects"], json!([]));

    let unknown = get(&state, &format!("/api/portfolio/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_and_rename() {
    let state = test_state();
    let (u, token) = sign_up(&state, "u@x.com").await;

    let profile = get(&state, &format!("/api/profile/{}", u), None).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["name"], "Test User");
    assert_eq!(profile.body["socialAccounts"], json!([]));
    assert!(profile.body.get("email").is_none());

    let renamed = send(&state, "PUT", "/api/profile", Some(&token), Some(json!({ "name": "Renamed" }))).await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "Renamed");

    let blank = send(&state, "PUT", "/api/profile", Some(&token), Some(json!({ "name": "  " }))).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let profile = get(&state, &format!("/api/profile/{}", u), None).await;
    assert_eq!(profile.body["name"], "Renamed");
}

#[tokio::test]
async fn test_dashboard_is_owner_only() {
    let state = test_state();
    let (u, u_token) = sign_up(&state, "u@x.com").await;
    let (_, v_token) = sign_up(&state, "v@x.com").await;

    send(&state, "POST", "/api/skills", Some(&u_token), Some(skill_body("Go", 4, false))).await;

    let own = get(&state, "/api/dashboard", Some(&u_token)).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["skills"], 1);
    assert_eq!(own.body["projects"], 0);

    let by_id = get(&state, &format!("/api/dashboard/{}", u), Some(&u_token)).await;
    assert_eq!(by_id.body, own.body);

    let other = get(&state, &format!("/api/dashboard/{}", u), Some(&v_token)).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let anonymous = get(&state, "/api/dashboard", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_deletion_cascades() {
    let state = test_state();
    let (u, token) = sign_up(&state, "u@x.com").await;
    let (_, other_token) = sign_up(&state, "v@x.com").await;

    let skill = send(&state, "POST", "/api/skills", Some(&token), Some(skill_body("Go", 4, true))).await;
    let skill_id = skill.body["id"].as_i64().unwrap();
    let kept = send(&state, "POST", "/api/skills", Some(&other_token), Some(skill_body("Rust", 5, true))).await;
    let kept_id = kept.body["id"].as_i64().unwrap();

    let deleted = send(&state, "DELETE", "/api/profile", Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.headers["set-cookie"].to_str().unwrap().contains("Max-Age=0"));

    assert_eq!(
        get(&state, &format!("/api/portfolio/{}", u), None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&state, &format!("/api/skills/{}", skill_id), None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(get(&state, "/api/auth/me", Some(&token)).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        get(&state, &format!("/api/skills/{}", kept_id), None).await.status,
        StatusCode::OK
    );

    // The email is free again
    let relogin = send(
        &state,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "u@x.com", "password": "p1" })),
    )
    .await;
    assert_eq!(relogin.status, StatusCode::UNAUTHORIZED);
    sign_up(&state, "u@x.com").await;
}
