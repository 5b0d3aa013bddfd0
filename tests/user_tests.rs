use axum::http::StatusCode;
use serde_json::json;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn register_rejects_invalid_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let body = json!({
        "email": "not-an-email",
        "username": "jo",
        "first_name": "",
        "last_name": "Doe",
        "password": "short",
    });
    let (status, value) = helpers::request(&app, "POST", "/api/users", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["errors"]["email"].is_array());
    assert!(value["errors"]["username"].is_array());
    assert!(value["errors"]["first_name"].is_array());
    assert!(value["errors"]["password"].is_array());

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicates() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    helpers::signup(&app, "john.doe").await?;

    let body = json!({
        "email": helpers::email_of("john.doe"),
        "username": "someone.else",
        "first_name": "John",
        "last_name": "Doe",
        "password": helpers::PASSWORD,
    });
    let (status, value) = helpers::request(&app, "POST", "/api/users", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "A user with this email already exists");

    let body = json!({
        "email": helpers::email_of("someone.else"),
        "username": "john.doe",
        "first_name": "John",
        "last_name": "Doe",
        "password": helpers::PASSWORD,
    });
    let (status, value) = helpers::request(&app, "POST", "/api/users", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "A user with this username already exists");

    Ok(())
}

#[tokio::test]
async fn user_list_is_paginated() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "viewer").await?;
    for name in ["alice", "bob", "carol", "dave", "erin", "frank", "grace"] {
        helpers::signup(&app, name).await?;
    }

    let (status, value) =
        helpers::request(&app, "GET", "/api/users?limit=3", Some(&token), None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["count"], 8);
    assert_eq!(value["results"].as_array().map(Vec::len), Some(3));

    let (_, value) =
        helpers::request(&app, "GET", "/api/users?limit=3&page=3", Some(&token), None).await?;

    assert_eq!(value["results"].as_array().map(Vec::len), Some(2));

    // Profiles never leak credentials
    assert!(value["results"][0].get("password").is_none());

    Ok(())
}

#[tokio::test]
async fn user_detail_and_missing_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "viewer").await?;
    helpers::signup(&app, "john.doe").await?;

    let (_, me) = helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;
    let viewer_id = me["id"].as_str().unwrap_or_default().to_owned();

    let (status, value) = helpers::request(
        &app,
        "GET",
        &format!("/api/users/{viewer_id}"),
        Some(&token),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["username"], "viewer");

    let (status, value) =
        helpers::request(&app, "GET", "/api/users/does-not-exist", Some(&token), None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["detail"], "User not found");

    Ok(())
}

#[tokio::test]
async fn set_password_verifies_the_current_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "john.doe").await?;

    let body = json!({
        "new_password": "a_brand_new_password",
        "current_password": "wrong_password",
    });
    let (status, value) = helpers::request(
        &app,
        "POST",
        "/api/users/set_password",
        Some(&token),
        Some(body),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Wrong current password");

    let body = json!({
        "new_password": "a_brand_new_password",
        "current_password": helpers::PASSWORD,
    });
    let (status, _) = helpers::request(
        &app,
        "POST",
        "/api/users/set_password",
        Some(&token),
        Some(body),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);

    // Old password no longer works, the new one does
    let body = json!({
        "email": helpers::email_of("john.doe"),
        "password": helpers::PASSWORD,
    });
    let (status, _) =
        helpers::request(&app, "POST", "/api/auth/token/login", None, Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "email": helpers::email_of("john.doe"),
        "password": "a_brand_new_password",
    });
    let (status, _) =
        helpers::request(&app, "POST", "/api/auth/token/login", None, Some(body)).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}
