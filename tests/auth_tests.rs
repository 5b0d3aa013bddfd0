use axum::http::StatusCode;
use serde_json::json;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn register_login_me_roundtrip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let body = json!({
        "email": "john.doe@foodgram.localhost",
        "username": "john.doe",
        "first_name": "John",
        "last_name": "Doe",
        "password": helpers::PASSWORD,
    });
    let (status, value) = helpers::request(&app, "POST", "/api/users", None, Some(body)).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["email"], "john.doe@foodgram.localhost");
    assert_eq!(value["username"], "john.doe");
    assert_eq!(value["is_subscribed"], false);
    assert!(value.get("password").is_none());

    let token = helpers::login(&app, "john.doe").await?;
    let (status, value) =
        helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["username"], "john.doe");
    assert_eq!(value["first_name"], "John");
    assert_eq!(value["last_name"], "Doe");

    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    helpers::signup(&app, "john.doe").await?;

    let body = json!({
        "email": helpers::email_of("john.doe"),
        "password": "not_the_password",
    });
    let (status, value) =
        helpers::request(&app, "POST", "/api/auth/token/login", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Unable to log in with provided credentials");

    // Unknown email answers the same way
    let body = json!({
        "email": "nobody@foodgram.localhost",
        "password": helpers::PASSWORD,
    });
    let (status, value) =
        helpers::request(&app, "POST", "/api/auth/token/login", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Unable to log in with provided credentials");

    Ok(())
}

#[tokio::test]
async fn protected_route_requires_credentials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let (status, value) = helpers::request(&app, "GET", "/api/users/me", None, None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["detail"], "Authentication credentials were not provided");

    let (status, value) =
        helpers::request(&app, "GET", "/api/users/me", Some("garbage"), None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["detail"], "Invalid token");

    Ok(())
}

#[tokio::test]
async fn legacy_token_scheme_is_accepted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "john.doe").await?;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/users/me")
        .header(axum::http::header::AUTHORIZATION, format!("Token {token}"))
        .body(axum::body::Body::empty())?;

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn blocked_user_is_locked_out_of_the_api() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "john.doe").await?;
    helpers::set_role(&app, "john.doe", foodgram_user::Role::Blocked).await?;

    let (status, value) =
        helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["detail"], "Your account has been blocked");

    // Login still hands out a token, the middleware is what locks them out
    let token = helpers::login(&app, "john.doe").await?;
    let (status, _) = helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn logout_answers_no_content_and_tokens_stay_valid() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "john.doe").await?;

    let (status, _) =
        helpers::request(&app, "POST", "/api/auth/token/logout", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Stateless tokens cannot be revoked server-side
    let (status, _) = helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn unknown_route_answers_json_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let (status, value) = helpers::request(&app, "GET", "/api/nope", None, None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["detail"], "Not found");

    Ok(())
}
