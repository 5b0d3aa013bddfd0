#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use foodgram::config::{
    Config, DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig, SiteConfig,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";
pub const PASSWORD: &str = "my_password_123";

pub struct TestApp {
    pub router: Router,
    pub db: foodgram_shared::State,
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite:unused.db".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiration_days: 1,
        },
        site: SiteConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

/// Migrated file-backed database plus a router over it. Pooled in-memory
/// SQLite hands every connection its own empty database, so tests use a
/// temp file instead.
pub async fn setup(path: PathBuf) -> anyhow::Result<TestApp> {
    let options = SqliteConnectOptions::from_str(&format!(
        "sqlite:{}",
        path.to_str().unwrap_or_default()
    ))?
    .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let db = foodgram_shared::State {
        read_db: pool.clone(),
        write_db: pool,
    };

    let router = foodgram::create_app(test_config(), db.clone());

    Ok(TestApp { router, db })
}

/// Sends one request and decodes the JSON body. Empty bodies come back as
/// `Value::Null`.
pub async fn request(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

/// Like [`request`] but keeps the raw body and headers, for the shopping
/// list download.
pub async fn request_raw(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> anyhow::Result<(StatusCode, HeaderMap, String)> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app.router.clone().oneshot(builder.body(Body::empty())?).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok((status, headers, String::from_utf8(bytes.to_vec())?))
}

pub fn email_of(username: &str) -> String {
    format!("{username}@foodgram.localhost")
}

/// Registers a user through the API and returns an auth token.
pub async fn signup(app: &TestApp, username: &str) -> anyhow::Result<String> {
    let body = json!({
        "email": email_of(username),
        "username": username,
        "first_name": "Test",
        "last_name": "User",
        "password": PASSWORD,
    });

    let (status, value) = request(app, "POST", "/api/users", None, Some(body)).await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "register {username} failed: {status} {value}"
    );

    login(app, username).await
}

pub async fn login(app: &TestApp, username: &str) -> anyhow::Result<String> {
    let body = json!({
        "email": email_of(username),
        "password": PASSWORD,
    });

    let (status, value) = request(app, "POST", "/api/auth/token/login", None, Some(body)).await?;
    anyhow::ensure!(
        status == StatusCode::OK,
        "login {username} failed: {status} {value}"
    );

    Ok(value["auth_token"].as_str().unwrap_or_default().to_owned())
}

/// Registers a user and promotes them through the same command the CLI
/// uses.
pub async fn signup_admin(app: &TestApp, username: &str) -> anyhow::Result<String> {
    let token = signup(app, username).await?;

    let command = foodgram_user::Command::new(app.db.clone());
    command
        .set_role(&email_of(username), foodgram_user::Role::Admin)
        .await?;

    Ok(token)
}

pub async fn set_role(
    app: &TestApp,
    username: &str,
    role: foodgram_user::Role,
) -> anyhow::Result<()> {
    let command = foodgram_user::Command::new(app.db.clone());
    command.set_role(&email_of(username), role).await?;

    Ok(())
}

/// Seeds a tag directly, bypassing the admin-only endpoint.
pub async fn create_tag(
    app: &TestApp,
    name: &str,
    color: &str,
    slug: &str,
) -> anyhow::Result<String> {
    let command = foodgram_recipe::Command::new(app.db.clone());
    let tag = command
        .tag
        .create(foodgram_recipe::TagInput {
            name: name.to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        })
        .await?;

    Ok(tag.id)
}

/// Seeds an ingredient directly, bypassing the admin-only endpoint.
pub async fn create_ingredient(app: &TestApp, name: &str, unit: &str) -> anyhow::Result<String> {
    let command = foodgram_recipe::Command::new(app.db.clone());
    let ingredient = command
        .ingredient
        .create(foodgram_recipe::IngredientInput {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await?;

    Ok(ingredient.id)
}

/// Creates a recipe through the API and returns its id.
pub async fn create_recipe(
    app: &TestApp,
    token: &str,
    name: &str,
    tag_ids: &[String],
    ingredients: &[(String, i64)],
) -> anyhow::Result<String> {
    let ingredients = ingredients
        .iter()
        .map(|(id, amount)| json!({ "id": id, "amount": amount }))
        .collect::<Vec<_>>();

    let body = json!({
        "name": name,
        "text": format!("How to cook {name}"),
        "cooking_time": 30,
        "tags": tag_ids,
        "ingredients": ingredients,
    });

    let (status, value) = request(app, "POST", "/api/recipes", Some(token), Some(body)).await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "create recipe {name} failed: {status} {value}"
    );

    Ok(value["id"].as_str().unwrap_or_default().to_owned())
}
