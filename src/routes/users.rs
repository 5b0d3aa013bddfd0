use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodgram_shared::{Page, PageQuery};
use foodgram_user::{
    LoginInput, Profile, RegisterInput, SetPasswordInput, UserRow, generate_jwt,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::AppState;

/// POST /api/users
pub async fn register(
    State(app): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse, AppError> {
    let user = app.user.register(input).await?;

    Ok((StatusCode::CREATED, Json(user.into_profile(false))))
}

/// POST /api/auth/token/login
///
/// Bad credentials answer 400 without telling which half was wrong.
pub async fn login(
    State(app): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Response, AppError> {
    let Some(user) = app.user.login(input).await? else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": "Unable to log in with provided credentials" })),
        )
            .into_response());
    };

    let token = generate_jwt(
        user.id,
        &app.config.jwt.secret,
        app.config.jwt.expiration_days,
    )?;

    Ok(Json(json!({ "auth_token": token })).into_response())
}

/// POST /api/auth/token/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn me(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Result<impl IntoResponse, AppError> {
    let Some(user) = app.user.find_by_id(auth.user_id.as_str()).await? else {
        return Err(AppError::not_found("User not found"));
    };

    Ok(Json(user.into_profile(false)))
}

pub async fn find(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(user) = app.user.find_by_id(id.as_str()).await? else {
        return Err(AppError::not_found("User not found"));
    };

    let is_subscribed = app
        .user
        .subscription
        .is_subscribed(&auth.user_id, &user.id)
        .await?;

    Ok(Json(user.into_profile(is_subscribed)))
}

pub async fn list(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (count, rows) = app.user.list(page.limit(), page.offset()).await?;

    let ids = rows.iter().map(|row| row.id.to_owned()).collect();
    let subscribed = app.user.subscription.subscribed_ids(&auth.user_id, ids).await?;

    let results = rows
        .into_iter()
        .map(|row| {
            let is_subscribed = subscribed.contains(&row.id);
            row.into_profile(is_subscribed)
        })
        .collect::<Vec<_>>();

    Ok(Json(Page::new(count, results)))
}

/// POST /api/users/set_password
pub async fn set_password(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<SetPasswordInput>,
) -> Result<impl IntoResponse, AppError> {
    app.user.set_password(&auth.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Password changed" }))))
}

/// Author with a preview of their recipes, served by the subscription
/// endpoints.
#[derive(Debug, Serialize)]
pub struct AuthorPayload {
    #[serde(flatten)]
    pub profile: Profile,
    pub recipes: Vec<foodgram_recipe::ShortRecipe>,
    pub recipes_count: u64,
}

async fn author_payload(
    app: &AppState,
    author: UserRow,
    recipes_limit: Option<u64>,
) -> Result<AuthorPayload, AppError> {
    let recipes = app.recipe_query.by_author(&author.id, recipes_limit).await?;
    let recipes_count = app.recipe_query.count_by_author(&author.id).await?;

    Ok(AuthorPayload {
        profile: author.into_profile(true),
        recipes,
        recipes_count,
    })
}

#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

/// POST /api/users/{id}/subscribe
pub async fn subscribe(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Query(query): Query<SubscribeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let author = app.user.subscription.subscribe(&auth.user_id, &id).await?;
    let payload = author_payload(&app, author, query.recipes_limit).await?;

    Ok((StatusCode::CREATED, Json(payload)))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app.user.subscription.unsubscribe(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

/// GET /api/users/subscriptions
pub async fn subscriptions(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (count, authors) = app
        .user
        .subscription
        .authors(&auth.user_id, page.limit(), page.offset())
        .await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
        results.push(author_payload(&app, author, query.recipes_limit).await?);
    }

    Ok(Json(Page::new(count, results)))
}
