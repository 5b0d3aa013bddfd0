use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::middleware::{Auth, auth_middleware, optional_auth_middleware};

mod cart;
mod health;
mod ingredients;
mod recipes;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user: foodgram_user::Command,
    pub recipe: foodgram_recipe::Command,
    pub recipe_query: foodgram_recipe::Query,
    pub cart: foodgram_cart::Command,
    pub pool: SqlitePool,
}

pub async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found" })))
}

/// Tag and ingredient mutations are reserved for administrators.
pub(crate) fn require_admin(auth: &Auth) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(foodgram_shared::Error::Forbidden.into());
    }

    Ok(())
}

pub fn router(app_state: AppState) -> Router {
    // No auth required
    let public = Router::new()
        .route("/api/users", post(users::register))
        .route("/api/auth/token/login", post(users::login))
        .route("/api/tags", get(tags::list))
        .route("/api/tags/{id}", get(tags::find))
        .route("/api/ingredients", get(ingredients::list))
        .route("/api/ingredients/{id}", get(ingredients::find));

    // Anonymous reads that still honor a token when one is sent, so the
    // is_favorited and is_in_shopping_cart flags come out right
    let recipe_reads = Router::new()
        .route("/api/recipes", get(recipes::list))
        .route("/api/recipes/{id}", get(recipes::find))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            optional_auth_middleware,
        ));

    let protected = Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/me", get(users::me))
        .route("/api/users/subscriptions", get(users::subscriptions))
        .route("/api/users/set_password", post(users::set_password))
        .route("/api/users/{id}", get(users::find))
        .route(
            "/api/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/api/auth/token/logout", post(users::logout))
        .route("/api/tags", post(tags::create))
        .route("/api/tags/{id}", patch(tags::update).delete(tags::remove))
        .route("/api/ingredients", post(ingredients::create))
        .route(
            "/api/ingredients/{id}",
            patch(ingredients::update).delete(ingredients::remove),
        )
        .route("/api/recipes", post(recipes::create))
        .route(
            "/api/recipes/{id}",
            patch(recipes::update).delete(recipes::remove),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(cart::add).delete(cart::remove),
        )
        .route("/api/recipes/download_shopping_cart", get(cart::download))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(public)
        .merge(recipe_reads)
        .merge(protected)
        .fallback(fallback)
        .with_state(app_state)
}
