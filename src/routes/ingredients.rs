use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use foodgram_recipe::IngredientInput;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::{AppState, require_admin};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

/// GET /api/ingredients?name=<prefix>
pub async fn list(
    State(app): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app.recipe.ingredient.search(query.name.as_deref()).await?;

    Ok(Json(rows))
}

pub async fn find(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(ingredient) = app.recipe.ingredient.find(id).await? else {
        return Err(AppError::not_found("Ingredient not found"));
    };

    Ok(Json(ingredient))
}

pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<IngredientInput>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    let ingredient = app.recipe.ingredient.create(input).await?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(input): Json<IngredientInput>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    Ok(Json(app.recipe.ingredient.update(id, input).await?))
}

pub async fn remove(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    app.recipe.ingredient.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
