use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use foodgram_recipe::TagInput;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::{AppState, require_admin};

pub async fn list(State(app): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app.recipe.tag.list().await?))
}

pub async fn find(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(tag) = app.recipe.tag.find(id).await? else {
        return Err(AppError::not_found("Tag not found"));
    };

    Ok(Json(tag))
}

pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<TagInput>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    let tag = app.recipe.tag.create(input).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(input): Json<TagInput>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    Ok(Json(app.recipe.tag.update(id, input).await?))
}

pub async fn remove(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth)?;

    app.recipe.tag.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
