use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::middleware::Auth;
use crate::routes::AppState;

/// POST /api/recipes/{id}/shopping_cart
pub async fn add(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(short) = app.recipe_query.find_short(id.as_str()).await? else {
        return Err(AppError::not_found("Recipe not found"));
    };

    app.cart.add(&auth.user_id, &id).await?;

    Ok((StatusCode::CREATED, Json(short)))
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if app.recipe_query.find_short(id.as_str()).await?.is_none() {
        return Err(AppError::not_found("Recipe not found"));
    }

    app.cart.remove(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart
///
/// Aggregates the cart into one plain text file, ingredients merged by
/// name and unit.
pub async fn download(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app.cart.aggregate(&auth.user_id).await?;
    let content = foodgram_cart::render_shopping_list(&rows, &app.config.site.public_url);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=shoppingcart.txt",
            ),
        ],
        content,
    ))
}
