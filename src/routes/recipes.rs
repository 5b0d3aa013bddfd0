use std::collections::{HashMap, HashSet};

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Query;
use foodgram_recipe::{
    IngredientAmountRow, RecipeFilter, RecipeInput, RecipeRow, RecipeTagRow,
};
use foodgram_shared::{Page, PageQuery};
use foodgram_user::Profile;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::{Auth, MaybeAuth};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct TagPayload {
    pub id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<RecipeTagRow> for TagPayload {
    fn from(row: RecipeTagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            color: row.color,
            slug: row.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientPayload {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl From<IngredientAmountRow> for IngredientPayload {
    fn from(row: IngredientAmountRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            measurement_unit: row.measurement_unit,
            amount: row.amount,
        }
    }
}

/// Full recipe shape served by the list, detail and write endpoints.
#[derive(Debug, Serialize)]
pub struct RecipePayload {
    pub id: String,
    pub author: Profile,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
    pub tags: Vec<TagPayload>,
    pub ingredients: Vec<IngredientPayload>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Joins tags, ingredients, author profiles and the per-user flags onto a
/// page of recipe rows. Everything is fetched per page, not per row.
async fn payloads(
    app: &AppState,
    auth: Option<&Auth>,
    rows: Vec<RecipeRow>,
) -> Result<Vec<RecipePayload>, AppError> {
    let recipe_ids: Vec<String> = rows.iter().map(|row| row.id.to_owned()).collect();

    let (favorited, in_cart) = match auth {
        Some(auth) => (
            app.recipe
                .favorite
                .ids_for(&auth.user_id, recipe_ids.to_owned())
                .await?,
            app.cart.ids_for(&auth.user_id, recipe_ids.to_owned()).await?,
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    let mut tags: HashMap<String, Vec<TagPayload>> = HashMap::new();
    for row in app.recipe_query.tags_of(recipe_ids.to_owned()).await? {
        tags.entry(row.recipe_id.to_owned()).or_default().push(row.into());
    }

    let mut ingredients: HashMap<String, Vec<IngredientPayload>> = HashMap::new();
    for row in app.recipe_query.ingredients_of(recipe_ids).await? {
        ingredients
            .entry(row.recipe_id.to_owned())
            .or_default()
            .push(row.into());
    }

    let author_ids: Vec<String> = rows
        .iter()
        .map(|row| row.author_id.to_owned())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let subscribed = match auth {
        Some(auth) => {
            app.user
                .subscription
                .subscribed_ids(&auth.user_id, author_ids.to_owned())
                .await?
        }
        None => HashSet::new(),
    };

    let mut authors: HashMap<String, Profile> = HashMap::new();
    for author_id in author_ids {
        let Some(user) = app.user.find_by_id(author_id.as_str()).await? else {
            return Err(foodgram_shared::Error::Server(format!(
                "author {author_id} of a listed recipe is missing"
            ))
            .into());
        };
        let is_subscribed = subscribed.contains(&author_id);
        authors.insert(author_id, user.into_profile(is_subscribed));
    }

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let author = match authors.get(&row.author_id) {
            Some(author) => author.to_owned(),
            None => continue,
        };
        let recipe_tags = tags.remove(&row.id).unwrap_or_default();
        let recipe_ingredients = ingredients.remove(&row.id).unwrap_or_default();
        let is_favorited = favorited.contains(&row.id);
        let is_in_shopping_cart = in_cart.contains(&row.id);

        results.push(RecipePayload {
            id: row.id,
            author,
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
            tags: recipe_tags,
            ingredients: recipe_ingredients,
            is_favorited,
            is_in_shopping_cart,
        });
    }

    Ok(results)
}

async fn single_payload(
    app: &AppState,
    auth: Option<&Auth>,
    row: RecipeRow,
) -> Result<RecipePayload, AppError> {
    let mut rows = payloads(app, auth, vec![row]).await?;

    match rows.pop() {
        Some(payload) => Ok(payload),
        None => Err(foodgram_shared::Error::Server(
            "recipe payload missing after assembly".to_string(),
        )
        .into()),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

/// The original clients send `1`, newer ones send `true`.
fn flag_on(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

/// GET /api/recipes
///
/// Filter flags that need a user are ignored for anonymous callers.
pub async fn list(
    State(app): State<AppState>,
    Extension(MaybeAuth(auth)): Extension<MaybeAuth>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };

    let filter = RecipeFilter {
        author: query.author,
        tags: query.tags,
        favorited_by: auth
            .as_ref()
            .filter(|_| flag_on(&query.is_favorited))
            .map(|auth| auth.user_id.to_owned()),
        in_cart_of: auth
            .as_ref()
            .filter(|_| flag_on(&query.is_in_shopping_cart))
            .map(|auth| auth.user_id.to_owned()),
    };

    let (count, rows) = app
        .recipe_query
        .list(&filter, page.limit(), page.offset())
        .await?;
    let results = payloads(&app, auth.as_ref(), rows).await?;

    Ok(Json(Page::new(count, results)))
}

/// GET /api/recipes/{id}
pub async fn find(
    State(app): State<AppState>,
    Extension(MaybeAuth(auth)): Extension<MaybeAuth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(recipe) = app.recipe_query.find(id).await? else {
        return Err(AppError::not_found("Recipe not found"));
    };

    Ok(Json(single_payload(&app, auth.as_ref(), recipe).await?))
}

/// POST /api/recipes
pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = app.recipe.create(auth.user_id.as_str(), input).await?;
    let body = single_payload(&app, Some(&auth), recipe).await?;

    Ok((StatusCode::CREATED, Json(body)))
}

/// PATCH /api/recipes/{id}
pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = app
        .recipe
        .update(id, &auth.user_id, auth.is_admin(), input)
        .await?;
    let body = single_payload(&app, Some(&auth), recipe).await?;

    Ok(Json(body))
}

/// DELETE /api/recipes/{id}
pub async fn remove(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app.recipe.delete(id, &auth.user_id, auth.is_admin()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/favorite
pub async fn favorite(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(short) = app.recipe_query.find_short(id.as_str()).await? else {
        return Err(AppError::not_found("Recipe not found"));
    };

    app.recipe.favorite.add(&auth.user_id, &id).await?;

    Ok((StatusCode::CREATED, Json(short)))
}

/// DELETE /api/recipes/{id}/favorite
pub async fn unfavorite(
    State(app): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if app.recipe_query.find_short(id.as_str()).await?.is_none() {
        return Err(AppError::not_found("Recipe not found"));
    }

    app.recipe.favorite.remove(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
