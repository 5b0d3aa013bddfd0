use foodgram_db::table::{Favorite, Recipe, RecipeIngredient, RecipeTag, ShoppingCart};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use ulid::Ulid;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub author_id: String,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
    pub created_at: i64,
}

pub(crate) const COLUMNS: [Recipe; 7] = [
    Recipe::Id,
    Recipe::AuthorId,
    Recipe::Name,
    Recipe::Image,
    Recipe::Text,
    Recipe::CookingTime,
    Recipe::CreatedAt,
];

pub(crate) async fn find(
    db: &sqlx::SqlitePool,
    id: impl Into<String>,
) -> foodgram_shared::Result<Option<RecipeRow>> {
    let (sql, values) = Query::select()
        .columns(COLUMNS)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id.into()))
        .limit(1)
        .build_sqlx(SqliteQueryBuilder);

    let row = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub(crate) async fn insert(
    conn: &mut sqlx::SqliteConnection,
    recipe: &RecipeRow,
) -> foodgram_shared::Result<()> {
    let (sql, values) = Query::insert()
        .into_table(Recipe::Table)
        .columns(COLUMNS)
        .values_panic([
            recipe.id.to_owned().into(),
            recipe.author_id.to_owned().into(),
            recipe.name.to_owned().into(),
            recipe.image.to_owned().into(),
            recipe.text.to_owned().into(),
            recipe.cooking_time.into(),
            recipe.created_at.into(),
        ])
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn update(
    conn: &mut sqlx::SqliteConnection,
    recipe: &RecipeRow,
) -> foodgram_shared::Result<()> {
    let (sql, values) = Query::update()
        .table(Recipe::Table)
        .value(Recipe::Name, recipe.name.to_owned())
        .value(Recipe::Image, recipe.image.to_owned())
        .value(Recipe::Text, recipe.text.to_owned())
        .value(Recipe::CookingTime, recipe.cooking_time)
        .and_where(Expr::col(Recipe::Id).eq(recipe.id.to_owned()))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn insert_tags(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: &str,
    tag_ids: &[String],
) -> foodgram_shared::Result<()> {
    for tag_id in tag_ids {
        let (sql, values) = Query::insert()
            .into_table(RecipeTag::Table)
            .columns([RecipeTag::Id, RecipeTag::RecipeId, RecipeTag::TagId])
            .values_panic([
                Ulid::new().to_string().into(),
                recipe_id.into(),
                tag_id.to_owned().into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}

pub(crate) async fn insert_ingredients(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: &str,
    amounts: &[(String, i64)],
) -> foodgram_shared::Result<()> {
    for (ingredient_id, amount) in amounts {
        let (sql, values) = Query::insert()
            .into_table(RecipeIngredient::Table)
            .columns([
                RecipeIngredient::Id,
                RecipeIngredient::RecipeId,
                RecipeIngredient::IngredientId,
                RecipeIngredient::Amount,
            ])
            .values_panic([
                Ulid::new().to_string().into(),
                recipe_id.into(),
                ingredient_id.to_owned().into(),
                (*amount).into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}

pub(crate) async fn delete_tags(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: &str,
) -> foodgram_shared::Result<()> {
    let (sql, values) = Query::delete()
        .from_table(RecipeTag::Table)
        .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn delete_ingredients(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: &str,
) -> foodgram_shared::Result<()> {
    let (sql, values) = Query::delete()
        .from_table(RecipeIngredient::Table)
        .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

/// Removes the recipe row together with every row that points at it.
/// The schema carries no foreign keys, so favorites and cart entries
/// would otherwise dangle.
pub(crate) async fn delete(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: &str,
) -> foodgram_shared::Result<()> {
    delete_tags(&mut *conn, recipe_id).await?;
    delete_ingredients(&mut *conn, recipe_id).await?;

    let (sql, values) = Query::delete()
        .from_table(Favorite::Table)
        .and_where(Expr::col(Favorite::RecipeId).eq(recipe_id))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    let (sql, values) = Query::delete()
        .from_table(ShoppingCart::Table)
        .and_where(Expr::col(ShoppingCart::RecipeId).eq(recipe_id))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    let (sql, values) = Query::delete()
        .from_table(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(recipe_id))
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
