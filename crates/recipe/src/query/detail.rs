use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag};
use sea_query::{Expr, ExprTrait, JoinType, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::repository::{self, RecipeRow};

/// Compact recipe shape used in favorites, cart and subscription payloads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShortRecipe {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeTagRow {
    pub recipe_id: String,
    pub id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientAmountRow {
    pub recipe_id: String,
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

const SHORT_COLUMNS: [Recipe; 4] = [Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime];

impl super::Query {
    pub async fn find(&self, id: impl Into<String>) -> foodgram_shared::Result<Option<RecipeRow>> {
        repository::find(&self.read_db, id).await
    }

    pub async fn find_short(
        &self,
        id: impl Into<String>,
    ) -> foodgram_shared::Result<Option<ShortRecipe>> {
        let statement = sea_query::Query::select()
            .columns(SHORT_COLUMNS)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Tags for a page of recipes in one query, keyed by `recipe_id`.
    pub async fn tags_of(
        &self,
        recipe_ids: Vec<String>,
    ) -> foodgram_shared::Result<Vec<RecipeTagRow>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let statement = sea_query::Query::select()
            .column((RecipeTag::Table, RecipeTag::RecipeId))
            .columns([
                (Tag::Table, Tag::Id),
                (Tag::Table, Tag::Name),
                (Tag::Table, Tag::Color),
                (Tag::Table, Tag::Slug),
            ])
            .from(RecipeTag::Table)
            .join(
                JoinType::InnerJoin,
                Tag::Table,
                Expr::col((RecipeTag::Table, RecipeTag::TagId)).equals((Tag::Table, Tag::Id)),
            )
            .and_where(Expr::col((RecipeTag::Table, RecipeTag::RecipeId)).is_in(recipe_ids))
            .order_by((Tag::Table, Tag::Name), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RecipeTagRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Ingredients with amounts for a page of recipes, keyed by `recipe_id`.
    pub async fn ingredients_of(
        &self,
        recipe_ids: Vec<String>,
    ) -> foodgram_shared::Result<Vec<IngredientAmountRow>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let statement = sea_query::Query::select()
            .column((RecipeIngredient::Table, RecipeIngredient::RecipeId))
            .columns([
                (Ingredient::Table, Ingredient::Id),
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(RecipeIngredient::Table)
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::IngredientId))
                    .equals((Ingredient::Table, Ingredient::Id)),
            )
            .and_where(
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId)).is_in(recipe_ids),
            )
            .order_by((Ingredient::Table, Ingredient::Name), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientAmountRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Latest recipes of one author, optionally capped. Feeds the
    /// subscription payloads where the caller asks for a preview.
    pub async fn by_author(
        &self,
        author_id: &str,
        limit: Option<u64>,
    ) -> foodgram_shared::Result<Vec<ShortRecipe>> {
        let mut statement = sea_query::Query::select()
            .columns(SHORT_COLUMNS)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .to_owned();

        if let Some(limit) = limit {
            statement.limit(limit);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn count_by_author(&self, author_id: &str) -> foodgram_shared::Result<u64> {
        let statement = sea_query::Query::select()
            .expr(Expr::col(Recipe::Id).count())
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        Ok(total as u64)
    }
}
