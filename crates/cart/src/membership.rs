use std::collections::HashSet;

use foodgram_db::table::ShoppingCart;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;
use ulid::Ulid;

impl crate::Command {
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<()> {
        if self.contains(user_id, recipe_id).await? {
            foodgram_shared::conflict!("Already in shopping cart");
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(ShoppingCart::Table)
            .columns([
                ShoppingCart::Id,
                ShoppingCart::UserId,
                ShoppingCart::RecipeId,
                ShoppingCart::CreatedAt,
            ])
            .values_panic([
                Ulid::new().to_string().into(),
                user_id.into(),
                recipe_id.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<()> {
        let statement = Query::delete()
            .from_table(ShoppingCart::Table)
            .and_where(Expr::col(ShoppingCart::UserId).eq(user_id))
            .and_where(Expr::col(ShoppingCart::RecipeId).eq(recipe_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            foodgram_shared::conflict!("Not in shopping cart");
        }

        Ok(())
    }

    pub async fn contains(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<bool> {
        let statement = Query::select()
            .column(ShoppingCart::Id)
            .from(ShoppingCart::Table)
            .and_where(Expr::col(ShoppingCart::UserId).eq(user_id))
            .and_where(Expr::col(ShoppingCart::RecipeId).eq(recipe_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.is_some())
    }

    /// Recipe ids from `recipe_ids` present in the user's cart. Marks
    /// `is_in_shopping_cart` over a page of recipes in one query.
    pub async fn ids_for(
        &self,
        user_id: &str,
        recipe_ids: Vec<String>,
    ) -> foodgram_shared::Result<HashSet<String>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let statement = Query::select()
            .column(ShoppingCart::RecipeId)
            .from(ShoppingCart::Table)
            .and_where(Expr::col(ShoppingCart::UserId).eq(user_id))
            .and_where(Expr::col(ShoppingCart::RecipeId).is_in(recipe_ids))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
