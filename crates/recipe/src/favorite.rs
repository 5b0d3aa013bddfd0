use std::collections::HashSet;

use foodgram_db::table::Favorite;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;
use ulid::Ulid;

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Command {
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<()> {
        if self.contains(user_id, recipe_id).await? {
            foodgram_shared::conflict!("Already in favorites");
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(Favorite::Table)
            .columns([
                Favorite::Id,
                Favorite::UserId,
                Favorite::RecipeId,
                Favorite::CreatedAt,
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
            .execute(&self.0.write_db)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<()> {
        let statement = Query::delete()
            .from_table(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(user_id))
            .and_where(Expr::col(Favorite::RecipeId).eq(recipe_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            foodgram_shared::conflict!("Not in favorites");
        }

        Ok(())
    }

    pub async fn contains(&self, user_id: &str, recipe_id: &str) -> foodgram_shared::Result<bool> {
        let statement = Query::select()
            .column(Favorite::Id)
            .from(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(user_id))
            .and_where(Expr::col(Favorite::RecipeId).eq(recipe_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row.is_some())
    }

    /// Recipe ids from `recipe_ids` the user has favorited. Marks
    /// `is_favorited` over a page of recipes in one query.
    pub async fn ids_for(
        &self,
        user_id: &str,
        recipe_ids: Vec<String>,
    ) -> foodgram_shared::Result<HashSet<String>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let statement = Query::select()
            .column(Favorite::RecipeId)
            .from(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(user_id))
            .and_where(Expr::col(Favorite::RecipeId).is_in(recipe_ids))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
