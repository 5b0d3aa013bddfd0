use foodgram_db::table::{Favorite, Recipe, RecipeTag, ShoppingCart, Tag};
use sea_query::{Expr, ExprTrait, JoinType, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::repository::{COLUMNS, RecipeRow};

#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub author: Option<String>,
    /// Tag slugs. A recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub favorited_by: Option<String>,
    pub in_cart_of: Option<String>,
}

impl super::Query {
    /// Newest first, then id as a tie-break so pages stay stable.
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        limit: u64,
        offset: u64,
    ) -> foodgram_shared::Result<(u64, Vec<RecipeRow>)> {
        let mut statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(Recipe::Table)
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .limit(limit)
            .offset(offset)
            .to_owned();

        apply_filter(&mut statement, filter);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut statement = sea_query::Query::select()
            .expr(Expr::col(Recipe::Id).count())
            .from(Recipe::Table)
            .to_owned();

        apply_filter(&mut statement, filter);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        Ok((total as u64, rows))
    }
}

fn apply_filter(statement: &mut SelectStatement, filter: &RecipeFilter) {
    if let Some(author) = &filter.author {
        statement.and_where(Expr::col(Recipe::AuthorId).eq(author));
    }

    if !filter.tags.is_empty() {
        statement.and_where(
            Expr::col(Recipe::Id).in_subquery(
                sea_query::Query::select()
                    .column(RecipeTag::RecipeId)
                    .from(RecipeTag::Table)
                    .join(
                        JoinType::InnerJoin,
                        Tag::Table,
                        Expr::col((RecipeTag::Table, RecipeTag::TagId))
                            .equals((Tag::Table, Tag::Id)),
                    )
                    .and_where(Expr::col((Tag::Table, Tag::Slug)).is_in(filter.tags.clone()))
                    .to_owned(),
            ),
        );
    }

    if let Some(user_id) = &filter.favorited_by {
        statement.and_where(
            Expr::col(Recipe::Id).in_subquery(
                sea_query::Query::select()
                    .column(Favorite::RecipeId)
                    .from(Favorite::Table)
                    .and_where(Expr::col(Favorite::UserId).eq(user_id))
                    .to_owned(),
            ),
        );
    }

    if let Some(user_id) = &filter.in_cart_of {
        statement.and_where(
            Expr::col(Recipe::Id).in_subquery(
                sea_query::Query::select()
                    .column(ShoppingCart::RecipeId)
                    .from(ShoppingCart::Table)
                    .and_where(Expr::col(ShoppingCart::UserId).eq(user_id))
                    .to_owned(),
            ),
        );
    }
}
