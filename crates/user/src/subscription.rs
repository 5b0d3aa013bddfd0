use std::collections::HashSet;

use foodgram_db::table::{Subscription, User};
use sea_query::{Expr, ExprTrait, JoinType, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;
use ulid::Ulid;

use crate::repository::{self, FindType, UserRow};

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Command {
    pub async fn subscribe(
        &self,
        user_id: &str,
        author_id: &str,
    ) -> foodgram_shared::Result<UserRow> {
        if user_id == author_id {
            foodgram_shared::conflict!("Cannot subscribe to yourself");
        }

        let Some(author) =
            repository::find(&self.0.read_db, FindType::Id(author_id.to_owned())).await?
        else {
            foodgram_shared::not_found!("User not found");
        };

        if self.is_subscribed(user_id, author_id).await? {
            foodgram_shared::conflict!("Already subscribed");
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(Subscription::Table)
            .columns([
                Subscription::Id,
                Subscription::UserId,
                Subscription::AuthorId,
                Subscription::CreatedAt,
            ])
            .values_panic([
                Ulid::new().to_string().into(),
                user_id.into(),
                author_id.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0.write_db).await?;

        Ok(author)
    }

    pub async fn unsubscribe(&self, user_id: &str, author_id: &str) -> foodgram_shared::Result<()> {
        if repository::find(&self.0.read_db, FindType::Id(author_id.to_owned()))
            .await?
            .is_none()
        {
            foodgram_shared::not_found!("User not found");
        }

        let statement = Query::delete()
            .from_table(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0.write_db).await?;

        if result.rows_affected() == 0 {
            foodgram_shared::conflict!("Not subscribed to this user");
        }

        Ok(())
    }

    pub async fn is_subscribed(
        &self,
        user_id: &str,
        author_id: &str,
    ) -> foodgram_shared::Result<bool> {
        let statement = Query::select()
            .column(Subscription::Id)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row.is_some())
    }

    /// Author ids from `author_ids` that `user_id` is subscribed to. Used to
    /// mark `is_subscribed` over a page of profiles in one query.
    pub async fn subscribed_ids(
        &self,
        user_id: &str,
        author_ids: Vec<String>,
    ) -> foodgram_shared::Result<HashSet<String>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let statement = Query::select()
            .column(Subscription::AuthorId)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).is_in(author_ids))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Authors the user is subscribed to, most recent subscription first.
    pub async fn authors(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> foodgram_shared::Result<(u64, Vec<UserRow>)> {
        let statement = Query::select()
            .columns([
                (User::Table, User::Id),
                (User::Table, User::Email),
                (User::Table, User::Username),
                (User::Table, User::FirstName),
                (User::Table, User::LastName),
                (User::Table, User::Password),
                (User::Table, User::Role),
                (User::Table, User::CreatedAt),
            ])
            .from(Subscription::Table)
            .join(
                JoinType::InnerJoin,
                User::Table,
                Expr::col((Subscription::Table, Subscription::AuthorId))
                    .equals((User::Table, User::Id)),
            )
            .and_where(Expr::col((Subscription::Table, Subscription::UserId)).eq(user_id))
            .order_by((Subscription::Table, Subscription::CreatedAt), Order::Desc)
            .order_by((Subscription::Table, Subscription::Id), Order::Desc)
            .limit(limit)
            .offset(offset)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, UserRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        let statement = Query::select()
            .expr(Expr::col(Subscription::Id).count())
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.0.read_db)
            .await?;

        Ok((total as u64, rows))
    }
}
