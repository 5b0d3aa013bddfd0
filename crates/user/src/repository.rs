use foodgram_db::table::User;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

use crate::{Profile, Role};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: sqlx::types::Text<Role>,
    pub created_at: i64,
}

impl UserRow {
    pub fn role(&self) -> Role {
        self.role.0
    }

    pub fn into_profile(self, is_subscribed: bool) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_subscribed,
        }
    }
}

pub enum FindType {
    Id(String),
    Email(String),
    Username(String),
}

const COLUMNS: [User; 8] = [
    User::Id,
    User::Email,
    User::Username,
    User::FirstName,
    User::LastName,
    User::Password,
    User::Role,
    User::CreatedAt,
];

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> foodgram_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns(COLUMNS)
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(User::Email).eq(email)),
        FindType::Username(username) => statement.and_where(Expr::col(User::Username).eq(username)),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) struct NewUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub(crate) async fn create(pool: &SqlitePool, user: NewUser) -> foodgram_shared::Result<i64> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns(COLUMNS)
        .values_panic([
            user.id.into(),
            user.email.into(),
            user.username.into(),
            user.first_name.into(),
            user.last_name.into(),
            user.password.into(),
            Role::User.to_string().into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(now)
}

pub(crate) async fn update_password(
    pool: &SqlitePool,
    id: &str,
    password: String,
) -> foodgram_shared::Result<()> {
    let statement = Query::update()
        .table(User::Table)
        .value(User::Password, password)
        .and_where(Expr::col(User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn update_role(
    pool: &SqlitePool,
    id: &str,
    role: Role,
) -> foodgram_shared::Result<()> {
    let statement = Query::update()
        .table(User::Table)
        .value(User::Role, role.as_ref())
        .and_where(Expr::col(User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn list(
    pool: &SqlitePool,
    limit: u64,
    offset: u64,
) -> foodgram_shared::Result<Vec<UserRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(User::Table)
        .order_by(User::Username, Order::Asc)
        .limit(limit)
        .offset(offset)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn count(pool: &SqlitePool) -> foodgram_shared::Result<u64> {
    let statement = Query::select()
        .expr(Expr::col(User::Id).count())
        .from(User::Table)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(total as u64)
}
