use foodgram_db::table::{RecipeTag, Tag};
use regex::Regex;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::sync::LazyLock;
use ulid::Ulid;
use validator::Validate;

static RE_HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static RE_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TagRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(regex(path = *RE_HEX_COLOR, message = "Color must be a hex value like #49B64E"))]
    pub color: String,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *RE_SLUG, message = "Only letters, digits, hyphens and underscores are allowed")
    )]
    pub slug: String,
}

const COLUMNS: [Tag; 4] = [Tag::Id, Tag::Name, Tag::Color, Tag::Slug];

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Command {
    pub async fn list(&self) -> foodgram_shared::Result<Vec<TagRow>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Tag::Table)
            .order_by(Tag::Name, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: impl Into<String>) -> foodgram_shared::Result<Option<TagRow>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Tag::Table)
            .and_where(Expr::col(Tag::Id).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, input: TagInput) -> foodgram_shared::Result<TagRow> {
        input.validate()?;

        self.ensure_free(&input, None).await?;

        let id = Ulid::new().to_string();
        let (sql, values) = Query::insert()
            .into_table(Tag::Table)
            .columns(COLUMNS)
            .values_panic([
                id.to_owned().into(),
                input.name.to_owned().into(),
                input.color.to_owned().into(),
                input.slug.to_owned().into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        tracing::info!("created tag {}", id);

        Ok(TagRow {
            id,
            name: input.name,
            color: input.color,
            slug: input.slug,
        })
    }

    pub async fn update(
        &self,
        id: impl Into<String>,
        input: TagInput,
    ) -> foodgram_shared::Result<TagRow> {
        input.validate()?;

        let id = id.into();
        if self.find(id.as_str()).await?.is_none() {
            foodgram_shared::not_found!("Tag not found");
        }

        self.ensure_free(&input, Some(id.as_str())).await?;

        let (sql, values) = Query::update()
            .table(Tag::Table)
            .value(Tag::Name, input.name.to_owned())
            .value(Tag::Color, input.color.to_owned())
            .value(Tag::Slug, input.slug.to_owned())
            .and_where(Expr::col(Tag::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        tracing::info!("updated tag {}", id);

        Ok(TagRow {
            id,
            name: input.name,
            color: input.color,
            slug: input.slug,
        })
    }

    pub async fn delete(&self, id: impl Into<String>) -> foodgram_shared::Result<()> {
        let id = id.into();
        if self.find(id.as_str()).await?.is_none() {
            foodgram_shared::not_found!("Tag not found");
        }

        let mut tx = self.0.write_db.begin().await?;

        let (sql, values) = Query::delete()
            .from_table(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::TagId).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(Tag::Table)
            .and_where(Expr::col(Tag::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!("deleted tag {}", id);

        Ok(())
    }

    async fn ensure_free(
        &self,
        input: &TagInput,
        exclude: Option<&str>,
    ) -> foodgram_shared::Result<()> {
        if self.taken(Tag::Name, &input.name, exclude).await? {
            foodgram_shared::conflict!("A tag with this name already exists");
        }

        if self.taken(Tag::Color, &input.color, exclude).await? {
            foodgram_shared::conflict!("A tag with this color already exists");
        }

        if self.taken(Tag::Slug, &input.slug, exclude).await? {
            foodgram_shared::conflict!("A tag with this slug already exists");
        }

        Ok(())
    }

    async fn taken(
        &self,
        column: Tag,
        value: &str,
        exclude: Option<&str>,
    ) -> foodgram_shared::Result<bool> {
        let mut statement = Query::select()
            .column(Tag::Id)
            .from(Tag::Table)
            .and_where(Expr::col(column).eq(value))
            .limit(1)
            .to_owned();

        if let Some(id) = exclude {
            statement.and_where(Expr::col(Tag::Id).ne(id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row.is_some())
    }
}
