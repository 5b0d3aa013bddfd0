use foodgram_db::table::{Ingredient, RecipeIngredient};
use sea_query::{Expr, ExprTrait, LikeExpr, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientRow {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

const COLUMNS: [Ingredient; 3] = [Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit];

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Command {
    /// Lists ingredients ordered by name, optionally narrowed to those
    /// whose name starts with `prefix`. Matching is case-insensitive for
    /// ASCII, which is what SQLite LIKE gives us.
    pub async fn search(&self, prefix: Option<&str>) -> foodgram_shared::Result<Vec<IngredientRow>> {
        let mut statement = Query::select()
            .columns(COLUMNS)
            .from(Ingredient::Table)
            .order_by(Ingredient::Name, Order::Asc)
            .to_owned();

        if let Some(prefix) = prefix {
            let escaped = prefix
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");

            statement.and_where(
                Expr::col(Ingredient::Name).like(LikeExpr::new(format!("{escaped}%")).escape('\\')),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        Ok(rows)
    }

    pub async fn find(
        &self,
        id: impl Into<String>,
    ) -> foodgram_shared::Result<Option<IngredientRow>> {
        let (sql, values) = Query::select()
            .columns(COLUMNS)
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, input: IngredientInput) -> foodgram_shared::Result<IngredientRow> {
        input.validate()?;

        if self.taken(&input.name, None).await? {
            foodgram_shared::conflict!("An ingredient with this name already exists");
        }

        let id = Ulid::new().to_string();
        let (sql, values) = Query::insert()
            .into_table(Ingredient::Table)
            .columns(COLUMNS)
            .values_panic([
                id.to_owned().into(),
                input.name.to_owned().into(),
                input.measurement_unit.to_owned().into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        tracing::info!("created ingredient {}", id);

        Ok(IngredientRow {
            id,
            name: input.name,
            measurement_unit: input.measurement_unit,
        })
    }

    pub async fn update(
        &self,
        id: impl Into<String>,
        input: IngredientInput,
    ) -> foodgram_shared::Result<IngredientRow> {
        input.validate()?;

        let id = id.into();
        if self.find(id.as_str()).await?.is_none() {
            foodgram_shared::not_found!("Ingredient not found");
        }

        if self.taken(&input.name, Some(id.as_str())).await? {
            foodgram_shared::conflict!("An ingredient with this name already exists");
        }

        let (sql, values) = Query::update()
            .table(Ingredient::Table)
            .value(Ingredient::Name, input.name.to_owned())
            .value(Ingredient::MeasurementUnit, input.measurement_unit.to_owned())
            .and_where(Expr::col(Ingredient::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        tracing::info!("updated ingredient {}", id);

        Ok(IngredientRow {
            id,
            name: input.name,
            measurement_unit: input.measurement_unit,
        })
    }

    /// Deleting an ingredient also drops it from every recipe that uses it.
    pub async fn delete(&self, id: impl Into<String>) -> foodgram_shared::Result<()> {
        let id = id.into();
        if self.find(id.as_str()).await?.is_none() {
            foodgram_shared::not_found!("Ingredient not found");
        }

        let mut tx = self.0.write_db.begin().await?;

        let (sql, values) = Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::IngredientId).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!("deleted ingredient {}", id);

        Ok(())
    }

    async fn taken(&self, name: &str, exclude: Option<&str>) -> foodgram_shared::Result<bool> {
        let mut statement = Query::select()
            .column(Ingredient::Id)
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Name).eq(name))
            .limit(1)
            .to_owned();

        if let Some(id) = exclude {
            statement.and_where(Expr::col(Ingredient::Id).ne(id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?;

        Ok(row.is_some())
    }
}
