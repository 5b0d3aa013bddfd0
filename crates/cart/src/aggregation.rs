use std::collections::HashMap;

use foodgram_db::table::{Ingredient, RecipeIngredient, ShoppingCart};
use sea_query::{Expr, ExprTrait, JoinType, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

/// One ingredient requirement pulled from a cart recipe. Derived on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub ingredient_name: String,
    pub unit: String,
    pub amount: i64,
}

/// One line of the final shopping list: the summed amount of everything in
/// the cart sharing an (ingredient_name, unit) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub ingredient_name: String,
    pub unit: String,
    pub total_amount: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Shopping cart is empty")]
    Empty,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl crate::Command {
    /// Shopping list for everything currently in the user's cart.
    ///
    /// Expands each cart recipe into its ingredient lines, merges lines
    /// sharing an (ingredient_name, unit) pair by summing their amounts and
    /// orders the result by name, then unit. An empty cart is reported as
    /// [`CartError::Empty`] so the HTTP layer can answer with a client error
    /// instead of an empty file. Nothing is cached; every call reflects the
    /// cart as committed at fetch time.
    pub async fn aggregate(&self, user_id: &str) -> Result<Vec<MergedRow>, CartError> {
        if self.cart_size(user_id).await? == 0 {
            return Err(CartError::Empty);
        }

        let lines = self.cart_lines(user_id).await?;

        Ok(merge_cart_lines(lines))
    }

    async fn cart_size(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        let statement = sea_query::Query::select()
            .expr(Expr::col(ShoppingCart::Id).count())
            .from(ShoppingCart::Table)
            .and_where(Expr::col(ShoppingCart::UserId).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        Ok(count)
    }

    async fn cart_lines(&self, user_id: &str) -> Result<Vec<CartLine>, sqlx::Error> {
        let statement = sea_query::Query::select()
            .columns([
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(ShoppingCart::Table)
            .join(
                JoinType::InnerJoin,
                RecipeIngredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .equals((ShoppingCart::Table, ShoppingCart::RecipeId)),
            )
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(Expr::col((ShoppingCart::Table, ShoppingCart::UserId)).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String, String, i64), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(ingredient_name, unit, amount)| CartLine {
                ingredient_name,
                unit,
                amount,
            })
            .collect())
    }
}

/// Merges cart lines by (ingredient_name, unit) with plain integer sums.
/// Lines sharing a name but not a unit stay separate rows. A non-positive
/// amount contributes zero instead of aborting the merge; its group still
/// shows up in the output.
pub fn merge_cart_lines(lines: Vec<CartLine>) -> Vec<MergedRow> {
    let mut groups: HashMap<(String, String), i64> = HashMap::new();

    for line in lines {
        if line.amount <= 0 {
            tracing::warn!(
                "ignoring non-positive amount {} of {} ({})",
                line.amount,
                line.ingredient_name,
                line.unit
            );
        }

        let contribution = Ord::max(line.amount, 0);
        *groups
            .entry((line.ingredient_name, line.unit))
            .or_insert(0) += contribution;
    }

    let mut rows = groups
        .into_iter()
        .map(|((ingredient_name, unit), total_amount)| MergedRow {
            ingredient_name,
            unit,
            total_amount,
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| {
        a.ingredient_name
            .cmp(&b.ingredient_name)
            .then_with(|| a.unit.cmp(&b.unit))
    });

    rows
}
