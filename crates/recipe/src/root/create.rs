use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use crate::repository::{self, RecipeRow};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeIngredientInput {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    pub image: Option<String>,
    #[validate(range(min = 1, message = "Cooking time must be at least one minute"))]
    pub cooking_time: i64,
    #[validate(length(min = 1, message = "Pick at least one tag"))]
    pub tags: Vec<String>,
    #[validate(length(min = 1, message = "Pick at least one ingredient"), nested)]
    pub ingredients: Vec<RecipeIngredientInput>,
}

impl super::Command {
    pub async fn create(
        &self,
        author_id: impl Into<String>,
        input: RecipeInput,
    ) -> foodgram_shared::Result<RecipeRow> {
        input.validate()?;
        self.check_relations(&input).await?;

        let recipe = RecipeRow {
            id: Ulid::new().to_string(),
            author_id: author_id.into(),
            name: input.name,
            image: input.image,
            text: input.text,
            cooking_time: input.cooking_time,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let amounts = input
            .ingredients
            .iter()
            .map(|item| (item.id.to_owned(), item.amount))
            .collect::<Vec<_>>();

        let mut tx = self.write_db.begin().await?;
        repository::insert(&mut tx, &recipe).await?;
        repository::insert_tags(&mut tx, &recipe.id, &input.tags).await?;
        repository::insert_ingredients(&mut tx, &recipe.id, &amounts).await?;
        tx.commit().await?;

        tracing::info!("created recipe {}", recipe.id);

        Ok(recipe)
    }

    /// Rejects duplicate or unknown tag and ingredient references before
    /// anything is written.
    pub(super) async fn check_relations(&self, input: &RecipeInput) -> foodgram_shared::Result<()> {
        let mut seen = HashSet::new();
        for tag_id in &input.tags {
            if !seen.insert(tag_id.as_str()) {
                foodgram_shared::conflict!("Tags must be unique");
            }
        }

        let mut seen = HashSet::new();
        for item in &input.ingredients {
            if !seen.insert(item.id.as_str()) {
                foodgram_shared::conflict!("Ingredients must be unique");
            }
        }

        for tag_id in &input.tags {
            if self.tag.find(tag_id.as_str()).await?.is_none() {
                foodgram_shared::conflict!("Unknown tag {}", tag_id);
            }
        }

        for item in &input.ingredients {
            if self.ingredient.find(item.id.as_str()).await?.is_none() {
                foodgram_shared::conflict!("Unknown ingredient {}", item.id);
            }
        }

        Ok(())
    }
}
