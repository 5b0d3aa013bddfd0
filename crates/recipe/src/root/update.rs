use validator::Validate;

use super::RecipeInput;
use crate::repository::{self, RecipeRow};

impl super::Command {
    /// Replaces the recipe wholesale. Tag and ingredient links are dropped
    /// and rewritten from the input.
    pub async fn update(
        &self,
        id: impl Into<String>,
        actor_id: &str,
        admin: bool,
        input: RecipeInput,
    ) -> foodgram_shared::Result<RecipeRow> {
        let id = id.into();
        let Some(current) = repository::find(&self.read_db, id.as_str()).await? else {
            foodgram_shared::not_found!("Recipe not found");
        };

        if current.author_id != actor_id && !admin {
            return Err(foodgram_shared::Error::Forbidden);
        }

        input.validate()?;
        self.check_relations(&input).await?;

        let recipe = RecipeRow {
            id: id.to_owned(),
            author_id: current.author_id,
            name: input.name,
            image: input.image,
            text: input.text,
            cooking_time: input.cooking_time,
            created_at: current.created_at,
        };
        let amounts = input
            .ingredients
            .iter()
            .map(|item| (item.id.to_owned(), item.amount))
            .collect::<Vec<_>>();

        let mut tx = self.write_db.begin().await?;
        repository::update(&mut tx, &recipe).await?;
        repository::delete_tags(&mut tx, &recipe.id).await?;
        repository::insert_tags(&mut tx, &recipe.id, &input.tags).await?;
        repository::delete_ingredients(&mut tx, &recipe.id).await?;
        repository::insert_ingredients(&mut tx, &recipe.id, &amounts).await?;
        tx.commit().await?;

        tracing::info!("updated recipe {}", recipe.id);

        Ok(recipe)
    }
}
