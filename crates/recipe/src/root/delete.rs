use crate::repository;

impl super::Command {
    pub async fn delete(
        &self,
        id: impl Into<String>,
        actor_id: &str,
        admin: bool,
    ) -> foodgram_shared::Result<()> {
        let id = id.into();
        let Some(current) = repository::find(&self.read_db, id.as_str()).await? else {
            foodgram_shared::not_found!("Recipe not found");
        };

        if current.author_id != actor_id && !admin {
            return Err(foodgram_shared::Error::Forbidden);
        }

        let mut tx = self.write_db.begin().await?;
        repository::delete(&mut tx, id.as_str()).await?;
        tx.commit().await?;

        tracing::info!("deleted recipe {}", id);

        Ok(())
    }
}
