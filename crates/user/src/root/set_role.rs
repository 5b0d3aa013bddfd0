use crate::Role;
use crate::repository::{self, FindType, UserRow};

impl super::Command {
    pub async fn set_role(
        &self,
        email: &str,
        role: Role,
    ) -> foodgram_shared::Result<Option<UserRow>> {
        let Some(user) = repository::find(&self.read_db, FindType::Email(email.to_owned())).await?
        else {
            return Ok(None);
        };

        repository::update_role(&self.write_db, &user.id, role).await?;

        tracing::info!("updated role of {} to {}", user.id, role);

        Ok(Some(user))
    }
}
