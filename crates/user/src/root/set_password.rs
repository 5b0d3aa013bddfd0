use serde::Deserialize;
use validator::Validate;

use crate::password;
use crate::repository::{self, FindType};

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordInput {
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub current_password: String,
}

impl super::Command {
    pub async fn set_password(
        &self,
        user_id: &str,
        input: SetPasswordInput,
    ) -> foodgram_shared::Result<()> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Id(user_id.to_owned())).await?
        else {
            foodgram_shared::not_found!("User not found");
        };

        if !password::verify_password(&input.current_password, &user.password)? {
            foodgram_shared::conflict!("Wrong current password");
        }

        let password_hash = password::hash_password(&input.new_password)?;
        repository::update_password(&self.write_db, &user.id, password_hash).await?;

        tracing::info!("changed password of {}", user.id);

        Ok(())
    }
}
