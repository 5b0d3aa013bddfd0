use serde::Deserialize;
use validator::Validate;

use crate::password;
use crate::repository::{self, FindType, UserRow};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    /// Returns `None` for unknown email or wrong password so callers cannot
    /// tell the two apart.
    pub async fn login(&self, input: LoginInput) -> foodgram_shared::Result<Option<UserRow>> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            return Ok(None);
        };

        if !password::verify_password(&input.password, &user.password)? {
            return Ok(None);
        }

        Ok(Some(user))
    }
}
