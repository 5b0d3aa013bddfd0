use serde::Deserialize;
use sqlx::types::Text;
use ulid::Ulid;
use validator::Validate;

use crate::repository::{self, FindType, NewUser, UserRow};
use crate::{Role, password};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<UserRow> {
        input.validate()?;

        if repository::find(&self.read_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::conflict!("A user with this email already exists");
        }

        if repository::find(&self.read_db, FindType::Username(input.username.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::conflict!("A user with this username already exists");
        }

        let password_hash = password::hash_password(&input.password)?;
        let id = Ulid::new().to_string();

        let created_at = repository::create(
            &self.write_db,
            NewUser {
                id: id.to_owned(),
                email: input.email.to_owned(),
                username: input.username.to_owned(),
                first_name: input.first_name.to_owned(),
                last_name: input.last_name.to_owned(),
                password: password_hash.to_owned(),
            },
        )
        .await?;

        tracing::info!("registered new user {}", id);

        Ok(UserRow {
            id,
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password: password_hash,
            role: Text(Role::User),
            created_at,
        })
    }
}
