use std::ops::Deref;

mod login;
mod register;
mod set_password;
mod set_role;

pub use login::LoginInput;
pub use register::RegisterInput;
pub use set_password::SetPasswordInput;

use crate::repository::{self, FindType, UserRow};

#[derive(Clone)]
pub struct Command {
    state: foodgram_shared::State,
    pub subscription: crate::subscription::Command,
}

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self {
            subscription: crate::subscription::Command(state.clone()),
            state,
        }
    }

    pub async fn find_by_id(&self, id: impl Into<String>) -> foodgram_shared::Result<Option<UserRow>> {
        repository::find(&self.read_db, FindType::Id(id.into())).await
    }

    pub async fn find_by_email(
        &self,
        email: impl Into<String>,
    ) -> foodgram_shared::Result<Option<UserRow>> {
        repository::find(&self.read_db, FindType::Email(email.into())).await
    }

    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> foodgram_shared::Result<(u64, Vec<UserRow>)> {
        let total = repository::count(&self.read_db).await?;
        let rows = repository::list(&self.read_db, limit, offset).await?;

        Ok((total, rows))
    }
}
