use std::ops::Deref;

mod create;
mod delete;
mod update;

pub use create::{RecipeIngredientInput, RecipeInput};

use crate::repository::{self, RecipeRow};

#[derive(Clone)]
pub struct Command {
    state: foodgram_shared::State,
    pub tag: crate::tag::Command,
    pub ingredient: crate::ingredient::Command,
    pub favorite: crate::favorite::Command,
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
            tag: crate::tag::Command(state.clone()),
            ingredient: crate::ingredient::Command(state.clone()),
            favorite: crate::favorite::Command(state.clone()),
            state,
        }
    }

    pub async fn find(&self, id: impl Into<String>) -> foodgram_shared::Result<Option<RecipeRow>> {
        repository::find(&self.read_db, id).await
    }
}
