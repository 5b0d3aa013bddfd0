mod favorite;
mod ingredient;
mod query;
mod repository;
mod root;
mod tag;

pub use favorite::Command as FavoriteCommand;
pub use ingredient::{Command as IngredientCommand, IngredientInput, IngredientRow};
pub use query::{IngredientAmountRow, Query, RecipeFilter, RecipeTagRow, ShortRecipe};
pub use repository::RecipeRow;
pub use root::{Command, RecipeIngredientInput, RecipeInput};
pub use tag::{Command as TagCommand, TagInput, TagRow};
