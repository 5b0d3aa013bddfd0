use std::ops::Deref;

mod aggregation;
mod membership;
mod render;

pub use aggregation::{CartError, CartLine, MergedRow, merge_cart_lines};
pub use render::render_shopping_list;

/// Shopping cart operations for one user: membership plus the aggregated
/// ingredient list behind the download endpoint.
#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
