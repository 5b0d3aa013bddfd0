pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use routes::AppState;

/// Build the application router from configuration and database handles.
///
/// Integration tests call this directly instead of starting a server. The
/// serve command adds compression and tracing layers on top.
pub fn create_app(config: Config, db: foodgram_shared::State) -> axum::Router {
    let pool = db.read_db.clone();

    let state = AppState {
        user: foodgram_user::Command::new(db.clone()),
        recipe: foodgram_recipe::Command::new(db.clone()),
        recipe_query: foodgram_recipe::Query(db.clone()),
        cart: foodgram_cart::Command(db),
        pool,
        config,
    };

    routes::router(state)
}
