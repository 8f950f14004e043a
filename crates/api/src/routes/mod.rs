pub mod health;
pub mod pages;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;
use magicgen_core::generation::DATA_URL_PREFIX;

/// Build the application route tree.
///
/// ```text
/// GET  /            home page (form + 10 most recent generations)
/// POST /            submit a prompt, returns the new pending fragment
/// GET  /gens/{id}   fragment for one generation (polled every 2s)
/// GET  /data/*      generated images (static files)
/// GET  /health      service + database health (JSON)
/// ```
///
/// `data_dir` is the on-disk directory served under [`DATA_URL_PREFIX`].
pub fn app_routes(data_dir: &str) -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(health::router())
        .nest_service(DATA_URL_PREFIX, ServeDir::new(data_dir))
}
