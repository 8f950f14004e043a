use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::GenerationEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: magicgen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Background generation engine (bounded queue + worker tasks).
    pub engine: Arc<GenerationEngine>,
}
