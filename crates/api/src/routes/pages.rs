//! Page and fragment handlers.
//!
//! Routes:
//! - `GET  /`          — home page: prompt form + 10 most recent generations
//! - `POST /`          — submit a prompt, respond with the pending fragment
//! - `GET  /gens/{id}` — current fragment for one generation (polled by the
//!   browser every 2 seconds until it turns terminal)

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use magicgen_core::error::CoreError;
use magicgen_core::generation;
use magicgen_db::models::generation::{CreateGeneration, GenerationStatus};
use magicgen_db::repositories::generation_repo::{GenerationRepo, RECENT_LIMIT};

use crate::engine::GenerationJob;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// Form body for `POST /`.
#[derive(Debug, Deserialize)]
pub struct PromptForm {
    pub prompt: String,
}

/// GET / -- the home page.
async fn home(State(state): State<AppState>) -> AppResult<Html<String>> {
    let recent = GenerationRepo::list_recent(&state.pool, RECENT_LIMIT).await?;
    Ok(Html(views::render_home(&recent)?))
}

/// POST / -- submit a prompt.
///
/// Persists the record first, then enqueues the background job, so the
/// poll endpoint can never miss the record. Returns the rendered fragment
/// immediately; the browser polls `/gens/{id}` from there.
async fn submit(
    State(state): State<AppState>,
    Form(form): Form<PromptForm>,
) -> AppResult<Html<String>> {
    generation::validate_prompt(&form.prompt)?;

    let folder = state.config.gens_folder();
    tokio::fs::create_dir_all(&folder).await?;

    let input = CreateGeneration {
        id: generation::new_gen_id(),
        prompt: form.prompt,
        folder,
    };
    let mut gen = GenerationRepo::insert(&state.pool, &input).await?;
    tracing::info!(gen_id = %gen.id, "Generation submitted");

    let job = GenerationJob {
        id: gen.id.clone(),
        prompt: gen.prompt.clone(),
        folder: gen.folder.clone(),
    };
    if let Err(e) = state.engine.submit(job) {
        // Bounded queue: a generation that cannot be dispatched becomes
        // terminal right away instead of pending forever.
        tracing::warn!(gen_id = %gen.id, error = %e, "Generation rejected by engine");
        GenerationRepo::mark_failed(&state.pool, &gen.id, &e.to_string()).await?;
        gen.status = GenerationStatus::Failed;
        gen.error_message = Some(e.to_string());
    }

    Ok(Html(views::render_submission(&gen)?))
}

/// GET /gens/{id} -- the current fragment for one generation.
async fn generation_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let gen = GenerationRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Generation",
            id,
        }))?;

    Ok(Html(views::render_preview(&gen)?))
}

/// Mount the page routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home).post(submit))
        .route("/gens/{id}", get(generation_fragment))
}
