//! Repository for the `generations` table.
//!
//! Status transitions go through `mark_ready`/`mark_failed` so the only
//! writers of the `status` column are the background workers (and the
//! submit path, which marks a generation failed when the queue is full).

use sqlx::SqlitePool;

use crate::models::generation::{CreateGeneration, Generation, GenerationStatus};

/// Column list for `generations` queries.
const COLUMNS: &str = "id, prompt, folder, status, error_message, created_at";

/// How many generations the home page shows.
pub const RECENT_LIMIT: i64 = 10;

/// CRUD operations for generation records.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new pending generation and return the stored row.
    pub async fn insert(
        pool: &SqlitePool,
        input: &CreateGeneration,
    ) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO generations (id, prompt, folder, status, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(&input.id)
            .bind(&input.prompt)
            .bind(&input.folder)
            .bind(GenerationStatus::Pending)
            .bind(chrono::Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Look up a generation by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generations WHERE id = ?");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The `limit` most recent generations, newest first.
    ///
    /// `rowid` breaks ties between rows inserted within the same timestamp
    /// tick, keeping the order stable under rapid submission.
    pub async fn list_recent(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generations \
             ORDER BY created_at DESC, rowid DESC \
             LIMIT ?"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark a generation ready: its image has been written to disk.
    pub async fn mark_ready(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE generations SET status = ?, error_message = NULL WHERE id = ?")
            .bind(GenerationStatus::Ready)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a generation failed with a human-readable reason.
    ///
    /// Terminal: the pending fragment stops polling once it sees this.
    pub async fn mark_failed(
        pool: &SqlitePool,
        id: &str,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE generations SET status = ?, error_message = ? WHERE id = ?")
            .bind(GenerationStatus::Failed)
            .bind(message)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
