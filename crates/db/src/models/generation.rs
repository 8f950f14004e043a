//! Row model and DTOs for the `generations` table.

use chrono::{DateTime, Utc};
use magicgen_core::generation::GenId;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a generation.
///
/// Stored as lowercase text in the `status` column. `Pending` rows are the
/// only ones the browser keeps polling; `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Ready,
    Failed,
}

impl GenerationStatus {
    /// Whether this status ends the generation lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationStatus::Ready | GenerationStatus::Failed)
    }
}

/// One generation record: a submitted prompt and its eventual image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Generation {
    /// UUID v4, assigned at submission time.
    pub id: GenId,
    /// The user's prompt, stored verbatim.
    pub prompt: String,
    /// Output folder; the image lands at `<folder>/<id>.png`.
    pub folder: String,
    pub status: GenerationStatus,
    /// Failure detail, set only when `status` is `Failed`.
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a new generation.
#[derive(Debug, Clone)]
pub struct CreateGeneration {
    pub id: GenId,
    pub prompt: String,
    pub folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_terminal() {
        assert!(!GenerationStatus::Pending.is_terminal());
    }

    #[test]
    fn ready_and_failed_are_terminal() {
        assert!(GenerationStatus::Ready.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }
}
