use crate::generation::GenId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: GenId },

    #[error("Validation failed: {0}")]
    Validation(String),
}
