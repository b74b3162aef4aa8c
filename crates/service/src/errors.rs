use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", entity, key))
    }

    /// Client-side failures (bad input) as opposed to storage failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}
