// Errors the engine can hand back to its callers.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    // Caller-fixable input problems. Not worth retrying.
    #[error("{0}")]
    Validation(String),

    #[error("No se ha encontrado {0}.")]
    NotFound(&'static str),

    // Storage conflicts and other transaction failures. The whole call can be retried.
    #[error("No se pudo completar la operación. Inténtalo de nuevo.")]
    Transient(#[source] sqlx::Error),

    #[error("could not apply database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    // Whether repeating the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        Self::Transient(e)
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
