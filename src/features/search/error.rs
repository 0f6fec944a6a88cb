use thiserror::Error;

use crate::core::error::AppError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Airport '{0}' not found")]
    NotFound(String),

    #[error("Shop directory unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        SearchError::Unavailable(e.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidInput(msg) => AppError::BadRequest(msg),
            err @ SearchError::NotFound(_) => AppError::NotFound(err.to_string()),
            SearchError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}
