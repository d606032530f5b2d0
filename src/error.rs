use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Upstream API error: {0}")]
    Upstream(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
