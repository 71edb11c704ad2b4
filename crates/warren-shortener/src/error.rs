use thiserror::Error;
use warren_core::StoreError;
use warren_generator::GeneratorError;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
}
