use crate::model::EntryId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaryError {
    /// The storage layer cannot be reached (closed, or no location could be resolved).
    #[error("Storage context is not available")]
    InvalidContext,

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// A query or commit failed inside the embedded database.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, DiaryError>;
