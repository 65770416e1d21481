use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG error: {0}")]
    Png(#[from] png::DecodingError),
    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("PDF render error: {0}")]
    Render(String),
    #[error("cannot place {}: {reason}", path.display())]
    Placement { path: PathBuf, reason: String },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
