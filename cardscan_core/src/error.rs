use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("invalid image format: {0}")]
    InvalidImage(String),

    #[error("no image provided")]
    NoImage,

    #[error("no data received from OCR service")]
    EmptyResponse,

    #[error("a name is required before saving")]
    MissingName,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
