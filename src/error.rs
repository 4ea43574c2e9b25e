use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed form JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// A drawing call was given coordinates or sizes the canvas cannot represent.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("invalid table: {0}")]
    Table(String),
}
