use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Empty scene: {0}")]
    EmptyScene(String),

    #[error("glTF encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Buffer too large for glTF: {0} bytes")]
    BufferOverflow(usize),
}
