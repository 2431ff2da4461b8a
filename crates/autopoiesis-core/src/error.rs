//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Coordinates outside `[0, size)` on either axis.
    #[error("Invalid position ({x}, {y}) for grid of size {size}")]
    InvalidPosition { x: i32, y: i32, size: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A step produced a grid that breaks a world invariant. The step is
    /// discarded and the world keeps its previous state.
    #[error("Engine internal error: {0}")]
    EngineInternal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
