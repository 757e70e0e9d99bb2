use thiserror::Error;

/// Result type alias for chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    /// A chunking option was outside its accepted range
    #[error("'{name}' argument must be {constraint}, got {value}")]
    InvalidArgument {
        name: &'static str,
        constraint: &'static str,
        value: i64,
    },
}

impl ChunkingError {
    pub(crate) fn invalid_argument(name: &'static str, constraint: &'static str, value: i64) -> Self {
        Self::InvalidArgument {
            name,
            constraint,
            value,
        }
    }
}
