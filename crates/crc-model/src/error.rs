use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The export is not well-formed XML.
    #[error("xml is not well-formed at byte {position}: {message}")]
    Xml { position: u64, message: String },
    /// The export parsed but failed the structural pre-check.
    #[error("structural validation failed: {0}")]
    Structural(String),
    /// A violating-row table could not be assembled.
    #[error("failed to build table: {0}")]
    Frame(String),
    #[error("{0}")]
    Message(String),
}

impl RegistryError {
    /// True for the one error class that aborts a whole run.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
