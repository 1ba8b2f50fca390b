//! Error types for uc-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A start marker was found with no end marker after it.
    #[error("Managed import block opened on line {line} is never closed")]
    UnterminatedBlock { line: usize },
}
