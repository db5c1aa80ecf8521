use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced at the boundaries of the core. Nothing inside a
/// simulation step produces one of these; blocked moves, failed spawn
/// searches and truncated DNA tails are ordinary results.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed dna string: {0}")]
    Dna(String),
}
