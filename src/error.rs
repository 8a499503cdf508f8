use thiserror;

/// The Result type for minimax48.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error")]
    StdIOError(#[from] std::io::Error),

    #[error("log error")]
    LogError(#[from] log::SetLoggerError),

    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(usize),
}
