use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    #[error("dimension mismatch: expected {expected} entries, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("{0} requires a hint but none was supplied")]
    MissingHint(&'static str),

    #[error("{0} used before init_step")]
    NotInitialized(&'static str),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

pub(crate) fn ensure_len(v: &[f64], expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(PortfolioError::DimensionMismatch {
            expected,
            got: v.len(),
        });
    }
    Ok(())
}
