use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited by provider: {0}; add a token or wait for the window to reset")]
    RateLimited(String),

    #[error("authentication rejected: {0}")]
    Unauthenticated(String),

    #[error("{0} timed out; retry with a smaller commit budget")]
    Timeout(String),

    // Swallowed inside ancestor expansion, never returned to the caller.
    #[error("ancestor fetch failed for {0}: {1}")]
    PartialAncestor(String, String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrellisError>;
