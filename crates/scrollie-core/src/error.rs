use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A scroll animation was stopped or superseded before it finished
    #[error("Scroll animation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timer error: {0}")]
    Timer(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for the rejection produced by `stop` or supersession
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
