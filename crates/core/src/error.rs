use thiserror::Error;

pub type BurstResult<T> = Result<T, BurstError>;

#[derive(Error, Debug)]
pub enum BurstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for BurstError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
