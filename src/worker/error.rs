use thiserror::Error;

/// Failure of a network fetch performed by the worker.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network unreachable")]
    Offline,

    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            NetworkError::Offline
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}

/// Failure of the cache storage layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache storage failure: {0}")]
    Storage(String),
}
