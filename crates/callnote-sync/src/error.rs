use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{operation} returned status {status}")]
    Status { operation: &'static str, status: u16 },
    #[error("caregiver not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "axiscare-http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "axiscare-http")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
