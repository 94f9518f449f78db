use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("summary length {len} outside {min}..={max} characters")]
    InvalidSummaryLength { len: usize, min: usize, max: usize },
}
