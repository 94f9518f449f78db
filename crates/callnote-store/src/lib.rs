pub mod error;
pub mod failure_log;
pub mod paths;

pub use error::{Result, StoreError, StoreErrorKind};
pub use failure_log::{FailureLog, NO_FAILURES_MESSAGE};
