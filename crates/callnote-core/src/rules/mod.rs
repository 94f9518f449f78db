pub mod validation;

pub use validation::{validate_summary, MAX_SUMMARY_CHARS, MIN_SUMMARY_CHARS};
