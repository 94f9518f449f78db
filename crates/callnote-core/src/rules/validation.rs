use crate::error::CoreError;

pub const MIN_SUMMARY_CHARS: usize = 10;
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Returns the summary length in characters when it is within bounds.
pub fn validate_summary(summary: &str) -> Result<usize, CoreError> {
    let len = summary.chars().count();
    if !(MIN_SUMMARY_CHARS..=MAX_SUMMARY_CHARS).contains(&len) {
        return Err(CoreError::InvalidSummaryLength {
            len,
            min: MIN_SUMMARY_CHARS,
            max: MAX_SUMMARY_CHARS,
        });
    }
    Ok(len)
}
