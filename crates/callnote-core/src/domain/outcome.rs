use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidSummary,
    CaregiverNotFound,
    UpdateFailed,
    VerificationFailed,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidSummary => "invalid_summary",
            FailureKind::CaregiverNotFound => "caregiver_not_found",
            FailureKind::UpdateFailed => "update_failed",
            FailureKind::VerificationFailed => "verification_failed",
        }
    }

    /// Message returned to the webhook caller.
    pub fn default_detail(&self) -> &'static str {
        match self {
            FailureKind::InvalidSummary => "Call summary must be between 10 and 500 characters.",
            FailureKind::CaregiverNotFound => "Caregiver not found",
            FailureKind::UpdateFailed => "Failed to update caregiver profile",
            FailureKind::VerificationFailed => "Sanity check failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one event through the pipeline. There is no partial
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Success,
    Failure { kind: FailureKind, detail: String },
}

impl ProcessOutcome {
    pub fn failure(kind: FailureKind) -> Self {
        ProcessOutcome::Failure {
            kind,
            detail: kind.default_detail().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ProcessOutcome::Success => None,
            ProcessOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
