use crate::caregivers::CaregiverApi;
use crate::SyncError;
use callnote_core::{
    compose_notes, normalize_phone, validate_summary, CallSummaryEvent, CanonicalPhone,
    FailureKind, PhoneMatch, ProcessOutcome,
};
use callnote_store::FailureLog;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
enum VerifyError {
    #[error("unable to retrieve caregiver profile: {0}")]
    Fetch(#[source] SyncError),
    #[error("summary text not found in notes")]
    SummaryMissing,
    #[error("expected phone {expected}, got {actual}")]
    PhoneMismatch { expected: String, actual: String },
}

/// Runs one call summary through validate, match, update and verify.
///
/// Each step only runs when the previous one passed, and the first failing
/// step decides the outcome. Validation and match failures are also written
/// to the failure log.
pub struct CallSummaryProcessor<'a, A: CaregiverApi + ?Sized> {
    api: &'a A,
    log: &'a FailureLog,
    phone_match: PhoneMatch,
}

impl<'a, A: CaregiverApi + ?Sized> CallSummaryProcessor<'a, A> {
    pub fn new(api: &'a A, log: &'a FailureLog) -> Self {
        Self {
            api,
            log,
            phone_match: PhoneMatch::default(),
        }
    }

    pub fn with_phone_match(mut self, phone_match: PhoneMatch) -> Self {
        self.phone_match = phone_match;
        self
    }

    pub fn process(&self, event: &CallSummaryEvent) -> ProcessOutcome {
        self.process_at(event, Utc::now())
    }

    /// Same as [`process`](Self::process) with an explicit clock for log entries.
    pub fn process_at(&self, event: &CallSummaryEvent, now: DateTime<Utc>) -> ProcessOutcome {
        let call_id = event.call_id.as_str();
        info!(call_id, source = self.api.source_name(), "processing call summary");

        if let Err(err) = validate_summary(&event.summary) {
            warn!(call_id, error = %err, "call summary rejected");
            if let Err(err) = self.log.record_validation_failure(now, event) {
                error!(
                    call_id,
                    error = %err,
                    path = %self.log.path().display(),
                    "failed to write failure log"
                );
            }
            return ProcessOutcome::failure(FailureKind::InvalidSummary);
        }

        let phone = normalize_phone(&event.from_number);
        debug!(call_id, raw = %event.from_number, formatted = %phone, "normalized sender phone");

        let Some(caregiver_id) = self.match_caregiver(call_id, &phone) else {
            if let Err(err) = self.log.record_phone_not_found(now, call_id, &phone) {
                error!(
                    call_id,
                    error = %err,
                    path = %self.log.path().display(),
                    "failed to write failure log"
                );
            }
            return ProcessOutcome::failure(FailureKind::CaregiverNotFound);
        };

        let notes = compose_notes(&event.summary);
        if let Err(err) = self.api.update_notes(&caregiver_id, &notes) {
            warn!(call_id, caregiver_id = %caregiver_id, error = %err, "caregiver update failed");
            return ProcessOutcome::failure(FailureKind::UpdateFailed);
        }

        if let Err(err) = self.verify(&caregiver_id, &event.summary, &phone) {
            warn!(call_id, caregiver_id = %caregiver_id, error = %err, "sanity check failed");
            return ProcessOutcome::failure(FailureKind::VerificationFailed);
        }

        info!(call_id, caregiver_id = %caregiver_id, "call summary stored");
        ProcessOutcome::Success
    }

    /// First caregiver, in remote order, whose phone matches. An unreachable
    /// remote counts as no match.
    fn match_caregiver(&self, call_id: &str, phone: &CanonicalPhone) -> Option<String> {
        let caregivers = match self.api.list_caregivers() {
            Ok(caregivers) => caregivers,
            Err(err) => {
                warn!(call_id, error = %err, "failed to fetch caregivers");
                return None;
            }
        };

        let found = caregivers.into_iter().find(|caregiver| {
            caregiver
                .phone
                .as_deref()
                .is_some_and(|remote| self.phone_match.matches(phone, remote))
        });
        match found {
            Some(caregiver) => Some(caregiver.id),
            None => {
                warn!(call_id, phone = %phone, "no caregiver matches phone");
                None
            }
        }
    }

    fn verify(
        &self,
        caregiver_id: &str,
        summary: &str,
        phone: &CanonicalPhone,
    ) -> Result<(), VerifyError> {
        let record = self
            .api
            .fetch_caregiver(caregiver_id)
            .map_err(VerifyError::Fetch)?;
        debug!(
            caregiver_id,
            expected_phone = %phone,
            actual_phone = record.phone_or_empty(),
            "verifying caregiver record"
        );

        if !record.notes.contains(summary) {
            return Err(VerifyError::SummaryMissing);
        }
        if !self.phone_match.matches(phone, record.phone_or_empty()) {
            return Err(VerifyError::PhoneMismatch {
                expected: phone.to_string(),
                actual: record.phone_or_empty().to_string(),
            });
        }
        Ok(())
    }
}
