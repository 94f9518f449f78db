pub mod caregiver;
pub mod event;
pub mod outcome;
pub mod phone;

pub use caregiver::{compose_notes, CaregiverRecord, NOTES_PREFIX};
pub use event::CallSummaryEvent;
pub use outcome::{FailureKind, ProcessOutcome};
pub use phone::{normalize_phone, CanonicalPhone, PhoneMatch};
