use crate::caregivers::CaregiverApi;
use crate::{Result, SyncError};
use callnote_core::CaregiverRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Misbehaviour the in-memory API can be told to exhibit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Listing fails as if the remote were unreachable.
    ListUnavailable,
    /// Patch is answered with a non-success status.
    RejectUpdate,
    /// Patch reports success but the notes are never stored.
    DiscardUpdate,
    /// Patch succeeds but the record's phone is replaced with this value.
    PhoneChangedOnUpdate(String),
    /// Re-reading a single caregiver fails.
    FetchUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesPatch {
    pub caregiver_id: String,
    pub notes: String,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<CaregiverRecord>,
    faults: Vec<Fault>,
    patches: Vec<NotesPatch>,
}

/// Caregiver API held in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryCaregivers {
    state: Mutex<State>,
}

impl InMemoryCaregivers {
    pub fn new(records: Vec<CaregiverRecord>) -> Self {
        Self {
            state: Mutex::new(State {
                records,
                ..State::default()
            }),
        }
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.lock().faults.push(fault);
        self
    }

    pub fn record(&self, caregiver_id: &str) -> Option<CaregiverRecord> {
        self.lock()
            .records
            .iter()
            .find(|record| record.id == caregiver_id)
            .cloned()
    }

    /// Patches accepted so far, in arrival order.
    pub fn patches(&self) -> Vec<NotesPatch> {
        self.lock().patches.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn has(&self, fault: &Fault) -> bool {
        self.faults.contains(fault)
    }

    fn phone_override(&self) -> Option<&str> {
        self.faults.iter().find_map(|fault| match fault {
            Fault::PhoneChangedOnUpdate(phone) => Some(phone.as_str()),
            _ => None,
        })
    }
}

impl CaregiverApi for InMemoryCaregivers {
    fn source_name(&self) -> &'static str {
        "memory"
    }

    fn list_caregivers(&self) -> Result<Vec<CaregiverRecord>> {
        let state = self.lock();
        if state.has(&Fault::ListUnavailable) {
            return Err(SyncError::Unavailable("caregiver list unavailable".to_string()));
        }
        Ok(state.records.clone())
    }

    fn update_notes(&self, caregiver_id: &str, notes: &str) -> Result<()> {
        let mut state = self.lock();
        if state.has(&Fault::RejectUpdate) {
            return Err(SyncError::Status {
                operation: "update caregiver",
                status: 500,
            });
        }
        let discard = state.has(&Fault::DiscardUpdate);
        let phone = state.phone_override().map(str::to_string);
        let record = state
            .records
            .iter_mut()
            .find(|record| record.id == caregiver_id)
            .ok_or_else(|| SyncError::NotFound(caregiver_id.to_string()))?;
        if !discard {
            record.notes = notes.to_string();
        }
        if let Some(phone) = phone {
            record.phone = Some(phone);
        }
        state.patches.push(NotesPatch {
            caregiver_id: caregiver_id.to_string(),
            notes: notes.to_string(),
        });
        Ok(())
    }

    fn fetch_caregiver(&self, caregiver_id: &str) -> Result<CaregiverRecord> {
        let state = self.lock();
        if state.has(&Fault::FetchUnavailable) {
            return Err(SyncError::Unavailable("caregiver fetch unavailable".to_string()));
        }
        state
            .records
            .iter()
            .find(|record| record.id == caregiver_id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(caregiver_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Fault, InMemoryCaregivers};
    use crate::caregivers::CaregiverApi;
    use crate::SyncError;
    use callnote_core::CaregiverRecord;

    fn api() -> InMemoryCaregivers {
        InMemoryCaregivers::new(vec![CaregiverRecord::new("cg1", "1-512-555-1234", "")])
    }

    #[test]
    fn update_replaces_notes_and_records_patch() {
        let api = api();
        api.update_notes("cg1", "hello").expect("update");
        assert_eq!(api.record("cg1").expect("record").notes, "hello");
        assert_eq!(api.patches().len(), 1);
    }

    #[test]
    fn update_unknown_caregiver_is_not_found() {
        let err = api().update_notes("nope", "hello").unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }

    #[test]
    fn discard_fault_accepts_but_keeps_old_notes() {
        let api = api().with_fault(Fault::DiscardUpdate);
        api.update_notes("cg1", "hello").expect("update");
        assert_eq!(api.fetch_caregiver("cg1").expect("fetch").notes, "");
    }

    #[test]
    fn reject_fault_reports_status() {
        let api = api().with_fault(Fault::RejectUpdate);
        let err = api.update_notes("cg1", "hello").unwrap_err();
        assert!(matches!(err, SyncError::Status { status: 500, .. }));
        assert!(api.patches().is_empty());
    }
}
