use crate::Result;
use callnote_core::CaregiverRecord;
use serde_json::Value;
use tracing::debug;

/// Remote care-management API holding caregiver records.
///
/// A successful `update_notes` only means the remote accepted the request;
/// callers that need the content confirmed must re-read with
/// `fetch_caregiver`.
pub trait CaregiverApi {
    fn source_name(&self) -> &'static str;
    fn list_caregivers(&self) -> Result<Vec<CaregiverRecord>>;
    fn update_notes(&self, caregiver_id: &str, notes: &str) -> Result<()>;
    fn fetch_caregiver(&self, caregiver_id: &str) -> Result<CaregiverRecord>;
}

/// Decodes a caregiver listing entry by entry. Entries without a usable id
/// are skipped so one bad record cannot hide the rest.
pub fn decode_caregivers(entries: Vec<Value>) -> Vec<CaregiverRecord> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(index, error = %err, "skipping undecodable caregiver entry");
                None
            }
        })
        .collect()
}
