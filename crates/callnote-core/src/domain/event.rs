use serde::{Deserialize, Serialize};

/// Call summary as delivered by the telephony provider's webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummaryEvent {
    #[serde(rename = "callId")]
    pub call_id: String,
    pub summary: String,
    pub from_number: String,
    pub to_number: String,
    pub timestamp: String,
}

impl CallSummaryEvent {
    pub fn summary_len(&self) -> usize {
        self.summary.chars().count()
    }
}
