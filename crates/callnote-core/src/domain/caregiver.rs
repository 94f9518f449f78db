use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub const NOTES_PREFIX: &str = "OpenPhone Summary";

/// Caregiver as reported by the care-management API. Fields the processor
/// does not read are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Anything other than a JSON string reads as no phone.
    #[serde(default, deserialize_with = "deserialize_phone")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: String,
}

impl CaregiverRecord {
    pub fn new(id: impl Into<String>, phone: impl Into<String>, notes: impl Into<String>) -> Self {
        Self::with_phone(id, Some(phone.into()), notes)
    }

    pub fn with_phone(
        id: impl Into<String>,
        phone: Option<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            phone,
            notes: notes.into(),
        }
    }

    pub fn phone_or_empty(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }
}

pub fn compose_notes(summary: &str) -> String {
    format!("{NOTES_PREFIX}:\n{summary}")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Signed(value) => value.to_string(),
        RawId::Unsigned(value) => value.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPhone {
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_phone<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawPhone::deserialize(deserializer)? {
        RawPhone::Text(value) => Some(value),
        RawPhone::Other(_) => None,
    })
}

fn deserialize_notes<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{compose_notes, CaregiverRecord};

    #[test]
    fn compose_notes_prefixes_summary() {
        assert_eq!(
            compose_notes("Visit went well."),
            "OpenPhone Summary:\nVisit went well."
        );
    }

    #[test]
    fn deserializes_numeric_id_and_ignores_extra_fields() {
        let body = r#"{"id": 42, "phone": "1-512-555-1234", "notes": "n", "firstName": "Ada"}"#;
        let record: CaregiverRecord = serde_json::from_str(body).expect("parse");
        assert_eq!(record.id, "42");
        assert_eq!(record.phone.as_deref(), Some("1-512-555-1234"));
        assert_eq!(record.notes, "n");
    }

    #[test]
    fn missing_phone_and_null_notes_default() {
        let record: CaregiverRecord =
            serde_json::from_str(r#"{"id": "cg1", "notes": null}"#).expect("parse");
        assert_eq!(record.phone, None);
        assert_eq!(record.phone_or_empty(), "");
        assert_eq!(record.notes, "");
    }

    #[test]
    fn non_string_phone_reads_as_missing() {
        let record: CaregiverRecord =
            serde_json::from_str(r#"{"id": "cg0", "phone": 5125550000}"#).expect("parse");
        assert_eq!(record.phone, None);

        let record: CaregiverRecord =
            serde_json::from_str(r#"{"id": "cg0", "phone": {"mobile": "x"}}"#).expect("parse");
        assert_eq!(record.phone, None);
    }

    #[test]
    fn missing_or_null_id_is_rejected() {
        assert!(serde_json::from_str::<CaregiverRecord>(r#"{"phone": "1-512-555-1234"}"#).is_err());
        assert!(serde_json::from_str::<CaregiverRecord>(r#"{"id": null}"#).is_err());
    }

    #[test]
    fn with_phone_allows_missing_phone() {
        let record = CaregiverRecord::with_phone("cg2", None, "");
        assert_eq!(record.phone, None);
        assert_eq!(record.phone_or_empty(), "");
    }
}
