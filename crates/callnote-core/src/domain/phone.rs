use serde::{Deserialize, Serialize};
use std::fmt;

/// Phone number in `D-DDD-DDD-DDDD` form, or the untouched input when the
/// digit count does not allow a reformat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How the sender's canonical phone is compared with the phone stored on
/// the remote caregiver record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneMatch {
    /// Remote value must equal the canonical phone byte for byte.
    #[default]
    Exact,
    /// Remote value is normalized before comparing.
    Normalized,
}

impl PhoneMatch {
    pub fn matches(self, canonical: &CanonicalPhone, remote: &str) -> bool {
        match self {
            PhoneMatch::Exact => canonical.matches(remote),
            PhoneMatch::Normalized => normalize_phone(remote) == *canonical,
        }
    }
}

pub fn normalize_phone(value: &str) -> CanonicalPhone {
    let digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();

    let formatted = match digits.len() {
        11 => format!(
            "{}-{}-{}-{}",
            &digits[0..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        10 => format!("1-{}-{}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
        _ => value.to_string(),
    };

    CanonicalPhone(formatted)
}
