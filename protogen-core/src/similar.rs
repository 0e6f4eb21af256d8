//! Ranked "similar protocols" entries returned alongside generated text.

use serde::{Deserialize, Deserializer, Serialize};

/// One previously published protocol the generator considers similar.
///
/// Entries are displayed in the order the generator returns them;
/// nothing in this crate re-sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarProtocolEntry {
    pub name: String,
    /// 0–100
    #[serde(deserialize_with = "percent")]
    pub similarity_percent: u8,
    pub year: String,
}

impl SimilarProtocolEntry {
    pub fn new(name: impl Into<String>, similarity_percent: u8, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            similarity_percent: similarity_percent.min(100),
            year: year.into(),
        }
    }

    pub fn similarity_label(&self) -> String {
        format!("{}% match", self.similarity_percent)
    }
}

/// Reject percentages above 100 in generator payloads
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > 100 {
        return Err(serde::de::Error::custom(format!(
            "similarity_percent must be 0..=100, got {value}"
        )));
    }
    Ok(value)
}
