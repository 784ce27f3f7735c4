use serde::{Deserialize, Serialize};

use super::MetadataRecord;

/// One transcript sentence: the file metadata plus a single labeled interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    #[serde(flatten)]
    pub metadata: MetadataRecord,
    /// Interval start in seconds
    pub x_min: f64,
    /// Interval end in seconds
    pub x_max: f64,
    /// Trimmed interval label
    pub text: String,
}

impl SentenceRecord {
    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
