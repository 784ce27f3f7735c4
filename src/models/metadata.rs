use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the speaker in a recorded dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerType {
    Agent,
    Client,
}

impl SpeakerType {
    /// Agents are numbered from "00"; everyone else is a client
    pub fn from_speaker_id(speaker_id: &str) -> Self {
        if speaker_id.starts_with("00") {
            SpeakerType::Agent
        } else {
            SpeakerType::Client
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerType::Agent => "agent",
            SpeakerType::Client => "client",
        }
    }
}

impl fmt::Display for SpeakerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business domain of the dialog, inferred from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogType {
    Bank,
    Telecom,
    Insurance,
    Unknown,
}

impl DialogType {
    /// File name fragments in priority order
    pub const FRAGMENTS: [(&'static str, DialogType); 3] = [
        ("bnk", DialogType::Bank),
        ("tel", DialogType::Telecom),
        ("ins", DialogType::Insurance),
    ];

    /// Classify a file name; the first fragment found wins
    pub fn from_file_name(file_name: &str) -> Self {
        Self::FRAGMENTS
            .iter()
            .find(|(fragment, _)| file_name.contains(fragment))
            .map(|(_, dialog_type)| *dialog_type)
            .unwrap_or(DialogType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DialogType::Bank => "bank",
            DialogType::Telecom => "telecom",
            DialogType::Insurance => "insurance",
            DialogType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DialogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session and speaker information decoded from an annotation file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Base name of the file (no directories)
    pub file_name: String,
    /// Four-character session identifier
    pub session_id: String,
    /// Four-character speaker identifier
    pub speaker_id: String,
    pub speaker_type: SpeakerType,
    pub dialog_type: DialogType,
}
