use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::DecodeError;
use crate::models::{DialogType, MetadataRecord, SpeakerType};

/// Shortest base name that still carries a session and a speaker id
pub const MIN_FILE_NAME_LEN: usize = 13;

/// `<corpus>_<session>_<speaker>` at the start of the base name,
/// e.g. `app_0683_0013_phnd_cc-bnk.TextGrid`
static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^_]{3}_(?P<session_id>[^_]{4})_(?P<speaker_id>[^_]{4})(?:[_.\-]|$)").unwrap()
});

/// Decode session and speaker metadata from an annotation file path
///
/// Only the base name (text after the last `/`) is inspected. The session id
/// sits at characters 4..8 and the speaker id at 9..13; speakers whose id
/// starts with "00" are agents. The dialog type comes from the first of
/// "bnk", "tel", "ins" found in the name.
pub fn decode_filename(file_path: &str) -> Result<MetadataRecord, DecodeError> {
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);

    let found = file_name.chars().count();
    if found < MIN_FILE_NAME_LEN {
        return Err(DecodeError::TooShort {
            file_name: file_name.to_string(),
            expected: MIN_FILE_NAME_LEN,
            found,
        });
    }

    let captures = FILE_NAME_PATTERN
        .captures(file_name)
        .ok_or_else(|| DecodeError::Malformed(file_name.to_string()))?;
    let session_id = captures["session_id"].to_string();
    let speaker_id = captures["speaker_id"].to_string();

    let record = MetadataRecord {
        file_name: file_name.to_string(),
        speaker_type: SpeakerType::from_speaker_id(&speaker_id),
        dialog_type: DialogType::from_file_name(file_name),
        session_id,
        speaker_id,
    };

    debug!(
        "Decoded {}: session={} speaker={} ({}), dialog={}",
        record.file_name,
        record.session_id,
        record.speaker_id,
        record.speaker_type,
        record.dialog_type
    );

    Ok(record)
}
