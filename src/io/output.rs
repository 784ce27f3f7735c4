use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::SentenceRecord;

/// Machine-readable output: the sentence rows plus conversion metadata
#[derive(Debug, Clone, Serialize)]
pub struct SentenceTable {
    /// One flat record per sentence
    pub sentences: Vec<SentenceRecord>,
    /// Metadata about the conversion
    pub metadata: ConversionSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub source_file: String,
    pub tier_name: String,
    pub total_intervals: usize,
    pub markers_skipped: usize,
    pub sentence_count: usize,
    /// Summed sentence durations in seconds
    pub speech_duration: f64,
}

impl SentenceTable {
    pub fn new(sentences: Vec<SentenceRecord>, metadata: ConversionSummary) -> Self {
        Self {
            sentences,
            metadata,
        }
    }

    /// Write the whole table as a pretty JSON document
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    /// Write the whole table as a pretty JSON document to a writer
    pub fn write_json_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to write JSON")?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write one sentence record per line (JSON Lines)
    pub fn write_jsonl(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        self.write_jsonl_to(std::io::BufWriter::new(file))
    }

    /// Write one sentence record per line to a writer
    pub fn write_jsonl_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for sentence in &self.sentences {
            serde_json::to_writer(&mut writer, sentence).context("Failed to write JSON line")?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Human-readable sentence listing
pub struct HumanListing<'a> {
    sentences: &'a [SentenceRecord],
}

impl<'a> HumanListing<'a> {
    pub fn new(sentences: &'a [SentenceRecord]) -> Self {
        Self { sentences }
    }

    /// Format the sentences as text, one line each
    pub fn format(&self) -> String {
        let mut output = String::new();

        if let Some(first) = self.sentences.first() {
            let meta = &first.metadata;
            output.push_str(&format!(
                "{} (session {}, {} dialog)\n\n",
                meta.file_name, meta.session_id, meta.dialog_type
            ));
        }

        for sentence in self.sentences {
            output.push_str(&format!(
                "[{} - {}] {} {}: {}\n",
                format_timestamp(sentence.x_min),
                format_timestamp(sentence.x_max),
                sentence.metadata.speaker_type,
                sentence.metadata.speaker_id,
                sentence.text
            ));
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Format seconds as MM:SS.mmm
pub fn format_timestamp(seconds: f64) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let secs = ms / 1000;
    let millis = ms % 1000;
    let minutes = secs / 60;
    format!("{:02}:{:02}.{:03}", minutes, secs % 60, millis)
}
