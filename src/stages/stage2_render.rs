use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{ConversionSummary, HumanListing, SentenceTable};
use crate::models::SentenceRecord;

/// Machine-readable output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document with sentences and metadata
    Json,
    /// One flat sentence record per line
    #[default]
    Jsonl,
}

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub format: OutputFormat,
    /// Whether to generate human-readable output
    pub generate_human: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jsonl,
            generate_human: true,
        }
    }
}

/// Result of rendering
#[derive(Debug)]
pub struct RenderResult {
    /// Path to machine output (None when written to stdout)
    pub machine_path: Option<PathBuf>,
    /// Path to human output (if generated)
    pub human_path: Option<PathBuf>,
}

/// Render sentence records
///
/// The machine view goes to `machine_output`, or to stdout when no path is
/// given. The human listing is written only when a path is given.
pub fn execute_render(
    sentences: Vec<SentenceRecord>,
    summary: ConversionSummary,
    machine_output: Option<&Path>,
    human_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let mut result = RenderResult {
        machine_path: None,
        human_path: None,
    };

    if config.generate_human {
        if let Some(path) = human_output {
            info!("Writing human-readable listing to {:?}", path);
            HumanListing::new(&sentences).write_file(path)?;
            result.human_path = Some(path.to_path_buf());
        }
    }

    let table = SentenceTable::new(sentences, summary);
    match machine_output {
        Some(path) => {
            info!("Writing {} sentences to {:?}", table.sentences.len(), path);
            match config.format {
                OutputFormat::Json => table.write_json(path)?,
                OutputFormat::Jsonl => table.write_jsonl(path)?,
            }
            result.machine_path = Some(path.to_path_buf());
        }
        None => {
            let stdout = std::io::stdout().lock();
            match config.format {
                OutputFormat::Json => table.write_json_to(stdout)?,
                OutputFormat::Jsonl => table.write_jsonl_to(stdout)?,
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DialogType, MetadataRecord, SpeakerType};

    fn sentences() -> Vec<SentenceRecord> {
        let metadata = MetadataRecord {
            file_name: "app_0683_0013_phnd_cc-ins.TextGrid".to_string(),
            session_id: "0683".to_string(),
            speaker_id: "0013".to_string(),
            speaker_type: SpeakerType::Agent,
            dialog_type: DialogType::Insurance,
        };
        vec![SentenceRecord {
            metadata,
            x_min: 0.5,
            x_max: 1.75,
            text: "your policy number please".to_string(),
        }]
    }

    fn summary() -> ConversionSummary {
        ConversionSummary {
            source_file: "app_0683_0013_phnd_cc-ins.TextGrid".to_string(),
            tier_name: "utt".to_string(),
            total_intervals: 2,
            markers_skipped: 1,
            sentence_count: 1,
            speech_duration: 1.25,
        }
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert!(config.generate_human);
    }

    #[test]
    fn test_render_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let machine = dir.path().join("sentences.jsonl");
        let human = dir.path().join("sentences.txt");

        let result = execute_render(
            sentences(),
            summary(),
            Some(&machine),
            Some(&human),
            &RenderConfig::default(),
        )
        .unwrap();

        assert_eq!(result.machine_path.as_deref(), Some(machine.as_path()));
        assert_eq!(result.human_path.as_deref(), Some(human.as_path()));

        let jsonl = std::fs::read_to_string(&machine).unwrap();
        assert_eq!(jsonl.lines().count(), 1);
        assert!(jsonl.contains("\"dialog_type\":\"insurance\""));

        let listing = std::fs::read_to_string(&human).unwrap();
        assert!(listing.contains("agent 0013: your policy number please"));
    }

    #[test]
    fn test_render_json_without_human() {
        let dir = tempfile::tempdir().unwrap();
        let machine = dir.path().join("sentences.json");
        let human = dir.path().join("sentences.txt");
        let config = RenderConfig {
            format: OutputFormat::Json,
            generate_human: false,
        };

        let result =
            execute_render(sentences(), summary(), Some(&machine), Some(&human), &config).unwrap();

        assert!(result.human_path.is_none());
        assert!(!human.exists());

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&machine).unwrap()).unwrap();
        assert_eq!(value["metadata"]["tier_name"], "utt");
    }
}
