use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::{TextGridError, TextGridResult};
use crate::io::parse_textgrid_file;
use crate::models::{Interval, LabeledInterval, MetadataRecord, SentenceRecord, TextGrid};

/// Labels that mark non-speech segments
pub const MARKER_LABELS: [&str; 4] = ["<B>", "<Z>", "<S>", ""];

/// Whether a label is a non-speech marker (compared after trimming)
pub fn is_marker_label(label: &str) -> bool {
    MARKER_LABELS.contains(&label.trim())
}

/// Which tier of a TextGrid to convert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TierSelector {
    /// The first tier in the file
    #[default]
    First,
    /// The first tier with this name
    Named(String),
}

impl From<Option<String>> for TierSelector {
    fn from(name: Option<String>) -> Self {
        name.map(TierSelector::Named).unwrap_or_default()
    }
}

/// Configuration for the conversion stage
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    pub tier: TierSelector,
}

/// Result of converting one tier
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Name of the converted tier
    pub tier_name: String,
    /// One sentence per non-marker interval, in input order
    pub sentences: Vec<SentenceRecord>,
    /// Intervals in the tier
    pub total_intervals: usize,
    /// Intervals dropped as markers
    pub markers_skipped: usize,
}

/// Turn labeled intervals into sentence records
///
/// Each interval whose trimmed label is not a marker becomes exactly one
/// record carrying `metadata`, the interval bounds and the trimmed label.
/// Adjacent intervals are not merged.
pub fn generate_sentences<T: LabeledInterval>(
    intervals: &[T],
    metadata: &MetadataRecord,
) -> Vec<SentenceRecord> {
    intervals
        .iter()
        .filter(|interval| !is_marker_label(interval.label()))
        .map(|interval| SentenceRecord {
            metadata: metadata.clone(),
            x_min: interval.start(),
            x_max: interval.end(),
            text: interval.label().trim().to_string(),
        })
        .collect()
}

/// Pick the interval tier to convert
pub fn select_intervals<'a>(
    grid: &'a TextGrid,
    selector: &TierSelector,
) -> TextGridResult<(&'a str, &'a [Interval])> {
    let tier = match selector {
        TierSelector::First => grid.first_tier().ok_or(TextGridError::NoTiers)?,
        TierSelector::Named(name) => grid
            .tier(name)
            .ok_or_else(|| TextGridError::TierNotFound(name.clone()))?,
    };

    let intervals = tier
        .intervals()
        .ok_or_else(|| TextGridError::NotIntervalTier(tier.name.clone()))?;

    Ok((tier.name.as_str(), intervals))
}

/// Convert the selected tier of a parsed TextGrid
pub fn convert_textgrid(
    grid: &TextGrid,
    metadata: &MetadataRecord,
    config: &ConvertConfig,
) -> TextGridResult<ConversionResult> {
    let (tier_name, intervals) = select_intervals(grid, &config.tier)?;
    let sentences = generate_sentences(intervals, metadata);

    debug!(
        "Tier {:?}: {} intervals -> {} sentences",
        tier_name,
        intervals.len(),
        sentences.len()
    );

    Ok(ConversionResult {
        tier_name: tier_name.to_string(),
        total_intervals: intervals.len(),
        markers_skipped: intervals.len() - sentences.len(),
        sentences,
    })
}

/// Read a TextGrid file and convert its selected tier
pub fn process_textgrid_file(
    path: &Path,
    metadata: &MetadataRecord,
    config: &ConvertConfig,
) -> Result<ConversionResult> {
    info!("Loading TextGrid from {:?}", path);
    let grid = parse_textgrid_file(path)
        .with_context(|| format!("Failed to read TextGrid: {:?}", path))?;

    convert_textgrid(&grid, metadata, config)
        .with_context(|| format!("Failed to convert TextGrid: {:?}", path))
}
