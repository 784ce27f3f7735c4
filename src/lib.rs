pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use error::{DecodeError, TextGridError, TextGridResult};
pub use io::{
    parse_textgrid, parse_textgrid_file, ConversionSummary, HumanListing, SentenceTable,
};
pub use models::{
    DialogType, Interval, LabeledInterval, MetadataRecord, SentenceRecord, SpeakerType, TextGrid,
    Tier,
};
pub use stages::{
    convert_textgrid, decode_filename, execute_render, generate_sentences, is_marker_label,
    process_textgrid_file, select_intervals, ConversionResult, ConvertConfig, OutputFormat,
    RenderConfig, TierSelector,
};
