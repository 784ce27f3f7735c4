use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gridsent::{
    decode_filename, execute_render, generate_sentences, is_marker_label, parse_textgrid_file,
    process_textgrid_file, select_intervals, ConversionSummary, ConvertConfig, OutputFormat,
    RenderConfig, TierSelector,
};

#[derive(Parser)]
#[command(name = "gridsent")]
#[command(author, version, about = "Convert TextGrid speech annotations into sentence records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a TextGrid file into sentence records
    Convert {
        /// Input TextGrid file, named <corpus>_<session>_<speaker>_...
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for sentence records (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for sentence records
        #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
        format: OutputFormat,

        /// Output file for a human-readable listing (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Tier to convert (defaults to the first tier)
        #[arg(long)]
        tier: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the metadata decoded from a file name
    Decode {
        /// File path to decode
        path: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a TextGrid file without writing records
    Analyze {
        /// Input TextGrid file
        #[arg(short, long)]
        input: PathBuf,

        /// Tier to analyze (defaults to the first tier)
        #[arg(long)]
        tier: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            human_readable,
            tier,
            verbose,
        } => {
            setup_logging(verbose);
            convert_file(input, output, format, human_readable, tier)
        }
        Commands::Decode { path, verbose } => {
            setup_logging(verbose);
            let record = decode_filename(&path)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Analyze {
            input,
            tier,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_file(input, tier)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn convert_file(
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    human_readable: Option<PathBuf>,
    tier: Option<String>,
) -> Result<()> {
    let metadata = decode_filename(&input.to_string_lossy())
        .with_context(|| format!("Failed to decode file name: {:?}", input))?;
    info!(
        "Session {}, speaker {} ({}), {} dialog",
        metadata.session_id, metadata.speaker_id, metadata.speaker_type, metadata.dialog_type
    );

    let config = ConvertConfig {
        tier: TierSelector::from(tier),
    };
    let result = process_textgrid_file(&input, &metadata, &config)?;

    info!(
        "Tier {:?}: {} intervals, {} markers skipped, {} sentences",
        result.tier_name,
        result.total_intervals,
        result.markers_skipped,
        result.sentences.len()
    );
    if result.sentences.is_empty() {
        warn!("No sentences found in {:?}", input);
    }

    let summary = ConversionSummary {
        source_file: metadata.file_name.clone(),
        tier_name: result.tier_name,
        total_intervals: result.total_intervals,
        markers_skipped: result.markers_skipped,
        sentence_count: result.sentences.len(),
        speech_duration: result.sentences.iter().map(|s| s.duration()).sum(),
    };

    let render_config = RenderConfig {
        format,
        generate_human: human_readable.is_some(),
    };
    let render_result = execute_render(
        result.sentences,
        summary,
        output.as_deref(),
        human_readable.as_deref(),
        &render_config,
    )?;

    if let Some(path) = render_result.machine_path {
        info!("Output written to {:?}", path);
    }
    if let Some(human_path) = render_result.human_path {
        info!("Human-readable output written to {:?}", human_path);
    }

    Ok(())
}

fn analyze_file(input: PathBuf, tier: Option<String>) -> Result<()> {
    info!("Analyzing TextGrid from {:?}", input);
    let metadata = decode_filename(&input.to_string_lossy())
        .with_context(|| format!("Failed to decode file name: {:?}", input))?;
    let grid = parse_textgrid_file(&input)
        .with_context(|| format!("Failed to read TextGrid: {:?}", input))?;

    println!("TextGrid Analysis");
    println!("=================");
    println!("File: {}", metadata.file_name);
    println!("Session: {}", metadata.session_id);
    println!("Speaker: {} ({})", metadata.speaker_id, metadata.speaker_type);
    println!("Dialog type: {}", metadata.dialog_type);
    println!("Duration: {:.1}s", grid.duration());
    println!();

    println!("Tiers");
    println!("-----");
    for t in &grid.tiers {
        let class = if t.is_interval_tier() {
            "intervals"
        } else {
            "points"
        };
        if t.is_empty() {
            println!("{}: no {}", t.name, class);
        } else {
            println!("{}: {} {}", t.name, t.len(), class);
        }
    }
    println!();

    let selector = TierSelector::from(tier);
    let (tier_name, intervals) = select_intervals(&grid, &selector)?;

    let mut markers: BTreeMap<&str, usize> = BTreeMap::new();
    for interval in intervals.iter().filter(|i| is_marker_label(&i.label)) {
        *markers.entry(interval.label.trim()).or_insert(0) += 1;
    }
    let sentences = generate_sentences(intervals, &metadata);
    let speech: f64 = sentences.iter().map(|s| s.duration()).sum();
    let words: usize = sentences.iter().map(|s| s.word_count()).sum();

    println!("Tier {:?}", tier_name);
    println!("------{}", "-".repeat(tier_name.len() + 2));
    println!("Intervals: {}", intervals.len());
    for (marker, count) in &markers {
        let marker = if marker.is_empty() { "(empty)" } else { *marker };
        println!("Marker {}: {}", marker, count);
    }
    println!("Sentences: {}", sentences.len());
    println!("Words: {}", words);
    println!("Speech: {:.1}s", speech);
    if !sentences.is_empty() {
        println!(
            "Average sentence: {:.2}s, {:.1} words",
            speech / sentences.len() as f64,
            words as f64 / sentences.len() as f64
        );
    }

    Ok(())
}
