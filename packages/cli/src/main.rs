#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the `ShopGuard` toolchain.
//!
//! ```text
//! shopguard serve [--interactive]
//! shopguard synthesize [--seed 42] [--sensitivity high] [--output run.json]
//! shopguard summarize <detections.json> [--output summary.json]
//! shopguard show <summary.json>
//! ```
//!
//! Running `shopguard` with no subcommand prompts for the tool to run.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use shopguard_detection::export::{export_summary, read_summary, write_summary};
use shopguard_detection::normalize::{RawAnalysis, normalize};
use shopguard_detection::random::{RandomSource, SeededRandom};
use shopguard_detection::synthesizer::{SynthesizerConfig, synthesize};
use shopguard_detection_models::{AnalysisSummary, BehaviorKind, Sensitivity};
use shopguard_server::config::ServerConfig;

#[derive(Parser)]
#[command(name = "shopguard", about = "ShopGuard theft detection toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Prompt for bind address, port, and backend URL
        #[arg(long)]
        interactive: bool,
    },
    /// Generate a demo analysis without a backend
    Synthesize {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Detection sensitivity (low, medium, high)
        #[arg(long)]
        sensitivity: Option<Sensitivity>,
        /// Frames per second used for frame numbers
        #[arg(long)]
        frame_rate: Option<f64>,
        /// Comma-separated behavior kinds to draw descriptions from
        #[arg(long, value_delimiter = ',')]
        detect_types: Vec<BehaviorKind>,
        /// Write the analysis to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Aggregate raw detections (backend payload or exported analysis)
    Summarize {
        /// JSON file with a `detections` array, or a bare array
        input: PathBuf,
        /// Write the analysis to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a human-readable report for an exported analysis
    Show {
        /// Exported analysis JSON
        input: PathBuf,
    },
}

/// Tools offered when no subcommand is given.
enum Tool {
    Serve,
    Synthesize,
    Summarize,
    Show,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Synthesize, Self::Summarize, Self::Show];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Synthesize => "Synthesize a demo analysis",
            Self::Summarize => "Summarize a detections file",
            Self::Show => "Show an exported analysis",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => prompt_command()?,
    };

    match command {
        Commands::Serve { interactive } => serve(interactive)?,
        Commands::Synthesize {
            seed,
            sensitivity,
            frame_rate,
            detect_types,
            output,
        } => {
            let config = SynthesizerConfig {
                frame_rate_hint: frame_rate,
                sensitivity,
                detect_types,
            };
            let mut rng: Box<dyn RandomSource> = match seed {
                Some(seed) => Box::new(SeededRandom::new(seed)),
                None => Box::new(SeededRandom::from_entropy()),
            };
            let summary = synthesize(&config, rng.as_mut());
            emit(&summary, output.as_deref())?;
        }
        Commands::Summarize { input, output } => {
            let summary = summarize_file(&input)?;
            emit(&summary, output.as_deref())?;
        }
        Commands::Show { input } => {
            let summary = read_summary(&input)?;
            print!("{}", report(&summary)?);
        }
    }

    Ok(())
}

fn prompt_command() -> Result<Commands, Box<dyn std::error::Error>> {
    println!("ShopGuard Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match Tool::ALL[idx] {
        Tool::Serve => Commands::Serve { interactive: true },
        Tool::Synthesize => Commands::Synthesize {
            seed: None,
            sensitivity: None,
            frame_rate: None,
            detect_types: Vec::new(),
            output: None,
        },
        Tool::Summarize => Commands::Summarize {
            input: prompt_path("Detections file")?,
            output: None,
        },
        Tool::Show => Commands::Show {
            input: prompt_path("Analysis file")?,
        },
    })
}

fn prompt_path(prompt: &str) -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(PathBuf::from(path))
}

fn serve(interactive: bool) -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(async move {
        if interactive {
            shopguard_server::interactive::run().await
        } else {
            let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
            shopguard_server::run_server(config).await
        }
    })
}

/// Reads detections from `path` and re-aggregates them.
///
/// Accepts a bare array of detection events or any object the backend
/// would return (optionally wrapped in `results`).
fn summarize_file(path: &Path) -> Result<AnalysisSummary, Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let raw = match value {
        serde_json::Value::Array(_) => RawAnalysis {
            detections: serde_json::from_value(value)?,
            ..RawAnalysis::default()
        },
        other => RawAnalysis::from_value(other)?,
    };
    log::debug!(
        "Read {} detections from {}",
        raw.detections.len(),
        path.display()
    );
    Ok(normalize(raw)?)
}

fn emit(summary: &AnalysisSummary, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            write_summary(path, summary)?;
            print!("{}", report(summary)?);
        }
        None => println!("{}", export_summary(summary)?),
    }
    Ok(())
}

fn report(summary: &AnalysisSummary) -> Result<String, std::fmt::Error> {
    use std::fmt::Write as _;

    let mut out = String::new();
    writeln!(
        out,
        "Threat level:        {}",
        summary.overall_threat_level
    )?;
    writeln!(out, "Average confidence:  {}%", summary.average_confidence)?;
    writeln!(
        out,
        "Detections:          {} ({} high confidence)",
        summary.summary.total_detections, summary.summary.high_confidence_detections
    )?;
    writeln!(
        out,
        "Frames processed:    {}/{} in {}s",
        summary.processed_frames, summary.total_frames, summary.processing_time
    )?;

    if !summary.summary.time_ranges.is_empty() {
        writeln!(out, "Incidents:")?;
        for incident in &summary.summary.time_ranges {
            writeln!(
                out,
                "  {:>7.1}s - {:>7.1}s  {}",
                incident.start, incident.end, incident.severity
            )?;
        }
    }

    Ok(out)
}
