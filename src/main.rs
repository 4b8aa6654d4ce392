// namecard: Lay out and export dual-sided name cards

use std::str::FromStr;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use namecard::export::{
    archive_file_name, document_file_name, document_markup, export_archive, print_file_name,
    print_markup, print_pdf, print_pdf_file_name, surface_svg, topic_file_name, ArchiveOptions,
    RasterOptions, SvgRasterizer,
};
use namecard::image_data::load_logo;
use namecard::{render_card, CardDesign, CardError, Participant};
use serde::Deserialize;

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out and export dual-sided name cards")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Card design JSON file (defaults to the built-in design)
    #[arg(short, long, global = true)]
    design: Option<String>,

    /// Participant roster file (JSON array, optional)
    #[arg(short, long, global = true)]
    roster: Option<String>,

    /// Event topic used for output file names (defaults to name-cards-{date})
    #[arg(short, long, global = true)]
    topic: Option<String>,

    /// Logo image (file path or URL), replaces the design's logo
    #[arg(long, global = true)]
    logo: Option<String>,

    /// Output filename (defaults to a name derived from the topic)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the editable SVG surface for one participant
    Surface {
        /// Roster position of the participant to preview
        #[arg(long, default_value = "0")]
        index: usize,
    },
    /// Write print-ready HTML with one card per A4 page
    Print,
    /// Write an A4 PDF with one rasterized card per page
    PrintPdf {
        /// Bitmap pixels per surface pixel
        #[arg(long, default_value = "2.0")]
        scale: f32,
    },
    /// Write the Word-compatible .doc document
    Doc,
    /// Write a zip archive with one PNG per participant
    Zip {
        /// Bitmap pixels per surface pixel
        #[arg(long, default_value = "2.0")]
        scale: f32,

        /// Pause between two cards, in milliseconds
        #[arg(long, default_value = "150")]
        delay_ms: u64,
    },
    /// Print the design as JSON (the built-in one unless --design is given)
    SampleDesign,
}

/// Roster entry from JSON file: a bare name or a full participant record
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Name(String),
    Participant(Participant),
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(args:?; "Parsed arguments");

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CardError> {
    let mut design = load_design(args.design.as_deref())?;
    if let Some(logo) = args.logo.as_deref() {
        design.set_logo_image(Some(load_logo(logo)?));
    }
    let participants = load_roster(args.roster.as_deref())?;
    let topic = args.topic.unwrap_or_else(default_topic);
    info!(topic = topic.as_str(), cards = participants.len(); "Loaded inputs");

    let (output_file, bytes) = match args.command {
        Command::Surface { index } => {
            let participant = match participants.get(index) {
                Some(p) => p.clone(),
                None if participants.is_empty() => Participant::default(),
                None => {
                    return Err(CardError::Roster(format!(
                        "index {} is out of range for {} participants",
                        index,
                        participants.len()
                    )))
                }
            };
            (
                args.output.unwrap_or_else(|| topic_file_name(&topic, ".svg")),
                surface_svg(&render_card(&design, &participant)).into_bytes(),
            )
        }
        Command::Print => (
            args.output.unwrap_or_else(|| print_file_name(&topic)),
            print_markup(&design, &participants).into_bytes(),
        ),
        Command::PrintPdf { scale } => {
            let rasterizer = SvgRasterizer::new(RasterOptions { scale });
            (
                args.output.unwrap_or_else(|| print_pdf_file_name(&topic)),
                print_pdf(&design, &participants, &rasterizer)?,
            )
        }
        Command::Doc => (
            args.output.unwrap_or_else(|| document_file_name(&topic)),
            document_markup(&topic, &design, &participants).into_bytes(),
        ),
        Command::Zip { scale, delay_ms } => {
            let rasterizer = SvgRasterizer::new(RasterOptions { scale });
            let options = ArchiveOptions {
                delay: Duration::from_millis(delay_ms),
            };
            (
                args.output.unwrap_or_else(|| archive_file_name(&topic)),
                export_archive(&design, &participants, &rasterizer, options)?,
            )
        }
        Command::SampleDesign => {
            let json = serde_json::to_string_pretty(&design)
                .map_err(|e| CardError::Design(e.to_string()))?;
            return write_or_print(args.output.as_deref(), &json);
        }
    };

    std::fs::write(&output_file, bytes)?;

    println!("✓ Generated: {}", output_file);
    println!("  Topic: {}", topic);
    println!("  Cards: {}", participants.len());

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn default_topic() -> String {
    format!("name-cards-{}", Local::now().date_naive().format("%Y-%m-%d"))
}

fn write_or_print(path: Option<&str>, content: &str) -> Result<(), CardError> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            println!("✓ Generated: {}", p);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn load_design(path: Option<&str>) -> Result<CardDesign, CardError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| CardError::Design(format!("{}: {}", p, e)))?;
            CardDesign::from_json(&content)
                .map_err(|e| CardError::Design(format!("Invalid JSON: {}", e)))
        }
        None => Ok(CardDesign::new()),
    }
}

fn load_roster(path: Option<&str>) -> Result<Vec<Participant>, CardError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| CardError::Roster(format!("{}: {}", p, e)))?;
            let entries: Vec<RosterEntry> = serde_json::from_str(&content)
                .map_err(|e| CardError::Roster(format!("Invalid JSON: {}", e)))?;
            Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    RosterEntry::Name(name) => Participant::new(name, ""),
                    RosterEntry::Participant(participant) => participant,
                })
                .collect())
        }
        None => Ok(Vec::new()),
    }
}
