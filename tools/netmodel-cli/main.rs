use clap::{Parser, Subcommand, ValueEnum};
use netmodel::prelude::*;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindCli {
    Network,
    Facility,
}

impl From<KindCli> for DocumentKind {
    fn from(kind: KindCli) -> Self {
        match kind {
            KindCli::Network => DocumentKind::Network,
            KindCli::Facility => DocumentKind::Facility,
        }
    }
}

/// Inspect and normalize network and facility documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log sync and validation details to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a document into a session, save it back and report what changed
    Check {
        /// Path to the document JSON file
        document: String,
        #[arg(short, long, value_enum, default_value = "network")]
        kind: KindCli,
        /// Facility documents referenced by facility nodes
        #[arg(short, long = "facility")]
        facilities: Vec<String>,
    },
    /// Auto-layout a document and write the result
    Layout {
        document: String,
        #[arg(short, long, value_enum, default_value = "network")]
        kind: KindCli,
        #[arg(short, long = "facility")]
        facilities: Vec<String>,
        /// Where to write the laid-out document
        #[arg(short, long, default_value = "layout.json")]
        output: String,
        /// Session config JSON overriding layout spacing
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Logger already initialized: {}", e);
    }

    match cli.command {
        Command::Check {
            document,
            kind,
            facilities,
        } => run_check(&document, kind.into(), &facilities),
        Command::Layout {
            document,
            kind,
            facilities,
            output,
            config,
        } => run_layout(&document, kind.into(), &facilities, &output, config.as_deref()),
    }
}

fn open_session(path: &str, kind: DocumentKind, facility_paths: &[String], config: SessionConfig) -> (Document, EditorSession) {
    let document = Document::from_file(kind, path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", path, e)));
    let facilities: Vec<FacilityDocument> = facility_paths
        .iter()
        .map(|p| {
            FacilityDocument::load(p)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load facility '{}': {}", p, e)))
        })
        .collect();
    let session = EditorSession::builder(document.clone())
        .with_facilities(facilities)
        .with_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open '{}': {}", path, e)));
    (document, session)
}

fn run_check(path: &str, kind: DocumentKind, facility_paths: &[String]) {
    let start = Instant::now();
    let (original, session) = open_session(path, kind, facility_paths, SessionConfig::default());
    let graph = session.graph();
    println!(
        "Loaded {} '{}': {} nodes, {} edges",
        kind,
        original.name(),
        graph.nodes().count(),
        graph.edges().count()
    );

    let report = session.save();
    if let Some(warning) = report.warning() {
        println!("\nWarning: {}", warning);
        for dropped in &report.dropped {
            println!("  -> {}", dropped);
        }
    }
    if report.document == original {
        println!("\nRound trip is lossless.");
    } else {
        println!("\nRound trip changed the document.");
    }
    println!("Checked in {:?}", start.elapsed());
}

fn run_layout(path: &str, kind: DocumentKind, facility_paths: &[String], output: &str, config: Option<&str>) {
    let config = config
        .map(|p| {
            SessionConfig::from_file(p)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config '{}': {}", p, e)))
        })
        .unwrap_or_default();
    let (_, mut session) = open_session(path, kind, facility_paths, config);
    let moved = session.auto_layout();
    println!("Moved {} nodes", moved);

    let report = session.save();
    if let Some(warning) = report.warning() {
        println!("Warning: {} ({} edges)", warning, report.dropped.len());
    }
    let json = report
        .document
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize document: {}", e)));
    fs::write(output, json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", output, e)));
    println!("Wrote '{}'", output);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
