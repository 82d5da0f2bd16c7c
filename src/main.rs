//! # Lindex - Line Index Inspector
//!
//! Loads a file into a document, optionally replays an edit script against
//! it, and prints the resulting line table.
//!
//! ```bash
//! # Show the line table of a file
//! cargo run -- path/to/file.txt
//!
//! # Replay edits first, print JSON
//! cargo run -- path/to/file.txt --script edits.json --json
//! ```

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lindex_buffer::TextEngine;
use lindex_core::{parse_script, Config, Document};

/// Lindex - inspect the character/byte line index of a text file
#[derive(Parser, Debug)]
#[command(name = "lindex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to index
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// JSON edit script to replay before printing
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One row of the printed table.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct LineRow {
    line: usize,
    char_start: usize,
    char_length: usize,
    byte_start: usize,
    byte_length: usize,
    multibyte: bool,
}

fn line_rows(doc: &Document) -> Vec<LineRow> {
    let index = doc.index();
    let text = doc.text();
    index
        .lines()
        .map(|span| LineRow {
            line: span.line,
            char_start: span.start,
            char_length: span.length,
            byte_start: text.byte_start_of_line(span.line),
            byte_length: text.byte_length_of_line(span.line),
            multibyte: index.line_contains_multibyte_char(text, span.line),
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(),
    };

    let mut doc = Document::open(&args.file, config.document)
        .with_context(|| format!("opening {}", args.file.display()))?;

    if let Some(path) = &args.script {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let ops = parse_script(&json)?;
        for (i, op) in ops.iter().enumerate() {
            doc.apply(op).with_context(|| format!("edit #{i} ({op:?})"))?;
        }
        tracing::info!(edits = ops.len(), "replayed script");
    }

    let rows = line_rows(&doc);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "{:>6} {:>10} {:>8} {:>10} {:>8}  multibyte",
            "line", "char", "chars", "byte", "bytes"
        );
        for row in &rows {
            println!(
                "{:>6} {:>10} {:>8} {:>10} {:>8}  {}",
                row.line,
                row.char_start,
                row.char_length,
                row.byte_start,
                row.byte_length,
                if row.multibyte { "yes" } else { "no" }
            );
        }
    }

    Ok(())
}
