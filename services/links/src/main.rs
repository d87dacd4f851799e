//! drive-links - convert Google Drive share links to direct image URLs
//!
//! Links are taken from the command line, from `--file`, or one per line
//! from stdin when neither is given.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use thapasya_core::{init_tracing, LoggingConfig};
use thapasya_links::{convert_links, Conversion};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "drive-links", version, about = "Convert Google Drive share links to direct image URLs")]
struct Args {
    /// Share links to convert
    links: Vec<String>,

    /// Read links from a file, one per line
    #[arg(long, short, conflicts_with = "links")]
    file: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&LoggingConfig {
        level: args.log_level.clone(),
        ..Default::default()
    });

    let links = if !args.links.is_empty() {
        args.links.clone()
    } else if let Some(path) = &args.file {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        read_links(BufReader::new(file))?
    } else {
        read_links(io::stdin().lock())?
    };

    info!(count = links.len(), "Converting links");
    let conversion = convert_links(&links);

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &conversion)?;
        writeln!(out)?;
    } else {
        render_report(&conversion, &mut out)?;
    }

    Ok(())
}

/// Non-blank, trimmed lines
fn read_links(reader: impl BufRead) -> Result<Vec<String>> {
    let mut links = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if !line.is_empty() {
            links.push(line.to_string());
        }
    }
    Ok(links)
}

fn render_report(conversion: &Conversion, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Google Drive Link Converter")?;
    writeln!(out, "{}", "=".repeat(40))?;

    writeln!(out, "\n✅ Converted Links:")?;
    for (i, link) in conversion.converted.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, link)?;
    }

    if !conversion.failed.is_empty() {
        writeln!(out, "\n❌ Failed to convert:")?;
        for link in &conversion.failed {
            writeln!(out, " - {}", link)?;
        }
    }

    Ok(())
}
