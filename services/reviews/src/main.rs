//! review-manager - add and inspect product reviews in Firestore
//!
//! Without a subcommand an interactive menu runs on stdin/stdout.
//! `quick` adds sample reviews to every product and exits.
//!
//! # Configuration
//!
//! Configuration is loaded from:
//! 1. Configuration files (config/reviews.*, /etc/thapasya/reviews.*, `--config`)
//! 2. Environment variables (prefixed with THAPASYA__)
//!
//! See `config.rs` for detailed configuration options.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use thapasya_core::{init_tracing, FirestoreClient};
use thapasya_reviews::{
    generate_for_products, ReviewConsole, ReviewGenerator, ReviewStore, ReviewsConfig, SampleData,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "review-manager", version, about = "Manage product reviews")]
struct Args {
    /// Configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add sample reviews to every product, then exit
    Quick {
        /// Reviews per product (defaults to reviews.default_reviews_per_product)
        #[arg(long, value_parser = parse_per_product)]
        per_product: Option<usize>,
    },
}

fn parse_per_product(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        ReviewsConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging);
    config.validate()?;

    info!(
        service = "review-manager",
        version = env!("CARGO_PKG_VERSION"),
        collection = %config.reviews.collection,
        "Starting review manager"
    );

    let client =
        FirestoreClient::new(&config.firestore).context("Failed to create Firestore client")?;
    let reviews = ReviewStore::new(&client, &config.reviews);
    let mut generator = ReviewGenerator::from_entropy(SampleData::default());

    match args.command {
        None => {
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            let mut console = ReviewConsole::new(reviews, generator, stdin, stdout);
            console.run().await.context("Console I/O failed")?;
        }
        Some(Command::Quick { per_product }) => {
            let per_product =
                per_product.unwrap_or(config.reviews.default_reviews_per_product);
            let mut out = io::stdout().lock();

            writeln!(out, "🚀 Starting quick reviews setup...")?;
            let product_ids = reviews
                .list_product_ids()
                .await
                .context("Failed to fetch product IDs")?;
            writeln!(out, "📦 Found {} products in database", product_ids.len())?;

            if product_ids.is_empty() {
                writeln!(out, "❌ No products found to add reviews")?;
                return Ok(());
            }

            let outcome =
                generate_for_products(&reviews, &mut generator, &product_ids, per_product, &mut out)
                    .await?;
            if outcome.failed.is_empty() {
                writeln!(out, "✅ Quick setup completed!")?;
            } else {
                anyhow::bail!(
                    "Failed to add reviews to {} of {} products",
                    outcome.failed.len(),
                    product_ids.len()
                );
            }
        }
    }

    Ok(())
}
