//! catalog-seeder - write the featured product set to Firestore
//!
//! # Configuration
//!
//! Configuration is loaded from:
//! 1. Configuration files (config/seeder.*, /etc/thapasya/seeder.*, `--config`)
//! 2. Environment variables (prefixed with THAPASYA__)
//!
//! See `config.rs` for detailed configuration options.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use thapasya_core::{init_tracing, FirestoreClient};
use thapasya_seeder::{featured_products, run, with_direct_image_links, SeedSettings, SeederConfig};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "catalog-seeder", version, about = "Seed the featured products document")]
struct Args {
    /// Configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Skip reading the document back after the write
    #[arg(long)]
    no_verify: bool,

    /// Rewrite Drive share links into direct image URLs before writing
    #[arg(long)]
    convert_images: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        SeederConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.no_verify {
        config.catalog.verify = false;
    }
    if args.convert_images {
        config.catalog.convert_image_links = true;
    }

    init_tracing(&config.logging);
    config.validate()?;

    info!(
        service = "catalog-seeder",
        version = env!("CARGO_PKG_VERSION"),
        collection = %config.catalog.collection,
        document = %config.catalog.document,
        "Starting catalog seeder"
    );

    let store =
        FirestoreClient::new(&config.firestore).context("Failed to create Firestore client")?;

    let mut products = featured_products();
    if config.catalog.convert_image_links {
        products = with_direct_image_links(products);
    }

    let settings = SeedSettings {
        target: config.catalog.target()?,
        verify: config.catalog.verify,
    };

    let mut out = io::stdout().lock();
    if let Err(e) = run(&store, &settings, &products, &mut out).await {
        error!(error = %e, "Catalog seeding failed");
        return Err(e.into());
    }

    Ok(())
}
