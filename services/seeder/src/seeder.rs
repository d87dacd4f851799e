//! Writing and reading back the featured products document.

use crate::catalog::{FeaturedCatalog, Product};
use std::io::{self, Write};
use thapasya_core::{DocumentPath, DocumentStore, FromFields, StoreError, ToFields};
use thiserror::Error;
use tracing::{error, info, instrument};

/// Seeder errors
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Error saving featured products: {0}")]
    Save(#[source] StoreError),

    #[error("Error reading featured products: {0}")]
    Read(#[source] StoreError),

    #[error("No featured products found at {0}")]
    Missing(String),

    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// What [`run`] should do besides the write itself
#[derive(Debug, Clone)]
pub struct SeedSettings {
    pub target: DocumentPath,
    pub verify: bool,
}

/// Overwrite `target` with exactly `products`, then print a summary.
#[instrument(skip_all, fields(target = %target, count = products.len()))]
pub async fn save_featured_products(
    store: &dyn DocumentStore,
    target: &DocumentPath,
    products: &[Product],
    out: &mut impl Write,
) -> Result<(), SeedError> {
    let catalog = FeaturedCatalog {
        products: products.to_vec(),
    };

    if let Err(e) = store.set(target, catalog.to_fields()).await {
        error!(error = %e, "Failed to save featured products");
        writeln!(out, "❌ Error saving featured products: {}", e)?;
        return Err(SeedError::Save(e));
    }

    info!("Featured products saved");
    render_saved(products, out)?;
    Ok(())
}

/// Read `target` back and print one line per product.
///
/// Returns `Ok(None)` when the document does not exist.
#[instrument(skip_all, fields(target = %target))]
pub async fn read_featured_products(
    store: &dyn DocumentStore,
    target: &DocumentPath,
    out: &mut impl Write,
) -> Result<Option<Vec<Product>>, SeedError> {
    let document = match store.get(target).await {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "Failed to read featured products");
            writeln!(out, "❌ Error reading featured products: {}", e)?;
            return Err(SeedError::Read(e));
        }
    };

    let Some(document) = document else {
        writeln!(out, "❌ No featured products found!")?;
        return Ok(None);
    };

    let catalog = match FeaturedCatalog::from_fields(&document.fields) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Failed to decode featured products");
            writeln!(out, "❌ Error reading featured products: {}", e)?;
            return Err(SeedError::Read(e));
        }
    };
    render_read_back(&catalog.products, out)?;
    Ok(Some(catalog.products))
}

/// Save, then optionally verify by reading back.
pub async fn run(
    store: &dyn DocumentStore,
    settings: &SeedSettings,
    products: &[Product],
    out: &mut impl Write,
) -> Result<(), SeedError> {
    save_featured_products(store, &settings.target, products, out).await?;

    if !settings.verify {
        return Ok(());
    }

    match read_featured_products(store, &settings.target, out).await? {
        Some(stored) => {
            info!(stored = stored.len(), "Verified featured products");
            Ok(())
        }
        None => Err(SeedError::Missing(settings.target.to_string())),
    }
}

fn render_saved(products: &[Product], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "✅ Featured products saved successfully!")?;
    writeln!(out, "📦 Total products: {}", products.len())?;
    for product in products {
        writeln!(out, "  - {} (₹{})", product.name, product.price)?;
    }
    Ok(())
}

fn render_read_back(products: &[Product], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n📖 Reading back featured products:")?;
    writeln!(out, "Total products: {}", products.len())?;
    for product in products {
        writeln!(
            out,
            "  - {} | {} | ₹{}",
            product.name, product.category, product.price
        )?;
    }
    Ok(())
}
