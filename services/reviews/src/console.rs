//! Interactive review menu and batch generation.
//!
//! The console reads one answer per line from any `BufRead` and writes to
//! any `Write`, so the same code drives stdin/stdout and scripted tests.
//! End of input always means "stop": at the menu it exits, inside an action
//! it abandons the action.

use crate::error::ReviewError;
use crate::generator::{custom_review, ReviewGenerator};
use crate::review::{ProductReviews, Review, ReviewSummary};
use crate::store::ReviewStore;
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::{error, info};

const RULE_WIDTH: usize = 50;
const PREVIEW_CHARS: usize = 50;

/// What happened across a batch of products
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<(String, ReviewSummary)>,
    pub failed: Vec<(String, String)>,
}

/// Generate `per_product` reviews for every id and append them.
///
/// A failure on one product is printed and logged; the rest still run.
pub async fn generate_for_products<R: Rng>(
    reviews: &ReviewStore<'_>,
    generator: &mut ReviewGenerator<R>,
    product_ids: &[String],
    per_product: usize,
    out: &mut impl Write,
) -> io::Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();

    for product_id in product_ids {
        writeln!(out, "\n🎯 Generating reviews for product: {}", product_id)?;

        let batch = generator.generate(per_product);
        for review in &batch {
            print_preview(review, out)?;
        }

        match append_and_report(reviews, product_id, &batch, out).await? {
            Ok(summary) => outcome.succeeded.push((product_id.clone(), summary)),
            Err(e) => outcome.failed.push((product_id.clone(), e.to_string())),
        }
    }

    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Review generation finished"
    );
    Ok(outcome)
}

/// Append and print the outcome; the inner result is the append's own.
async fn append_and_report(
    reviews: &ReviewStore<'_>,
    product_id: &str,
    batch: &[Review],
    out: &mut impl Write,
) -> io::Result<Result<ReviewSummary, ReviewError>> {
    let result = reviews.append_reviews(product_id, batch).await;
    match &result {
        Ok(summary) => {
            writeln!(
                out,
                "✅ Added {} reviews to product {}",
                batch.len(),
                product_id
            )?;
            writeln!(
                out,
                "📊 Total reviews: {}, Average rating: {:.1}",
                summary.total_reviews, summary.average_rating
            )?;
        }
        Err(e) => {
            error!(product_id = %product_id, error = %e, "Failed to add reviews");
            writeln!(out, "❌ Error adding reviews to product {}: {}", product_id, e)?;
        }
    }
    Ok(result)
}

fn print_preview(review: &Review, out: &mut impl Write) -> io::Result<()> {
    let preview: String = review.review_text.chars().take(PREVIEW_CHARS).collect();
    writeln!(
        out,
        "   👤 {} - {}⭐ - {}...",
        review.customer_name, review.rating, preview
    )
}

/// Print a product's reviews the way the menu's "view" action shows them
pub fn render_reviews(
    product_id: &str,
    reviews: &ProductReviews,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "\n📊 Reviews for product {}:", product_id)?;
    writeln!(out, "Total Reviews: {}", reviews.summary.total_reviews)?;
    writeln!(out, "Average Rating: {:.1}⭐", reviews.summary.average_rating)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for (i, review) in reviews.reviews.iter().enumerate() {
        writeln!(
            out,
            "{}. {} ({})",
            i + 1,
            review.customer_name,
            review.customer_location
        )?;
        writeln!(out, "   Rating: {}⭐", review.rating)?;
        writeln!(out, "   Review: {}", review.review_text)?;
        writeln!(out, "   Date: {}", review.review_date.format("%Y-%m-%d"))?;
        writeln!(
            out,
            "   Verified: {}",
            if review.verified_purchase { "✅" } else { "❌" }
        )?;
        writeln!(out)?;
    }

    Ok(())
}

/// Menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AllProducts,
    SelectedProducts,
    CustomReview,
    ViewReviews,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AllProducts),
            "2" => Some(MenuChoice::SelectedProducts),
            "3" => Some(MenuChoice::CustomReview),
            "4" => Some(MenuChoice::ViewReviews),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// The interactive reviews manager
pub struct ReviewConsole<'a, I, O, R> {
    reviews: ReviewStore<'a>,
    generator: ReviewGenerator<R>,
    input: I,
    out: O,
}

impl<'a, I: BufRead, O: Write, R: Rng> ReviewConsole<'a, I, O, R> {
    pub fn new(reviews: ReviewStore<'a>, generator: ReviewGenerator<R>, input: I, out: O) -> Self {
        Self {
            reviews,
            generator,
            input,
            out,
        }
    }

    /// Give back the output, e.g. to inspect what a test session printed
    pub fn into_output(self) -> O {
        self.out
    }

    /// Show the menu until the operator exits or input ends
    pub async fn run(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "\n{}", rule)?;
        writeln!(self.out, "🎯 FIREBASE REVIEWS MANAGER")?;
        writeln!(self.out, "{}", rule)?;

        loop {
            self.print_options()?;

            let Some(answer) = self.prompt("\nEnter your choice (1-5): ")? else {
                writeln!(self.out, "\n👋 Exiting...")?;
                return Ok(());
            };

            match MenuChoice::parse(&answer) {
                Some(MenuChoice::AllProducts) => self.all_products().await?,
                Some(MenuChoice::SelectedProducts) => self.selected_products().await?,
                Some(MenuChoice::CustomReview) => self.custom_review().await?,
                Some(MenuChoice::ViewReviews) => self.view_reviews().await?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "👋 Exiting...")?;
                    return Ok(());
                }
                None => writeln!(self.out, "❌ Invalid choice. Please try again.")?,
            }
        }
    }

    fn print_options(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nOptions:")?;
        writeln!(self.out, "1. Add sample reviews to all products")?;
        writeln!(self.out, "2. Add sample reviews to specific products")?;
        writeln!(self.out, "3. Add custom review to specific product")?;
        writeln!(self.out, "4. View existing reviews for a product")?;
        writeln!(self.out, "5. Exit")
    }

    /// Trimmed answer, or `None` at end of input
    fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reviews-per-product answer; `None` when the action should be abandoned
    fn prompt_per_product(&mut self) -> io::Result<Option<usize>> {
        let default = self.reviews.settings().default_reviews_per_product;
        let question = format!(
            "Enter number of reviews per product (default {}): ",
            default
        );
        let Some(answer) = self.prompt(&question)? else {
            return Ok(None);
        };

        if answer.is_empty() {
            return Ok(Some(default));
        }
        match answer.parse::<usize>() {
            Ok(count) if count > 0 => Ok(Some(count)),
            _ => {
                writeln!(self.out, "❌ Invalid number of reviews: {}", answer)?;
                Ok(None)
            }
        }
    }

    async fn all_products(&mut self) -> io::Result<()> {
        let product_ids = match self.reviews.list_product_ids().await {
            Ok(ids) => {
                writeln!(self.out, "📦 Found {} products in database", ids.len())?;
                ids
            }
            Err(e) => {
                error!(error = %e, "Failed to list products");
                writeln!(self.out, "❌ Error fetching product IDs: {}", e)?;
                Vec::new()
            }
        };

        if product_ids.is_empty() {
            writeln!(self.out, "❌ No products found in database")?;
            return Ok(());
        }

        let Some(per_product) = self.prompt_per_product()? else {
            return Ok(());
        };
        generate_for_products(
            &self.reviews,
            &mut self.generator,
            &product_ids,
            per_product,
            &mut self.out,
        )
        .await?;
        Ok(())
    }

    async fn selected_products(&mut self) -> io::Result<()> {
        let Some(answer) = self.prompt("Enter product IDs (comma-separated): ")? else {
            return Ok(());
        };

        let product_ids: Vec<String> = answer
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if product_ids.is_empty() {
            writeln!(self.out, "❌ No product IDs provided")?;
            return Ok(());
        }

        let Some(per_product) = self.prompt_per_product()? else {
            return Ok(());
        };
        generate_for_products(
            &self.reviews,
            &mut self.generator,
            &product_ids,
            per_product,
            &mut self.out,
        )
        .await?;
        Ok(())
    }

    async fn custom_review(&mut self) -> io::Result<()> {
        let Some(product_id) = self.prompt("Enter product ID: ")? else {
            return Ok(());
        };
        let Some(customer_name) = self.prompt("Enter customer name: ")? else {
            return Ok(());
        };
        let Some(review_text) = self.prompt("Enter review text: ")? else {
            return Ok(());
        };
        let Some(rating) = self.prompt("Enter rating (1-5, default 5): ")? else {
            return Ok(());
        };

        let default_location = self.reviews.settings().default_location.clone();
        let question = format!("Enter location (default {}): ", default_location);
        let Some(location) = self.prompt(&question)? else {
            return Ok(());
        };
        let location = if location.is_empty() {
            default_location
        } else {
            location
        };

        if product_id.is_empty() || customer_name.is_empty() || review_text.is_empty() {
            writeln!(self.out, "❌ Please provide all required fields")?;
            return Ok(());
        }

        let rating = if rating.is_empty() {
            Some(5)
        } else {
            rating.parse::<u8>().ok()
        };
        let image = &self.reviews.settings().default_customer_image;
        let review = match rating
            .map(|rating| custom_review(&customer_name, &review_text, rating, &location, image))
        {
            Some(Ok(review)) => review,
            Some(Err(_)) | None => {
                writeln!(self.out, "❌ Rating must be a number between 1 and 5")?;
                return Ok(());
            }
        };

        let result = append_and_report(
            &self.reviews,
            &product_id,
            std::slice::from_ref(&review),
            &mut self.out,
        )
        .await?;
        if result.is_ok() {
            writeln!(self.out, "✅ Custom review added successfully!")?;
        }
        Ok(())
    }

    async fn view_reviews(&mut self) -> io::Result<()> {
        let Some(product_id) = self.prompt("Enter product ID: ")? else {
            return Ok(());
        };
        if product_id.is_empty() {
            writeln!(self.out, "❌ No product ID provided")?;
            return Ok(());
        }

        match self.reviews.load(&product_id).await {
            Ok(Some(reviews)) => render_reviews(&product_id, &reviews, &mut self.out),
            Ok(None) => writeln!(self.out, "❌ No reviews found for this product"),
            Err(e) => {
                error!(product_id = %product_id, error = %e, "Failed to fetch reviews");
                writeln!(self.out, "❌ Error fetching reviews: {}", e)
            }
        }
    }
}
