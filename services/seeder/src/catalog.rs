use thapasya_core::{Fields, FromFields, StoreError, ToFields, Value};
use thapasya_links::convert_link;
use tracing::warn;

/// A product shown in the storefront's featured section
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Price in whole rupees
    pub price: i64,
    pub rating: f64,
    /// Image URL; may still be a Drive share link
    pub image: String,
    pub in_stock: bool,
    pub description: String,
}

impl ToFields for Product {
    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("category", self.category.as_str())
            .with("price", self.price)
            .with("rating", self.rating)
            .with("image", self.image.as_str())
            .with("inStock", self.in_stock)
            .with("description", self.description.as_str())
    }
}

impl FromFields for Product {
    fn from_fields(fields: &Fields) -> Result<Self, StoreError> {
        Ok(Self {
            id: fields.require("id", Value::as_i64, "integer")?,
            name: fields.require("name", Value::as_str, "string")?.to_string(),
            category: fields.require("category", Value::as_str, "string")?.to_string(),
            price: fields.require("price", Value::as_i64, "integer")?,
            rating: fields.require("rating", Value::as_f64, "number")?,
            image: fields
                .get("image")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            in_stock: fields.get("inStock").and_then(Value::as_bool).unwrap_or(true),
            description: fields
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Body of the featured products document: `{ products: [...] }`
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedCatalog {
    pub products: Vec<Product>,
}

impl ToFields for FeaturedCatalog {
    fn to_fields(&self) -> Fields {
        let products = self
            .products
            .iter()
            .map(|p| Value::from(p.to_fields()))
            .collect::<Vec<_>>();
        Fields::new().with("products", products)
    }
}

impl FromFields for FeaturedCatalog {
    fn from_fields(fields: &Fields) -> Result<Self, StoreError> {
        let products = fields
            .get("products")
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .map(|value| {
                value
                    .as_map()
                    .ok_or_else(|| StoreError::Decode("product entry is not a map".to_string()))
                    .and_then(Product::from_fields)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { products })
    }
}

fn product(
    id: i64,
    name: &str,
    category: &str,
    price: i64,
    rating: f64,
    image: &str,
    description: &str,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        price,
        rating,
        image: image.to_string(),
        in_stock: true,
        description: description.to_string(),
    }
}

const KUNDAN_IMAGE: &str =
    "https://drive.google.com/file/d/18pMwmGDFxcC03z9XR8D48DUjY_yLxr78/view?usp=drive_link";
const GLASS_IMAGE: &str =
    "https://drive.google.com/file/d/1eWuHxr7kup1H_t5GmMM6TC6kMLbvyC2K/view?usp=drive_link";
const PEARL_IMAGE: &str =
    "https://drive.google.com/file/d/1D7sdyYxnENum6u60rWo0Mm4yntN5o4jD/view?usp=drive_link";

/// The fixed featured product set
pub fn featured_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Royal Kundan Bangles Set",
            "Kundan Bangles",
            1299,
            4.8,
            KUNDAN_IMAGE,
            "Exquisite royal kundan bangles with intricate gold work and traditional craftsmanship.",
        ),
        product(
            2,
            "Traditional Glass Bangles",
            "Glass Bangles",
            299,
            4.6,
            GLASS_IMAGE,
            "Colorful traditional glass bangles perfect for festivals and daily wear.",
        ),
        product(
            3,
            "Designer Pearl Bangles",
            "Designer",
            899,
            4.9,
            PEARL_IMAGE,
            "Elegant designer bangles with pearl accents and modern styling.",
        ),
        product(
            4,
            "Bridal Gold Bangles",
            "Bridal",
            2499,
            4.7,
            KUNDAN_IMAGE,
            "Premium bridal collection with intricate gold work and gemstone details.",
        ),
        product(
            5,
            "Antique Silver Bangles",
            "Traditional",
            799,
            4.5,
            GLASS_IMAGE,
            "Antique finish silver bangles with traditional motifs and patterns.",
        ),
        product(
            6,
            "Modern Minimalist Set",
            "Designer",
            599,
            4.4,
            PEARL_IMAGE,
            "Contemporary minimalist bangles for the modern woman.",
        ),
        product(
            7,
            "Lacquer Work Bangles",
            "Traditional",
            499,
            4.3,
            KUNDAN_IMAGE,
            "Beautiful lacquer work bangles with traditional art forms.",
        ),
        product(
            8,
            "Pearl & Stone Bangles",
            "Designer",
            1199,
            4.7,
            GLASS_IMAGE,
            "Elegant combination of pearls and semi-precious stones.",
        ),
    ]
}

/// Rewrite share-link images into direct-view URLs.
///
/// Images that are not recognizable Drive links are left as they are.
pub fn with_direct_image_links(products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .map(|mut product| {
            match convert_link(&product.image) {
                Some(direct) => product.image = direct,
                None => warn!(
                    product_id = product.id,
                    image = %product.image,
                    "Image is not a Drive link, keeping it unchanged"
                ),
            }
            product
        })
        .collect()
}
