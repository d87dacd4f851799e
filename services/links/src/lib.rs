//! Google Drive link conversion
//!
//! Share links (`https://drive.google.com/file/d/<id>/view?...`) cannot be
//! used as an image source. This crate pulls the file id out of such links
//! and rewrites them into the direct-view form
//! `https://drive.google.com/uc?export=view&id=<id>`.
//!
//! # Example
//!
//! ```rust
//! use thapasya_links::{convert_link, convert_links};
//!
//! let url = convert_link("https://drive.google.com/file/d/18pMwmGDFxcC03z9XR8D48DUjY_yLxr78/view");
//! assert_eq!(
//!     url.as_deref(),
//!     Some("https://drive.google.com/uc?export=view&id=18pMwmGDFxcC03z9XR8D48DUjY_yLxr78")
//! );
//!
//! let batch = convert_links(["not a link"]);
//! assert_eq!(batch.failed, vec!["not a link"]);
//! ```

pub mod converter;

pub use converter::{
    convert_link, convert_links, direct_view_url, extract_file_id, Conversion, DIRECT_VIEW_PREFIX,
};
