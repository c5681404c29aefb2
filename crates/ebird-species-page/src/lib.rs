//! eBird Species Page Scraper
//!
//! Fetches `https://ebird.org/species/{code}` and extracts the short
//! identification paragraph (size, shape, pattern, habitat) the page
//! publishes in its description metadata.

mod client;
mod error;

pub use client::{extract_id_info, SpeciesPageClient};
pub use error::{Result, SpeciesPageError};
