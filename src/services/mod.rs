//! Service layer for the scraper.
//!
//! - Field extraction rules (`extractors`)
//! - Single-video lookup (`VideoLookup`)
//! - Listing page parsing (`parse_listing`)
//! - Catalog queries (`Catalog`)

pub mod catalog;
pub mod extractors;
pub mod listing;
pub mod lookup;
#[cfg(test)]
mod testing;

pub use catalog::{Catalog, fetch_video_info, search_videos};
pub use listing::parse_listing;
pub use lookup::VideoLookup;
