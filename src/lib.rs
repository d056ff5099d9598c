// src/lib.rs

//! 3DPornDude scraper library
//!
//! Fetches pages from the site and turns them into [`models::VideoInfo`]
//! records: single-video lookup, tag and search listings, latest, popular
//! and random picks.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{Config, VideoInfo};
pub use services::{Catalog, VideoLookup};
