// src/models/mod.rs

//! Domain models for the scraper.

mod config;
mod video;

// Re-export all public types
pub use config::{ClientConfig, Config, LoggingConfig};
pub use video::{RATING_SENTINELS, VideoInfo};
