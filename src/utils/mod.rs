//! Utility functions and helpers.

pub mod dom;
pub mod http;
pub mod url;

pub use http::{HttpFetcher, PageFetcher, create_async_client};
