// src/utils/url.rs

//! Site URL construction and video id extraction.

use regex::Regex;
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::error::{AppError, Result};

/// Extract the path segment following `/video/`.
///
/// # Examples
/// ```
/// use porndude::utils::url::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://3dporndude.com/video/foo-bar/"),
///     Some("foo-bar".to_string())
/// );
/// assert_eq!(extract_video_id("/tag/pov"), None);
/// ```
pub fn extract_video_id(href: &str) -> Option<String> {
    Regex::new(r"/video/([^/?#]+)")
        .ok()?
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Turn user input (bare id or full URL) into a video id.
pub fn resolve_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::invalid_input("empty video identifier"));
    }
    if input.starts_with("http") {
        return extract_video_id(input)
            .ok_or_else(|| AppError::invalid_input(format!("not a video URL: {input}")));
    }
    Ok(input.to_string())
}

/// Resolve a potentially relative href against the site root.
pub fn resolve_url(root: &str, href: &str) -> String {
    Url::parse(root)
        .and_then(|base| base.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// `{root}/video/{id}`
pub fn video_url(root: &str, id: &str) -> String {
    format!("{root}/video/{id}")
}

/// `{root}/tag/{tag}[?page=N]`
pub fn tag_url(root: &str, tag: &str, page: u32) -> String {
    with_page(format!("{root}/tag/{tag}"), page)
}

/// `{root}/search?q={query}[&page=N]`, query form-encoded.
pub fn search_url(root: &str, query: &str, page: u32) -> String {
    let encoded: String = byte_serialize(query.as_bytes()).collect();
    with_page(format!("{root}/search?q={encoded}"), page)
}

/// Site root listing of newest videos.
pub fn latest_url(root: &str, page: u32) -> String {
    with_page(root.to_string(), page)
}

/// `{root}/most-viewed[?page=N]`
pub fn popular_url(root: &str, page: u32) -> String {
    with_page(format!("{root}/most-viewed"), page)
}

/// Append the page parameter for pages past the first.
fn with_page(url: String, page: u32) -> String {
    if page <= 1 {
        return url;
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}page={page}")
}
