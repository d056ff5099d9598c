//! Listing page parser.
//!
//! Tag, search, latest and popular pages share one card-based layout.

use scraper::Html;

use crate::models::VideoInfo;
use crate::services::extractors::{Scope, extract_card};
use crate::utils::dom::{ClassContains, find_all};

const CARD: ClassContains<'static> = ClassContains::any(&["video", "thumb"]);

/// Extract one [`VideoInfo`] per card, in document order.
///
/// Cards without a resolvable `/video/` link are skipped. Duplicate ids are
/// kept as they appear.
pub fn parse_listing(html: &str, root_url: &str) -> Vec<VideoInfo> {
    let document = Html::parse_document(html);
    let mut videos = Vec::new();
    let mut skipped = 0usize;

    for card in find_all(document.root_element(), &["div"], &CARD) {
        match extract_card(&Scope::fragment(card), root_url) {
            Some(video) => videos.push(video),
            None => skipped += 1,
        }
    }

    log::debug!(
        "Parsed {} cards from listing ({} skipped)",
        videos.len(),
        skipped
    );
    videos
}
