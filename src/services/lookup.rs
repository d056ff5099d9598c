//! Single-video lookup.
//!
//! A [`VideoLookup`] is bound to one resolved video id. The detail page is
//! fetched at most once and parsed at most once per handle.

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::VideoInfo;
use crate::services::extractors::{Scope, extract_detail};
use crate::utils::http::PageFetcher;
use crate::utils::url::{resolve_video_id, video_url};

/// Whether a page body reads as a "not found" page.
///
/// The site often answers 200 for missing resources, so the body is checked
/// for both a "404" marker and a case-insensitive "not found".
pub fn looks_not_found(body: &str) -> bool {
    body.contains("404") && body.to_lowercase().contains("not found")
}

/// Lookup session for one video.
pub struct VideoLookup<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    video_id: String,
    url: String,
    body: Option<String>,
    info: Option<VideoInfo>,
}

impl<'a, F: PageFetcher + ?Sized> VideoLookup<'a, F> {
    /// Resolve a bare id or a full video URL against the site root.
    pub fn resolve(fetcher: &'a F, root_url: &str, identifier: &str) -> Result<Self> {
        let video_id = resolve_video_id(identifier)?;
        let url = video_url(root_url, &video_id);
        Ok(Self {
            fetcher,
            video_id,
            url,
            body: None,
            info: None,
        })
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Canonical detail page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the detail page, or return the memoized record.
    pub async fn get_info(&mut self) -> Result<&VideoInfo> {
        if self.info.is_none() {
            let body = match self.body.take() {
                Some(body) => body,
                None => self.fetcher.fetch(&self.url).await?,
            };
            let body: &str = self.body.insert(body);

            if looks_not_found(body) {
                return Err(AppError::NotFound(format!(
                    "video does not exist: {}",
                    self.video_id
                )));
            }

            let document = Html::parse_document(body);
            let info = extract_detail(&Scope::page(&document, body), &self.video_id, &self.url);
            log::debug!(
                "Parsed video {} ({} tags)",
                info.video_id,
                info.tags.len()
            );
            self.info = Some(info);
        }

        self.info
            .as_ref()
            .ok_or_else(|| AppError::NotFound(self.video_id.clone()))
    }

    pub async fn title(&mut self) -> Result<String> {
        Ok(self.get_info().await?.title.clone())
    }

    pub async fn thumbnail(&mut self) -> Result<String> {
        Ok(self.get_info().await?.thumbnail.clone())
    }

    pub async fn duration(&mut self) -> Result<String> {
        Ok(self.get_info().await?.duration.clone())
    }

    pub async fn views(&mut self) -> Result<String> {
        Ok(self.get_info().await?.views.clone())
    }

    pub async fn tags(&mut self) -> Result<Vec<String>> {
        Ok(self.get_info().await?.tags.clone())
    }

    /// Consume the handle, yielding the record.
    pub async fn into_info(mut self) -> Result<VideoInfo> {
        self.get_info().await?;
        self.info
            .ok_or_else(|| AppError::NotFound(self.video_id.clone()))
    }
}
