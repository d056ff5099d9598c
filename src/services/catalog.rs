//! Catalog queries: tag, search, latest, popular and random listings.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::{AppError, Result};
use crate::models::{Config, VideoInfo};
use crate::services::listing::parse_listing;
use crate::services::lookup::{VideoLookup, looks_not_found};
use crate::utils::http::{HttpFetcher, PageFetcher};
use crate::utils::url::{latest_url, popular_url, search_url, tag_url};

/// Highest latest-listing page considered by [`Catalog::random_video`].
pub const RANDOM_PAGE_SPAN: u32 = 10;

/// Query surface over one site.
///
/// Holds no mutable state; concurrent queries share only the fetcher's
/// connection pool.
pub struct Catalog<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    root_url: String,
    tags: Vec<String>,
}

impl Catalog<HttpFetcher> {
    /// Build a catalog backed by a real HTTP client.
    pub fn new(config: &Config) -> Result<Self> {
        config.client.validate()?;
        let fetcher = HttpFetcher::new(&config.client)?;
        Ok(Self::with_fetcher(
            fetcher,
            config.client.root(),
            config.tags.clone(),
        ))
    }
}

impl<F: PageFetcher> Catalog<F> {
    pub fn with_fetcher(fetcher: F, root_url: &str, tags: Vec<String>) -> Self {
        Self {
            fetcher,
            root_url: root_url.trim_end_matches('/').to_string(),
            tags,
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Lookup handle for a video id or full video URL.
    pub fn video(&self, identifier: &str) -> Result<VideoLookup<'_, F>> {
        VideoLookup::resolve(&self.fetcher, &self.root_url, identifier)
    }

    /// Videos under a tag.
    pub async fn by_tag(&self, tag: &str, page: u32) -> Result<Vec<VideoInfo>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(AppError::invalid_input("empty tag"));
        }

        let body = self.fetcher.fetch(&tag_url(&self.root_url, tag, page)).await?;
        if looks_not_found(&body) {
            return Err(AppError::TagNotFound(tag.to_string()));
        }
        Ok(self.listing(&body))
    }

    /// Search results. An empty result is not an error.
    pub async fn search(&self, query: &str, page: u32) -> Result<Vec<VideoInfo>> {
        self.fetch_listing(&search_url(&self.root_url, query, page))
            .await
    }

    /// Newest videos, as listed on the site root.
    pub async fn latest(&self, page: u32) -> Result<Vec<VideoInfo>> {
        self.fetch_listing(&latest_url(&self.root_url, page)).await
    }

    /// Most viewed videos.
    pub async fn popular(&self, page: u32) -> Result<Vec<VideoInfo>> {
        self.fetch_listing(&popular_url(&self.root_url, page)).await
    }

    /// One random video using an OS-seeded generator.
    pub async fn random_video(&self) -> Result<VideoInfo> {
        let mut rng = StdRng::from_os_rng();
        self.random_video_with(&mut rng).await
    }

    /// One random video from a random latest-listing page.
    ///
    /// Falls back to page 1 once when the chosen page is empty.
    pub async fn random_video_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<VideoInfo> {
        let page = rng.random_range(1..=RANDOM_PAGE_SPAN);
        let mut videos = self.latest(page).await?;
        if videos.is_empty() {
            log::debug!("Latest page {} is empty, retrying page 1", page);
            videos = self.latest(1).await?;
        }

        videos
            .choose(rng)
            .cloned()
            .ok_or_else(|| AppError::NoResults("no videos available for random pick".into()))
    }

    /// Static list of well-known tags.
    pub fn available_tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    async fn fetch_listing(&self, url: &str) -> Result<Vec<VideoInfo>> {
        let body = self.fetcher.fetch(url).await?;
        Ok(self.listing(&body))
    }

    fn listing(&self, body: &str) -> Vec<VideoInfo> {
        parse_listing(body, &self.root_url)
    }
}

fn one_shot_config(proxy: Option<&str>) -> Config {
    let mut config = Config::default();
    config.client.proxy = proxy.map(str::to_string);
    config
}

/// Fetch one video's metadata with a throwaway client.
pub async fn fetch_video_info(identifier: &str, proxy: Option<&str>) -> Result<VideoInfo> {
    let catalog = Catalog::new(&one_shot_config(proxy))?;
    catalog.video(identifier)?.into_info().await
}

/// Run one search with a throwaway client.
pub async fn search_videos(query: &str, page: u32, proxy: Option<&str>) -> Result<Vec<VideoInfo>> {
    let catalog = Catalog::new(&one_shot_config(proxy))?;
    catalog.search(query, page).await
}
