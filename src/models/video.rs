//! Video metadata record.

use serde::{Deserialize, Serialize};

/// Rating values the site uses when it has no rating data.
pub const RATING_SENTINELS: [&str; 4] = ["-1", "-1%", "N/A", "0"];

/// Metadata of one video as extracted from a detail page or listing card.
///
/// Only `video_id` and `url` are guaranteed non-empty. Every other field
/// holds its default when the page did not carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoInfo {
    /// Site-assigned slug
    pub video_id: String,

    /// Canonical absolute URL of the detail page
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// Free-form duration, e.g. "12:34"
    #[serde(default)]
    pub duration: String,

    /// Absolute thumbnail URL
    #[serde(default)]
    pub thumbnail: String,

    /// Absolute animated preview URL
    #[serde(default)]
    pub preview: String,

    /// Free-form view count, may carry a K/M/B suffix
    #[serde(default)]
    pub views: String,

    /// Free-form rating, see [`RATING_SENTINELS`]
    #[serde(default)]
    pub rating: String,

    #[serde(default)]
    pub likes: u64,

    #[serde(default)]
    pub dislikes: u64,

    #[serde(default)]
    pub uploader: String,

    /// Relative ("3 days ago") or absolute upload date
    #[serde(default)]
    pub upload_date: String,

    /// De-duplicated tags in first-seen order
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: String,
}

impl VideoInfo {
    /// Create a record with only the identifying fields set.
    pub fn new(video_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Whether `rating` holds real rating data.
    pub fn has_rating(&self) -> bool {
        let rating = self.rating.trim();
        !rating.is_empty() && !RATING_SENTINELS.contains(&rating)
    }

    /// Title, or the video id when the page had none.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.video_id
        } else {
            &self.title
        }
    }

    /// Format the record using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{url}`, `{title}`, `{duration}`, `{views}`
    /// - `{rating}`, `{uploader}`, `{date}`, `{tags}` (comma separated)
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{id}", &self.video_id)
            .replace("{url}", &self.url)
            .replace("{title}", &self.title)
            .replace("{duration}", &self.duration)
            .replace("{views}", &self.views)
            .replace("{rating}", &self.rating)
            .replace("{uploader}", &self.uploader)
            .replace("{date}", &self.upload_date)
            .replace("{tags}", &self.tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_video() -> VideoInfo {
        VideoInfo {
            video_id: "foo-bar".to_string(),
            url: "https://3dporndude.com/video/foo-bar".to_string(),
            title: "Foo Bar".to_string(),
            duration: "12:34".to_string(),
            thumbnail: "https://cdn.example.com/foo.jpg".to_string(),
            preview: "https://cdn.example.com/foo.webm".to_string(),
            views: "1.2K".to_string(),
            rating: "93%".to_string(),
            likes: 120,
            dislikes: 8,
            uploader: "someone".to_string(),
            upload_date: "3 days ago".to_string(),
            tags: vec!["pov".to_string(), "anal".to_string()],
            description: "Desc".to_string(),
        }
    }

    #[test]
    fn test_fields_read_back_unchanged() {
        let video = sample_video();
        let copy = video.clone();
        assert_eq!(copy.video_id, "foo-bar");
        assert_eq!(copy.views, "1.2K");
        assert_eq!(copy.likes, 120);
        assert_eq!(copy.tags, vec!["pov", "anal"]);
        assert_eq!(copy, video);
    }

    #[test]
    fn test_rating_sentinels_mean_no_rating() {
        let mut video = sample_video();
        assert!(video.has_rating());
        for sentinel in RATING_SENTINELS {
            video.rating = sentinel.to_string();
            assert!(!video.has_rating(), "{sentinel} should count as no rating");
        }
        video.rating.clear();
        assert!(!video.has_rating());
    }

    #[test]
    fn test_format() {
        let video = sample_video();
        assert_eq!(
            video.format("{title} [{duration}] {tags}"),
            "Foo Bar [12:34] pov, anal"
        );
    }

    #[test]
    fn test_json_uses_single_field_layout() {
        let value = serde_json::to_value(sample_video()).unwrap();
        assert_eq!(value["video_id"], "foo-bar");
        assert_eq!(value["upload_date"], "3 days ago");
        assert_eq!(value["dislikes"], 8);

        let minimal: VideoInfo =
            serde_json::from_str(r#"{"video_id":"a","url":"https://x/video/a"}"#).unwrap();
        assert_eq!(minimal, VideoInfo::new("a", "https://x/video/a"));
    }

    #[test]
    fn test_display_title_falls_back_to_id() {
        let video = VideoInfo::new("abc", "https://x/video/abc");
        assert_eq!(video.display_title(), "abc");
    }
}
