//! Per-field extraction rules.
//!
//! Every field has an ordered chain of rules. Rules are pure functions over a
//! [`Scope`]; the first one producing a non-empty value wins and a field
//! with no winning rule keeps its default.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::models::VideoInfo;
use crate::utils::dom::{
    self, AttrContains, ClassContains, ElementMatcher, HasAttr, attr_of, find_all, find_first,
    meta_property, text_of,
};
use crate::utils::url::{extract_video_id, resolve_url};

/// Region of a document that rules run against.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    /// Element whose descendants are searched
    pub root: ElementRef<'a>,
    /// Raw page source, for the regex fallbacks (detail pages only)
    pub raw: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn page(document: &'a Html, raw: &'a str) -> Self {
        Self {
            root: document.root_element(),
            raw: Some(raw),
        }
    }

    pub fn fragment(root: ElementRef<'a>) -> Self {
        Self { root, raw: None }
    }

    fn first_text<M: ElementMatcher + ?Sized>(&self, tags: &[&str], matcher: &M) -> Option<String> {
        find_first(self.root, tags, matcher)
            .map(text_of)
            .filter(|t| !t.is_empty())
    }
}

/// A single extraction rule.
pub type Rule = fn(&Scope<'_>) -> Option<String>;

/// Evaluate rules in order, returning the first non-empty result.
pub fn first_match(rules: &[Rule], scope: &Scope<'_>) -> String {
    rules
        .iter()
        .find_map(|rule| rule(scope).filter(|v| !v.trim().is_empty()))
        .unwrap_or_default()
}

// --- Matchers ---

const TITLE: ClassContains<'static> = ClassContains::any(&["title"]);
const DURATION: ClassContains<'static> = ClassContains::any(&["duration"]);
const PLAYER: ClassContains<'static> = ClassContains::any(&["player"]);
const VIEWS: ClassContains<'static> = ClassContains::any(&["views"]);
const RATING: ClassContains<'static> = ClassContains::any(&["rating", "like"]);
const CARD_RATING: ClassContains<'static> = ClassContains::any(&["rating", "percent"]);
const LIKES: ClassContains<'static> = ClassContains::any(&["like"]).excluding(&["dis"]);
const DISLIKES: ClassContains<'static> = ClassContains::any(&["dislike"]);
const UPLOADER_CLASS: ClassContains<'static> =
    ClassContains::any(&["creator", "uploader", "channel"]);
const DATE: ClassContains<'static> = ClassContains::any(&["date", "time", "ago"]);
const CARD_DATE: ClassContains<'static> = ClassContains::any(&["date", "ago"]);
const DESCRIPTION: ClassContains<'static> = ClassContains::any(&["description", "desc"]);
const PREVIEW: HasAttr<'static> = HasAttr("data-preview");
const UPLOADER_LINK: AttrContains<'static> = AttrContains {
    attr: "href",
    needles: &["/creator/", "/channel/", "/uploader/"],
};
const CARD_UPLOADER_LINK: AttrContains<'static> = AttrContains {
    attr: "href",
    needles: &["/creator/", "/channel/"],
};
const TAG_LINK: AttrContains<'static> = AttrContains {
    attr: "href",
    needles: &["/tag/"],
};
const VIDEO_LINK: AttrContains<'static> = AttrContains {
    attr: "href",
    needles: &["/video/"],
};

// --- Detail page rule tables ---

pub const TITLE_RULES: &[Rule] = &[title_heading, title_og, title_tag];
pub const DURATION_RULES: &[Rule] = &[duration_span, duration_in_source];
pub const THUMBNAIL_RULES: &[Rule] = &[thumbnail_og, thumbnail_player];
pub const PREVIEW_RULES: &[Rule] = &[preview_attr];
pub const VIEWS_RULES: &[Rule] = &[views_span, views_in_source];
pub const RATING_RULES: &[Rule] = &[rating_span];
pub const UPLOADER_RULES: &[Rule] = &[uploader_link, uploader_class];
pub const UPLOAD_DATE_RULES: &[Rule] = &[date_span];
pub const DESCRIPTION_RULES: &[Rule] = &[description_div];

// --- Listing card rule tables ---

pub const CARD_TITLE_RULES: &[Rule] = &[card_title_element, card_link_title, card_link_text];
pub const CARD_THUMBNAIL_RULES: &[Rule] = &[card_image];
pub const CARD_DURATION_RULES: &[Rule] = &[duration_span];
pub const CARD_VIEWS_RULES: &[Rule] = &[views_span];
pub const CARD_RATING_RULES: &[Rule] = &[card_rating_span];
pub const CARD_UPLOADER_RULES: &[Rule] = &[card_uploader_link];
pub const CARD_UPLOAD_DATE_RULES: &[Rule] = &[card_date_span];

fn title_heading(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["h1"], &TITLE)
}

fn title_og(scope: &Scope<'_>) -> Option<String> {
    meta_property(scope.root, "og:title").map(str::to_string)
}

/// `<title>` text with the trailing " - Site Name" removed.
fn title_tag(scope: &Scope<'_>) -> Option<String> {
    let title = scope.first_text(&["title"], &dom::Any)?;
    let title = match title.rsplit_once(" - ") {
        Some((head, _)) => head.trim().to_string(),
        None => title,
    };
    Some(title)
}

fn duration_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &DURATION)
}

fn duration_in_source(scope: &Scope<'_>) -> Option<String> {
    let raw = scope.raw?;
    let pattern = Regex::new(r"(\d+:\d+(?::\d+)?)").ok()?;
    pattern.captures(raw).map(|caps| caps[1].to_string())
}

fn thumbnail_og(scope: &Scope<'_>) -> Option<String> {
    meta_property(scope.root, "og:image").map(str::to_string)
}

fn thumbnail_player(scope: &Scope<'_>) -> Option<String> {
    let player = find_first(scope.root, &["div"], &PLAYER)?;
    let img = find_first(player, &["img"], &dom::Any)?;
    image_source(img, &["src", "data-src"])
}

fn preview_attr(scope: &Scope<'_>) -> Option<String> {
    find_first(scope.root, &[], &PREVIEW)
        .and_then(|el| attr_of(el, "data-preview"))
        .map(str::to_string)
}

fn views_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &VIEWS)
}

fn views_in_source(scope: &Scope<'_>) -> Option<String> {
    let raw = scope.raw?;
    let pattern = Regex::new(r"(?i)([\d,.]+[KMB]?)\s*(?:views?|播放)").ok()?;
    pattern.captures(raw).map(|caps| caps[1].to_string())
}

fn rating_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &RATING)
}

fn uploader_link(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["a"], &UPLOADER_LINK)
}

fn uploader_class(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&[], &UPLOADER_CLASS)
}

fn date_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &DATE)
}

fn description_div(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["div"], &DESCRIPTION)
}

fn card_title_element(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["h2", "h3", "h4", "span", "a"], &TITLE)
}

fn card_link_title(scope: &Scope<'_>) -> Option<String> {
    let link = find_first(scope.root, &["a"], &VIDEO_LINK)?;
    attr_of(link, "title").map(str::to_string)
}

fn card_link_text(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["a"], &VIDEO_LINK)
}

fn card_image(scope: &Scope<'_>) -> Option<String> {
    let img = find_first(scope.root, &["img"], &dom::Any)?;
    image_source(img, &["src", "data-src", "data-lazy-src"])
}

fn card_rating_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &CARD_RATING)
}

fn card_uploader_link(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["a"], &CARD_UPLOADER_LINK)
}

fn card_date_span(scope: &Scope<'_>) -> Option<String> {
    scope.first_text(&["span"], &CARD_DATE)
}

/// First non-empty attribute among `attrs`.
fn image_source(img: ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .find_map(|name| attr_of(img, name))
        .map(str::to_string)
}

/// First run of digits in the text of the first matching span.
fn span_count(scope: &Scope<'_>, matcher: &ClassContains<'_>) -> u64 {
    let Some(text) = scope.first_text(&["span"], matcher) else {
        return 0;
    };
    Regex::new(r"\d+")
        .ok()
        .and_then(|re| re.find(&text).and_then(|m| m.as_str().parse().ok()))
        .unwrap_or(0)
}

/// Texts of all `/tag/` links, de-duplicated in first-seen order.
pub fn extract_tags(scope: &Scope<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    find_all(scope.root, &["a"], &TAG_LINK)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Run every detail-page rule against a parsed detail page.
pub fn extract_detail(scope: &Scope<'_>, video_id: &str, url: &str) -> VideoInfo {
    VideoInfo {
        video_id: video_id.to_string(),
        url: url.to_string(),
        title: first_match(TITLE_RULES, scope),
        duration: first_match(DURATION_RULES, scope),
        thumbnail: first_match(THUMBNAIL_RULES, scope),
        preview: first_match(PREVIEW_RULES, scope),
        views: first_match(VIEWS_RULES, scope),
        rating: first_match(RATING_RULES, scope),
        likes: span_count(scope, &LIKES),
        dislikes: span_count(scope, &DISLIKES),
        uploader: first_match(UPLOADER_RULES, scope),
        upload_date: first_match(UPLOAD_DATE_RULES, scope),
        tags: extract_tags(scope),
        description: first_match(DESCRIPTION_RULES, scope),
    }
}

/// Run the reduced card rule set against one listing card.
///
/// Returns `None` when the card has no `/video/` link with a resolvable id.
pub fn extract_card(scope: &Scope<'_>, root_url: &str) -> Option<VideoInfo> {
    let link = find_first(scope.root, &["a"], &VIDEO_LINK)?;
    let href = link.value().attr("href")?;
    let video_id = extract_video_id(href)?;

    Some(VideoInfo {
        url: resolve_url(root_url, href),
        video_id,
        title: first_match(CARD_TITLE_RULES, scope),
        duration: first_match(CARD_DURATION_RULES, scope),
        thumbnail: first_match(CARD_THUMBNAIL_RULES, scope),
        preview: first_match(PREVIEW_RULES, scope),
        views: first_match(CARD_VIEWS_RULES, scope),
        rating: first_match(CARD_RATING_RULES, scope),
        uploader: first_match(CARD_UPLOADER_RULES, scope),
        upload_date: first_match(CARD_UPLOAD_DATE_RULES, scope),
        ..VideoInfo::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rules: &[Rule], html: &str) -> String {
        let doc = Html::parse_document(html);
        first_match(rules, &Scope::page(&doc, html))
    }

    #[test]
    fn title_prefers_heading_then_og_then_title_tag() {
        let both = r#"<html><head><meta property="og:title" content="OG"><title>T - Site</title></head>
            <body><h1 class="video-title">Heading</h1></body></html>"#;
        assert_eq!(run(TITLE_RULES, both), "Heading");

        let og_only = r#"<html><head><meta property="og:title" content="OG Title - Keeps Dash">
            <title>T - Site</title></head><body><h1>plain</h1></body></html>"#;
        assert_eq!(run(TITLE_RULES, og_only), "OG Title - Keeps Dash");

        let tag_only = "<html><head><title>A - B - 3DPornDude</title></head></html>";
        assert_eq!(run(TITLE_RULES, tag_only), "A - B");
    }

    #[test]
    fn duration_falls_back_to_source_pattern() {
        let span = r#"<span class="video-duration"> 12:34 </span><p>1:02:03</p>"#;
        assert_eq!(run(DURATION_RULES, span), "12:34");

        let source = r#"<div data-len="x">Length 1:02:03 total</div>"#;
        assert_eq!(run(DURATION_RULES, source), "1:02:03");

        assert_eq!(run(DURATION_RULES, "<p>no time here</p>"), "");
    }

    #[test]
    fn thumbnail_prefers_og_image_then_player_image() {
        let og = r#"<head><meta property="og:image" content="https://cdn/og.jpg"></head>
            <div class="player"><img src="https://cdn/p.jpg"></div>"#;
        assert_eq!(run(THUMBNAIL_RULES, og), "https://cdn/og.jpg");

        let lazy = r#"<div class="video-player"><img data-src="https://cdn/lazy.jpg"></div>"#;
        assert_eq!(run(THUMBNAIL_RULES, lazy), "https://cdn/lazy.jpg");

        let outside = r#"<img src="https://cdn/logo.png"><div class="player"></div>"#;
        assert_eq!(run(THUMBNAIL_RULES, outside), "");
    }

    #[test]
    fn views_falls_back_to_source_pattern() {
        assert_eq!(run(VIEWS_RULES, r#"<span class="views">1.5M</span>"#), "1.5M");
        assert_eq!(run(VIEWS_RULES, "<p>Seen 12,345 Views so far</p>"), "12,345");
        assert_eq!(run(VIEWS_RULES, "<p>3.2K 播放</p>"), "3.2K");
    }

    #[test]
    fn likes_and_dislikes_take_first_integer() {
        let html = r#"<span class="dislikes">7 down</span><span class="likes-count">about 42 up</span>"#;
        let doc = Html::parse_document(html);
        let scope = Scope::page(&doc, html);
        assert_eq!(span_count(&scope, &LIKES), 42);
        assert_eq!(span_count(&scope, &DISLIKES), 7);

        let empty = Html::parse_document(r#"<span class="likes">none</span>"#);
        assert_eq!(span_count(&Scope::page(&empty, ""), &LIKES), 0);
    }

    #[test]
    fn inline_markup_inside_fields_is_not_split() {
        let html = r#"<html><body>
            <span class="views">1.2<small>K</small></span>
            <span class="duration">12<span>:</span>34</span>
            <span class="likes">1<b>2</b>3</span>
            <div class="description"> A short <b>description</b>. </div>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let info = extract_detail(
            &Scope::page(&doc, html),
            "inline",
            "https://3dporndude.com/video/inline",
        );
        assert_eq!(info.views, "1.2K");
        assert_eq!(info.duration, "12:34");
        assert_eq!(info.likes, 123);
        assert_eq!(info.description, "A short description.");
    }

    #[test]
    fn uploader_prefers_profile_link() {
        let html = r#"<div class="channel-box">Box Text</div><a href="/creator/jane/">Jane</a>"#;
        assert_eq!(run(UPLOADER_RULES, html), "Jane");
        assert_eq!(
            run(UPLOADER_RULES, r#"<p class="uploader-name">Anon Studio</p>"#),
            "Anon Studio"
        );
    }

    #[test]
    fn tags_are_deduplicated_in_first_seen_order() {
        let html = r#"<a href="/tag/pov/">POV</a><a href="/tag/anal/">Anal</a>
            <a href="https://3dporndude.com/tag/pov/">POV</a><a href="/tag/empty/"> </a>
            <a href="/video/x/">Not a tag</a>"#;
        let doc = Html::parse_document(html);
        assert_eq!(extract_tags(&Scope::page(&doc, html)), vec!["POV", "Anal"]);
    }

    #[test]
    fn detail_extraction_leaves_missing_fields_empty() {
        let html = r#"<html><head><title>Only Title - 3DPornDude</title></head><body></body></html>"#;
        let doc = Html::parse_document(html);
        let info = extract_detail(
            &Scope::page(&doc, html),
            "only",
            "https://3dporndude.com/video/only",
        );
        assert_eq!(info.title, "Only Title");
        assert_eq!(info.video_id, "only");
        assert!(info.thumbnail.is_empty());
        assert!(info.tags.is_empty());
        assert_eq!(info.likes, 0);
    }

    #[test]
    fn card_without_image_has_empty_thumbnail() {
        let html = r#"<div class="video-item">
            <a href="/video/no-img/" title="Linked Title">x</a>
            <span class="duration">5:00</span>
            <span class="rating-percent">88%</span>
            <span class="added-ago">2 days ago</span>
            <a href="/channel/studio/">Studio</a>
        </div>"#;
        let doc = Html::parse_fragment(html);
        let card = find_first(doc.root_element(), &["div"], &dom::Any).unwrap();
        let info = extract_card(&Scope::fragment(card), "https://3dporndude.com").unwrap();

        assert_eq!(info.video_id, "no-img");
        assert_eq!(info.url, "https://3dporndude.com/video/no-img/");
        assert_eq!(info.title, "Linked Title");
        assert_eq!(info.thumbnail, "");
        assert_eq!(info.duration, "5:00");
        assert_eq!(info.rating, "88%");
        assert_eq!(info.upload_date, "2 days ago");
        assert_eq!(info.uploader, "Studio");
    }

    #[test]
    fn card_without_video_link_is_rejected() {
        let doc = Html::parse_fragment(r#"<div class="thumb"><a href="/tag/pov/">POV</a></div>"#);
        let card = find_first(doc.root_element(), &["div"], &dom::Any).unwrap();
        assert!(extract_card(&Scope::fragment(card), "https://3dporndude.com").is_none());
    }
}
