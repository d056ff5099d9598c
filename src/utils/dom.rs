// src/utils/dom.rs

//! Tree queries over parsed HTML.
//!
//! The site's markup uses loosely consistent class names (`video-title-xl`,
//! `thumb-block`, `rating-percent`, ...), so lookups go through
//! [`ElementMatcher`] predicates instead of fixed CSS selectors.

use scraper::ElementRef;

/// Predicate over a single element.
pub trait ElementMatcher {
    fn matches(&self, element: &ElementRef<'_>) -> bool;
}

/// Matches when one of the element's class tokens contains a needle.
///
/// Comparison is case-insensitive and per whitespace-delimited token; a
/// token that contains any excluded fragment never matches.
#[derive(Debug, Clone, Copy)]
pub struct ClassContains<'a> {
    needles: &'a [&'a str],
    excluded: &'a [&'a str],
}

impl<'a> ClassContains<'a> {
    pub const fn any(needles: &'a [&'a str]) -> Self {
        Self {
            needles,
            excluded: &[],
        }
    }

    pub const fn excluding(self, excluded: &'a [&'a str]) -> Self {
        Self {
            needles: self.needles,
            excluded,
        }
    }

    /// Test a single class token.
    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.needles.iter().any(|n| token.contains(n))
            && !self.excluded.iter().any(|x| token.contains(x))
    }
}

impl ElementMatcher for ClassContains<'_> {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().classes().any(|c| self.matches_token(c))
    }
}

/// Matches when an attribute value contains any of the given substrings.
#[derive(Debug, Clone, Copy)]
pub struct AttrContains<'a> {
    pub attr: &'a str,
    pub needles: &'a [&'a str],
}

impl ElementMatcher for AttrContains<'_> {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element
            .value()
            .attr(self.attr)
            .is_some_and(|v| self.needles.iter().any(|n| v.contains(n)))
    }
}

/// Matches when an attribute equals a value exactly.
#[derive(Debug, Clone, Copy)]
pub struct AttrEquals<'a> {
    pub attr: &'a str,
    pub value: &'a str,
}

impl ElementMatcher for AttrEquals<'_> {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().attr(self.attr) == Some(self.value)
    }
}

/// Matches when the element carries the attribute at all.
#[derive(Debug, Clone, Copy)]
pub struct HasAttr<'a>(pub &'a str);

impl ElementMatcher for HasAttr<'_> {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        element.value().attr(self.0).is_some()
    }
}

/// Matches every element.
#[derive(Debug, Clone, Copy)]
pub struct Any;

impl ElementMatcher for Any {
    fn matches(&self, _element: &ElementRef<'_>) -> bool {
        true
    }
}

/// All descendants of `scope` (excluding `scope` itself) whose tag is in
/// `tags` and that satisfy `matcher`. An empty `tags` slice allows any tag.
pub fn find_all<'a, 'm, M>(
    scope: ElementRef<'a>,
    tags: &'m [&'m str],
    matcher: &'m M,
) -> impl Iterator<Item = ElementRef<'a>> + 'm
where
    M: ElementMatcher + ?Sized,
    'a: 'm,
{
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| tags.is_empty() || tags.contains(&el.value().name()))
        .filter(move |el| matcher.matches(el))
}

/// First element in document order matching `tags` and `matcher`.
pub fn find_first<'a, M>(scope: ElementRef<'a>, tags: &[&str], matcher: &M) -> Option<ElementRef<'a>>
where
    M: ElementMatcher + ?Sized,
{
    find_all(scope, tags, matcher).next()
}

/// Whether any element matches.
pub fn exists<M>(scope: ElementRef<'_>, tags: &[&str], matcher: &M) -> bool
where
    M: ElementMatcher + ?Sized,
{
    find_first(scope, tags, matcher).is_some()
}

/// Text content of an element and its descendants, whitespace-normalized.
///
/// Text nodes are joined as-is before collapsing, so inline markup such as
/// `1.2<small>K</small>` reads as `1.2K`.
pub fn text_of(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, non-empty attribute value.
pub fn attr_of<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Content of the first `<meta property="...">` tag.
pub fn meta_property<'a>(scope: ElementRef<'a>, property: &str) -> Option<&'a str> {
    let matcher = AttrEquals {
        attr: "property",
        value: property,
    };
    find_first(scope, &["meta"], &matcher).and_then(|m| attr_of(m, "content"))
}
