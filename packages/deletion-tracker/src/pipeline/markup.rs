//! Board markup: selectors and text helpers shared by the extractor and
//! the deletion classifier.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    /// One post in a listing; on a post page, the post and each comment
    pub static ref THING: Selector = Selector::parse("div.thing").unwrap();
    /// The submission itself on a post page
    pub static ref LINK_THING: Selector = Selector::parse("div.thing.link").unwrap();
    pub static ref TIME: Selector = Selector::parse("time").unwrap();
    pub static ref TITLE_LINK: Selector = Selector::parse("a.title").unwrap();
    pub static ref USERTEXT_BODY: Selector = Selector::parse("div.usertext-body").unwrap();
}

/// Class marking sponsored listing entries.
pub const PROMOTED_CLASS: &str = "promoted";

/// Visible text of an element: fragments trimmed, blanks dropped, joined
/// with single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The post's own node on a post page: the `div.thing.link` if present,
/// else the first `div.thing`. Comments and sidebar markup are outside it.
pub fn post_node(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&LINK_THING)
        .next()
        .or_else(|| document.select(&THING).next())
}

/// Nearest enclosing `div.thing` of an element.
fn owning_thing(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| THING.matches(ancestor))
}

/// Text of the post's title link, if any.
pub fn title_text(document: &Html) -> Option<String> {
    let post = post_node(document)?;
    post.select(&TITLE_LINK)
        .find(|title| owning_thing(*title).map(|t| t.id()) == Some(post.id()))
        .map(element_text)
}

/// Text of the post's own self-text body; `None` for link posts, even
/// when comments on the page carry bodies of their own.
pub fn body_text(document: &Html) -> Option<String> {
    let post = post_node(document)?;
    post.select(&USERTEXT_BODY)
        .find(|body| owning_thing(*body).map(|t| t.id()) == Some(post.id()))
        .map(element_text)
}
