//! Live/deleted classification of a re-fetched post.

use serde::{Deserialize, Serialize};

use crate::error::FetchResult;
use crate::pipeline::markup;
use crate::types::page::Page;

/// Text the board shows in place of removed titles or bodies.
pub const DELETION_SENTINELS: &[&str] = &["[deleted]", "[removed]"];

/// State of a tracked post after a re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Still up; nothing to do
    Live,
    /// Gone or replaced by a sentinel; audit and stop tracking
    Deleted,
    /// Could not tell (transport failure); keep tracking and retry
    Inconclusive,
}

impl PostStatus {
    pub fn is_deleted(self) -> bool {
        self == Self::Deleted
    }
}

/// Trim and case-fold text before sentinel comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Classify already-normalized title or body text.
///
/// Empty text counts as deleted; callers decide whether an empty value
/// is meaningful for the field they pass.
pub fn classify_text(normalized: &str) -> PostStatus {
    if normalized.is_empty() || DELETION_SENTINELS.contains(&normalized) {
        PostStatus::Deleted
    } else {
        PostStatus::Live
    }
}

/// Classify a successfully fetched post page.
///
/// A page without a title link, or whose title or body is a sentinel, is
/// deleted. A body element whose text is empty is deleted too; a page with
/// no body element at all (link posts) is judged by its title alone.
pub fn classify_page(page: &Page) -> PostStatus {
    if !page.is_success() {
        return PostStatus::Deleted;
    }

    let document = page.document();

    let title = markup::title_text(&document).unwrap_or_default();
    if classify_text(&normalize(&title)).is_deleted() {
        return PostStatus::Deleted;
    }

    match markup::body_text(&document) {
        Some(body) => classify_text(&normalize(&body)),
        None => PostStatus::Live,
    }
}

/// Classify the outcome of a re-fetch.
///
/// A definitive non-success answer from the server means deleted; a
/// transport failure says nothing about the post and is inconclusive.
pub fn classify_fetch(result: &FetchResult<Page>) -> PostStatus {
    match result {
        Ok(page) => classify_page(page),
        Err(e) if e.is_status() => PostStatus::Deleted,
        Err(_) => PostStatus::Inconclusive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn post_page(title: &str, body: Option<&str>) -> Page {
        let body = body
            .map(|b| format!(r#"<div class="usertext-body"><div class="md"><p>{}</p></div></div>"#, b))
            .unwrap_or_default();
        Page::new(
            "https://old.reddit.com/r/test/comments/a/",
            format!(
                r#"<html><body><div class="thing"><a class="title">{}</a>{}</div></body></html>"#,
                title, body
            ),
        )
    }

    #[test]
    fn test_classify_text_table() {
        let cases = [
            ("", PostStatus::Deleted),
            ("[deleted]", PostStatus::Deleted),
            ("[removed]", PostStatus::Deleted),
            ("deleted", PostStatus::Live),
            ("[deleted] by user", PostStatus::Live),
            ("hello", PostStatus::Live),
        ];
        for (text, expected) in cases {
            assert_eq!(classify_text(text), expected, "text {:?}", text);
        }
    }

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize("  [REMOVED]\n"), "[removed]");
        assert_eq!(classify_text(&normalize(" [Deleted] ")), PostStatus::Deleted);
    }

    #[test]
    fn test_removed_title_is_deleted() {
        let page = post_page("[removed]", Some("still here"));
        assert_eq!(classify_page(&page), PostStatus::Deleted);
    }

    #[test]
    fn test_sentinel_body_is_deleted() {
        assert_eq!(
            classify_page(&post_page("Title", Some("[deleted]"))),
            PostStatus::Deleted
        );
        assert_eq!(classify_page(&post_page("Title", Some("  "))), PostStatus::Deleted);
    }

    #[test]
    fn test_live_pages() {
        assert_eq!(
            classify_page(&post_page("Title", Some("Some text"))),
            PostStatus::Live
        );
        assert_eq!(classify_page(&post_page("Link post", None)), PostStatus::Live);
    }

    #[test]
    fn test_link_post_with_deleted_top_comment_is_live() {
        let page = Page::new(
            "https://old.reddit.com/r/test/comments/a/",
            r#"<html><body>
                 <div class="thing link"><div class="entry"><a class="title">A link</a></div></div>
                 <div class="commentarea">
                   <div class="thing comment"><div class="usertext-body"><p>[deleted]</p></div></div>
                 </div>
               </body></html>"#,
        );
        assert_eq!(classify_page(&page), PostStatus::Live);
    }

    #[test]
    fn test_missing_title_is_deleted() {
        let page = Page::new("https://example.com", "<html><body><p>Page not found</p></body></html>");
        assert_eq!(classify_page(&page), PostStatus::Deleted);
    }

    #[test]
    fn test_classify_fetch_outcomes() {
        let not_found: FetchResult<Page> = Err(FetchError::Status {
            url: "u".to_string(),
            status: 404,
        });
        let timeout: FetchResult<Page> = Err(FetchError::Timeout {
            url: "u".to_string(),
        });
        let network: FetchResult<Page> = Err(FetchError::network("u", "connection reset"));
        let live: FetchResult<Page> = Ok(post_page("Title", Some("Body")));

        assert_eq!(classify_fetch(&not_found), PostStatus::Deleted);
        assert_eq!(classify_fetch(&timeout), PostStatus::Inconclusive);
        assert_eq!(classify_fetch(&network), PostStatus::Inconclusive);
        assert_eq!(classify_fetch(&live), PostStatus::Live);
    }

    #[test]
    fn test_non_success_page_is_deleted() {
        let page = post_page("Title", Some("Body")).with_status(403);
        assert_eq!(classify_page(&page), PostStatus::Deleted);
    }
}
