//! Multi-page feed retrieval.
//!
//! Feeds such as crawl issues are split over several documents chained with
//! `<link rel="next" href="..."/>`. [`walk_pages`] follows those links and
//! returns every entry as one ordered list.

use roxmltree::Document;

use crate::error::{GDataError, Result};
use crate::normalize::{flatten, NormalizedRecord};
use crate::xml::find_children;

/// Relation value that marks the following page.
pub const NEXT_REL: &str = "next";

/// A navigation link of a feed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub rel: String,
    pub href: String,
}

/// Entries and navigation links of one fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub entries: Vec<NormalizedRecord>,
    pub links: Vec<PageLink>,
}

impl FeedPage {
    /// Parse a feed document.
    ///
    /// Every `entry` child of the root is flattened. Every `link` child with
    /// both `rel` and `href` becomes a [`PageLink`].
    ///
    /// # Errors
    /// `MalformedDocument` when `xml` does not parse.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        let entries = find_children(root, "entry").map(flatten).collect();

        let links = find_children(root, "link")
            .filter_map(|link| {
                let link = flatten(link);
                Some(PageLink {
                    rel: link.get_str("rel")?.to_string(),
                    href: link.get_str("href")?.to_string(),
                })
            })
            .collect();

        Ok(Self { entries, links })
    }

    /// Targets of the `rel="next"` links, in document order.
    pub fn next_links(&self) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .filter(|link| link.rel == NEXT_REL)
            .map(|link| link.href.as_str())
    }
}

/// Limits applied to a pagination walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum number of pages to fetch; `None` follows links indefinitely.
    pub max_pages: Option<usize>,
}

impl WalkOptions {
    pub fn with_max_pages(max_pages: usize) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }
}

/// Fetch `start_url` and every page reachable through `rel="next"` links.
///
/// `fetch` returns the body of a successful response; status handling belongs
/// to the caller. Entries come back in fetch order: a page's own entries,
/// then everything reached through its first next link, then through its
/// second, and so on. A page without next links ends its branch.
///
/// Link cycles are not detected; set [`WalkOptions::max_pages`] to bound them.
///
/// # Errors
/// Whatever `fetch` returns, `MalformedDocument` for a page that does not
/// parse, and `PageLimitExceeded` when the guard trips.
pub fn walk_pages<F>(start_url: &str, mut fetch: F, options: WalkOptions) -> Result<Vec<NormalizedRecord>>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut entries = Vec::new();
    let mut pending = vec![start_url.to_string()];
    let mut fetched = 0usize;

    while let Some(url) = pending.pop() {
        if let Some(limit) = options.max_pages {
            if fetched >= limit {
                tracing::warn!(limit, url = %url, "Page limit reached, stopping walk");
                return Err(GDataError::PageLimitExceeded { limit });
            }
        }

        tracing::debug!(page = fetched + 1, url = %url, "Fetching feed page");
        let body = fetch(&url)?;
        fetched += 1;

        let page = FeedPage::parse(&body)?;
        tracing::debug!(
            page = fetched,
            entries = page.entries.len(),
            "Parsed feed page"
        );

        // Pushed in reverse so the first next link is walked first.
        let next: Vec<String> = page.next_links().map(str::to_string).collect();
        pending.extend(next.into_iter().rev());

        entries.extend(page.entries);
    }

    tracing::debug!(pages = fetched, entries = entries.len(), "Pagination walk complete");
    Ok(entries)
}
