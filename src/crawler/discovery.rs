//! Link discovery on the seed page
//!
//! Only anchors on the seed page itself are considered; links found on
//! fetched pages are never followed.

use crate::crawler::fetcher::Fetcher;
use crate::url::{has_fragment, is_in_scope, resolve_href};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Deduplicated set of in-scope page URLs
pub type LinkSet = BTreeSet<Url>;

/// Fetches the seed page and returns every in-scope link found on it
///
/// A failed seed fetch is logged and yields an empty set.
pub async fn discover_links(fetcher: &Fetcher, seed_url: &Url, base_url: &Url) -> LinkSet {
    let html = match fetcher.fetch(seed_url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Error accessing base URL: {}. Details: {}", seed_url, e);
            return LinkSet::new();
        }
    };

    let links = extract_scoped_links(&html, seed_url, base_url);
    tracing::info!("Discovered {} links on {}", links.len(), seed_url);
    links
}

/// Extracts in-scope links from HTML
///
/// # Link Rules
///
/// For every `<a href="...">`:
/// - skip fragment-only hrefs (`#top`)
/// - resolve relative to `page_url`
/// - skip resolved URLs carrying a fragment
/// - skip resolved URLs that do not start with `base_url`
///
/// # Example
///
/// ```
/// use sumi_scribe::crawler::extract_scoped_links;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let html = r##"<a href="#top">Top</a>
///                <a href="https://other.com/x">Other</a>
///                <a href="/docs/page">Page</a>"##;
/// let links = extract_scoped_links(html, &base, &base);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains(&Url::parse("https://example.com/docs/page").unwrap()));
/// ```
pub fn extract_scoped_links(html: &str, page_url: &Url, base_url: &Url) -> LinkSet {
    let document = Html::parse_document(html);
    let mut links = LinkSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Some(url) = resolve_href(href, page_url) else {
                continue;
            };

            if has_fragment(&url) {
                tracing::trace!("Skipping {}: has fragment", url);
                continue;
            }

            if !is_in_scope(&url, base_url) {
                tracing::trace!("Skipping {}: outside {}", url, base_url);
                continue;
            }

            links.insert(url);
        }
    }

    links
}
