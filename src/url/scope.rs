//! Base-URL prefix scoping for discovered links

use url::Url;

/// Resolves an anchor `href` against the page it was found on
///
/// Returns None for empty hrefs, fragment-only references (`#top`) and
/// hrefs that do not form a valid URL.
pub fn resolve_href(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match page_url.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Failed to resolve '{}' against {}: {}", href, page_url, e);
            None
        }
    }
}

/// Returns true if the URL carries a non-empty fragment component
pub fn has_fragment(url: &Url) -> bool {
    matches!(url.fragment(), Some(fragment) if !fragment.is_empty())
}

/// Returns true if the URL string starts with the base URL string
///
/// This is a literal prefix comparison, not a path-segment-aware one:
/// `https://example.com/docs` also admits `https://example.com/docs-internal/x`.
pub fn is_in_scope(url: &Url, base_url: &Url) -> bool {
    url.as_str().starts_with(base_url.as_str())
}
