//! Output filenames derived from page URLs

use url::Url;

/// Name used when a page path flattens to nothing
pub const INDEX_NAME: &str = "index";

/// Extension of every page file
pub const MARKDOWN_EXTENSION: &str = "md";

/// Flattens a page URL's path into a single filename stem
///
/// The path is taken relative to the base URL's path when it lies beneath
/// it, then leading and trailing slashes are stripped and the remaining
/// slashes become underscores. Query strings and fragments are ignored.
///
/// # Example
///
/// ```
/// use sumi_scribe::url::flatten_path;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let page = Url::parse("https://example.com/docs/guide/intro").unwrap();
/// assert_eq!(flatten_path(&page, &base), "guide_intro");
/// assert_eq!(flatten_path(&base, &base), "index");
/// ```
pub fn flatten_path(url: &Url, base_url: &Url) -> String {
    let path = url.path();
    let relative = if url.origin() == base_url.origin() {
        relative_path(path, base_url.path())
    } else {
        path
    };

    let flattened = relative.trim_matches('/').replace('/', "_");
    if flattened.is_empty() {
        INDEX_NAME.to_string()
    } else {
        flattened
    }
}

/// The output filename (`<flattened>.md`) for a page URL
pub fn page_filename(url: &Url, base_url: &Url) -> String {
    format!("{}.{}", flatten_path(url, base_url), MARKDOWN_EXTENSION)
}

/// Strips the base path from `path` when it ends on a segment boundary
fn relative_path<'a>(path: &'a str, base_path: &str) -> &'a str {
    match path.strip_prefix(base_path) {
        Some(rest) if base_path.ends_with('/') || rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
