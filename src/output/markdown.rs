//! HTML to Markdown conversion
//!
//! Structural conversion (headings, tables, lists, emphasis, code blocks and
//! links) is delegated to `html2md`; this module only fixes how the
//! fragments of one page are joined.

/// Separator placed between the converted fragments of a single page
pub const FRAGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Converts one HTML fragment to Markdown
///
/// The conversion is deterministic and holds no state between calls.
///
/// # Example
///
/// ```
/// use sumi_scribe::output::to_markdown;
///
/// let md = to_markdown("<p>Hello <strong>world</strong></p>");
/// assert!(md.contains("**world**"));
/// ```
pub fn to_markdown(fragment: &str) -> String {
    html2md::parse_html(fragment)
}

/// Converts every fragment and joins them with [`FRAGMENT_SEPARATOR`]
///
/// Fragments keep the order they are given in.
pub fn render_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|fragment| to_markdown(fragment.as_ref()))
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}
