//! Content extraction by CSS selector
//!
//! Target selectors pick the content region(s) of a page; exclude
//! selectors prune unwanted descendants from each region before it is
//! serialized back to HTML.

use crate::config::SelectorList;
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::collections::HashSet;

/// Result of running the target selectors over a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Serialized markup of every matched element, in document order
    Matched(Vec<String>),

    /// No target selector matched anything
    NoMatch,
}

/// Extracts the target regions of a page with excluded subtrees removed
///
/// Each target selector is applied on its own; an element matched by more
/// than one selector is returned once. Exclusion works on a single private
/// copy of the document, never on the parsed page itself, and pruning one
/// region never affects another.
///
/// # Example
///
/// ```
/// use sumi_scribe::config::SelectorList;
/// use sumi_scribe::crawler::{extract, Extraction};
///
/// let html = r#"<div id="a"><p>keep</p><span class="drop">gone</span></div>"#;
/// let target = SelectorList::parse("#a").unwrap();
/// let exclude = SelectorList::parse(".drop").unwrap();
///
/// match extract(html, &target, &exclude) {
///     Extraction::Matched(fragments) => {
///         assert_eq!(fragments.len(), 1);
///         assert!(fragments[0].contains("keep"));
///         assert!(!fragments[0].contains("gone"));
///     }
///     Extraction::NoMatch => unreachable!(),
/// }
/// ```
pub fn extract(html: &str, target: &SelectorList, exclude: &SelectorList) -> Extraction {
    let document = Html::parse_document(html);

    let matched: HashSet<NodeId> = target
        .selectors()
        .iter()
        .flat_map(|selector| document.select(selector))
        .map(|element| element.id())
        .collect();

    if matched.is_empty() {
        return Extraction::NoMatch;
    }

    let doomed = excluded_nodes(&document, &matched, exclude);
    let pruned = pruned_copy(&document, &doomed);
    let source = pruned.as_ref().unwrap_or(&document);

    let fragments = document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| matched.contains(&element.id()))
        .filter_map(|element| source.tree.get(element.id()).and_then(ElementRef::wrap))
        .map(|element| element.html())
        .collect();

    Extraction::Matched(fragments)
}

/// Elements matching an exclude selector that sit strictly inside a match
///
/// Selectors are resolved against the full document, so combinators may
/// refer to ancestors outside the matched region.
fn excluded_nodes(
    document: &Html,
    matched: &HashSet<NodeId>,
    exclude: &SelectorList,
) -> HashSet<NodeId> {
    exclude
        .selectors()
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter(|element| {
            element
                .ancestors()
                .any(|ancestor| matched.contains(&ancestor.id()))
        })
        .map(|element| element.id())
        .collect()
}

/// One copy of the document with every excluded subtree detached
///
/// Detaching only unlinks a node from its parent, so a match that is itself
/// excluded from an enclosing match still serializes with its own content.
/// Any node excluded inside some match is excluded inside every match that
/// contains it, which makes a single copy serve all matches. Returns `None`
/// when nothing needs pruning.
fn pruned_copy(document: &Html, doomed: &HashSet<NodeId>) -> Option<Html> {
    if doomed.is_empty() {
        return None;
    }

    let mut scratch = document.clone();
    for id in doomed {
        if let Some(mut node) = scratch.tree.get_mut(*id) {
            node.detach();
        }
    }
    Some(scratch)
}
