//! Comma-separated CSS selector lists

use crate::ConfigError;
use scraper::Selector;
use std::fmt;

/// An ordered list of compiled CSS selectors
///
/// Built from the external representation: a single string of
/// comma-separated selectors. Entries are trimmed and empty ones dropped,
/// so `""` yields an empty list.
#[derive(Debug, Clone)]
pub struct SelectorList {
    raw: Vec<String>,
    compiled: Vec<Selector>,
}

impl SelectorList {
    /// Splits and compiles a comma-separated selector string
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_scribe::config::SelectorList;
    ///
    /// let list = SelectorList::parse("article, .content ,,").unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.to_string(), "article, .content");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut raw = Vec::new();
        let mut compiled = Vec::new();

        for entry in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let selector = Selector::parse(entry).map_err(|e| ConfigError::InvalidSelector {
                selector: entry.to_string(),
                message: e.to_string(),
            })?;
            raw.push(entry.to_string());
            compiled.push(selector);
        }

        Ok(Self { raw, compiled })
    }

    /// The compiled selectors, in input order
    pub fn selectors(&self) -> &[Selector] {
        &self.compiled
    }

    /// The trimmed selector strings, in input order
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw.join(", "))
    }
}
