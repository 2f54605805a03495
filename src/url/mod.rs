//! URL handling module for Sumi-Scribe
//!
//! This module decides which discovered links belong to the crawl and maps
//! page URLs onto output filenames.

mod filename;
mod scope;

pub use filename::{flatten_path, page_filename, INDEX_NAME, MARKDOWN_EXTENSION};
pub use scope::{has_fragment, is_in_scope, resolve_href};
