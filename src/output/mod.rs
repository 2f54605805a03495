//! Output module for turning extracted content into files on disk
//!
//! This module handles:
//! - Converting extracted HTML fragments to Markdown
//! - Managing the output directory lifecycle (create, write, clear)

mod markdown;
mod workspace;

pub use markdown::{render_fragments, to_markdown, FRAGMENT_SEPARATOR};
pub use workspace::{clear_workspace, ensure_workspace, list_markdown_files, write_page};
