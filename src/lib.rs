//! Inline parsing for CommonMark-family Markdown.
//!
//! This crate is the span-level half of a Markdown processor: given the
//! text content of one already-segmented block, it builds the tree of
//! inline nodes (text, code spans, emphasis and strong emphasis, links,
//! images, autolinks, raw HTML, entities, and line breaks), and it parses
//! the link-reference definitions that block parsing peels off the front
//! of paragraphs. Block segmentation and rendering are left to the caller.
//!
//! ```
//! use inkline::ast::{NodeKind, Tree};
//! use inkline::{parse_inlines, parse_reference, ParseOptions, ReferenceMap};
//!
//! let mut refmap = ReferenceMap::new();
//! parse_reference("[docs]: https://example.com/docs\n", &mut refmap);
//!
//! let mut tree = Tree::new();
//! let para = tree.alloc(NodeKind::Paragraph);
//! tree[para].string_content = "see the *[docs]*".to_string();
//! parse_inlines(&mut tree, para, &refmap, &ParseOptions::default());
//!
//! for (node, entering) in tree.walker(para) {
//!     println!("{} {:?}", if entering { ">" } else { "<" }, tree.kind(node));
//! }
//! ```
//!
//! Inline parsing never fails: malformed constructs degrade to literal
//! text and the output tree is always well-formed.

pub mod ast;
pub mod config;
mod inline_parser;
pub mod utils;

pub use config::ParseOptions;
pub use inline_parser::parse_inlines;
pub use inline_parser::references::{Reference, ReferenceMap, parse_reference};

#[cfg(debug_assertions)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
