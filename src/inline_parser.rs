//! Inline parsing.
//!
//! [`parse_inlines`] turns the collected text of one block into a tree of
//! inline nodes: text, code spans, emphasis, links, images, autolinks, raw
//! HTML, entities, and line breaks, with optional smart punctuation.
//!
//! The parser walks the subject byte-by-byte and dispatches on the current
//! character. Most constructs are settled immediately; emphasis and links
//! cannot be, so delimiter runs and brackets are recorded on side stacks
//! and resolved after the fact ([`emphasis`], [`links`]). Nothing here ever
//! fails hard: a sub-parser that does not match makes the dispatcher emit
//! one literal character and move on.

mod autolinks;
mod classify;
mod code_spans;
mod emphasis;
mod entities;
mod escapes;
mod links;
mod raw_html;
pub mod references;
pub(crate) mod scanners;
mod smart;


use crate::ast::{NodeId, NodeKind, Tree};
use crate::config::ParseOptions;

use self::emphasis::DelimiterStack;
use self::links::BracketStack;
use self::references::ReferenceMap;

/// Parse `block`'s `string_content` into inline children of `block`.
///
/// `refmap` supplies the link-reference definitions collected during block
/// parsing; it is only read here. The subject is trimmed of leading and
/// trailing whitespace before parsing, matching how paragraph content is
/// accumulated.
pub fn parse_inlines(
    tree: &mut Tree,
    block: NodeId,
    refmap: &ReferenceMap,
    options: &ParseOptions,
) {
    #[cfg(debug_assertions)]
    crate::init_logger();

    let subject = tree[block].string_content.trim().to_string();
    log::trace!("parsing inlines of {} byte subject", subject.len());

    let mut parser = InlineParser {
        subject: &subject,
        pos: 0,
        tree,
        refmap,
        options,
        delimiters: DelimiterStack::default(),
        brackets: BracketStack::default(),
    };
    while parser.parse_inline(block) {}
    parser.process_emphasis(None);
    while parser.brackets.pop().is_some() {}

    debug_assert!(
        parser.delimiters.top().is_none(),
        "delimiter stack drained after parsing"
    );
}

pub(crate) struct InlineParser<'s, 't> {
    subject: &'s str,
    pos: usize,
    tree: &'t mut Tree,
    refmap: &'s ReferenceMap,
    options: &'s ParseOptions,
    delimiters: DelimiterStack,
    brackets: BracketStack,
}

impl<'s, 't> InlineParser<'s, 't> {
    #[cfg(test)]
    pub(crate) fn new(
        subject: &'s str,
        tree: &'t mut Tree,
        refmap: &'s ReferenceMap,
        options: &'s ParseOptions,
    ) -> Self {
        Self {
            subject,
            pos: 0,
            tree,
            refmap,
            options,
            delimiters: DelimiterStack::default(),
            brackets: BracketStack::default(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.subject[self.pos..].chars().next()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.subject.as_bytes().get(self.pos).copied()
    }

    /// Parse the next inline element, appending the result to `block`.
    /// Returns `false` once the subject is exhausted.
    fn parse_inline(&mut self, block: NodeId) -> bool {
        let Some(c) = self.peek() else {
            return false;
        };

        let matched = match c {
            '\n' => self.parse_newline(block),
            '\\' => self.parse_backslash(block),
            '`' => self.parse_backticks(block),
            '*' | '_' => self.handle_delim(c, block),
            '\'' | '"' => self.options.smart && self.handle_delim(c, block),
            '[' => self.parse_open_bracket(block),
            '!' => self.parse_bang(block),
            ']' => self.parse_close_bracket(block),
            '<' => self.parse_autolink(block) || self.parse_html_tag(block),
            '&' => self.parse_entity(block),
            _ => self.parse_string(block),
        };

        if !matched {
            log::trace!("no inline matched at {}, emitting {:?} literally", self.pos, c);
            self.pos += c.len_utf8();
            let node = self.tree.text(c.to_string());
            self.tree.append_child(block, node);
        }

        true
    }

    /// Newline: a hard break after two trailing spaces, a soft break
    /// otherwise. Trailing spaces are removed from the preceding text node
    /// and leading spaces of the next line are swallowed.
    fn parse_newline(&mut self, block: NodeId) -> bool {
        self.pos += 1;

        let mut kind = NodeKind::Softbreak;
        if let Some(last) = self.tree.last_child(block)
            && self.tree.kind(last) == NodeKind::Text
            && self.tree[last].literal.ends_with(' ')
        {
            let literal = &self.tree[last].literal;
            let hard = literal.len() >= 2 && literal.as_bytes()[literal.len() - 2] == b' ';
            let trimmed_len = literal.trim_end_matches(' ').len();
            self.tree[last].literal.truncate(trimmed_len);
            if hard {
                kind = NodeKind::Linebreak;
            }
        }
        let node = self.tree.alloc(kind);
        self.tree.append_child(block, node);

        // swallow the next line's indentation
        while self.peek_byte() == Some(b' ') {
            self.pos += 1;
        }
        true
    }

    /// A maximal run of characters with no special meaning, with the smart
    /// ellipsis and dash substitutions applied when enabled.
    fn parse_string(&mut self, block: NodeId) -> bool {
        let len = ordinary_text_len(&self.subject[self.pos..]);
        if len == 0 {
            return false;
        }
        let run = &self.subject[self.pos..self.pos + len];
        self.pos += len;

        let literal = if self.options.smart {
            smart::replace_ellipses_and_dashes(run)
        } else {
            run.to_string()
        };
        let node = self.tree.text(literal);
        self.tree.append_child(block, node);
        true
    }

    /// Skip spaces with at most one newline.
    fn spnl(&mut self) {
        self.pos += scanners::spnl(&self.subject[self.pos..]);
    }

    fn parse_link_destination(&mut self) -> Option<String> {
        let (len, dest) = scanners::link_destination(&self.subject[self.pos..])?;
        self.pos += len;
        Some(dest)
    }

    fn parse_link_title(&mut self) -> Option<String> {
        let (len, title) = scanners::link_title(&self.subject[self.pos..])?;
        self.pos += len;
        Some(title)
    }
}

/// Length of the run of ordinary characters at the start of `text`. All
/// dispatch characters are ASCII, so a byte scan is exact.
fn ordinary_text_len(text: &str) -> usize {
    text.bytes()
        .position(|b| {
            matches!(
                b,
                b'\n' | b'`' | b'[' | b']' | b'\\' | b'!' | b'<' | b'&' | b'*' | b'_' | b'\'' | b'"'
            )
        })
        .unwrap_or(text.len())
}
