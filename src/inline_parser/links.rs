//! Links and images: the bracket stack and close-bracket resolution.
//!
//! `[` and `![` are emitted as text and recorded on a stack of brackets;
//! everything up to the matching `]` parses normally. On `]` the opener is
//! resolved as an inline link, a full reference, a collapsed reference, or
//! a shortcut reference, in that order; if all fail, the bracket is gone
//! and the `]` stays literal text. Each bracket snapshots the
//! delimiter-stack top when pushed so emphasis inside the label can be
//! resolved in isolation.

use crate::ast::{NodeId, NodeKind};
use crate::utils::normalize_label;

use super::InlineParser;
use super::scanners::{self, is_whitespace_byte};

#[derive(Debug)]
pub(super) struct Bracket {
    /// The text node holding `[` or `![`.
    node: NodeId,
    prev: Option<usize>,
    /// Delimiter-stack top at push time; emphasis inside the label is
    /// resolved above this floor.
    prev_delim_top: Option<usize>,
    /// Subject index of the first character of the label.
    index: usize,
    is_image: bool,
    /// Cleared on link openers below a resolved link: no links in links.
    active: bool,
    /// Set when an inner bracket is pushed on top of this one; a label
    /// containing a bracket cannot be a collapsed or shortcut reference.
    bracket_after: bool,
}

#[derive(Debug, Default)]
pub(super) struct BracketStack {
    entries: Vec<Bracket>,
    top: Option<usize>,
}

impl BracketStack {
    pub(super) fn top(&self) -> Option<usize> {
        self.top
    }

    fn get(&self, ix: usize) -> &Bracket {
        &self.entries[ix]
    }

    fn get_mut(&mut self, ix: usize) -> &mut Bracket {
        &mut self.entries[ix]
    }

    fn push(&mut self, mut bracket: Bracket) {
        if let Some(top) = self.top {
            self.entries[top].bracket_after = true;
        }
        bracket.prev = self.top;
        let ix = self.entries.len();
        self.entries.push(bracket);
        self.top = Some(ix);
    }

    pub(super) fn pop(&mut self) -> Option<usize> {
        let top = self.top?;
        self.top = self.entries[top].prev;
        Some(top)
    }
}

impl InlineParser<'_, '_> {
    /// `[`: emit the text node and push a link opener.
    pub(super) fn parse_open_bracket(&mut self, block: NodeId) -> bool {
        self.pos += 1;
        let node = self.tree.text("[");
        self.tree.append_child(block, node);
        self.add_bracket(node, self.pos, false);
        true
    }

    /// `!`: an image opener when followed by `[`, a literal bang otherwise.
    pub(super) fn parse_bang(&mut self, block: NodeId) -> bool {
        self.pos += 1;
        if self.peek_byte() == Some(b'[') {
            self.pos += 1;
            let node = self.tree.text("![");
            self.tree.append_child(block, node);
            self.add_bracket(node, self.pos, true);
        } else {
            let node = self.tree.text("!");
            self.tree.append_child(block, node);
        }
        true
    }

    fn add_bracket(&mut self, node: NodeId, index: usize, is_image: bool) {
        self.brackets.push(Bracket {
            node,
            prev: None,
            prev_delim_top: self.delimiters.top(),
            index,
            is_image,
            active: true,
            bracket_after: false,
        });
    }

    /// `]`: try to resolve the innermost bracket opener into a link or
    /// image; on failure the bracket is discarded and `]` stays literal.
    pub(super) fn parse_close_bracket(&mut self, block: NodeId) -> bool {
        let subject = self.subject;
        self.pos += 1;
        let startpos = self.pos;

        let Some(opener_ix) = self.brackets.top() else {
            let node = self.tree.text("]");
            self.tree.append_child(block, node);
            return true;
        };

        if !self.brackets.get(opener_ix).active {
            self.brackets.pop();
            let node = self.tree.text("]");
            self.tree.append_child(block, node);
            return true;
        }

        let is_image = self.brackets.get(opener_ix).is_image;
        let mut matched = false;
        let mut dest = String::new();
        let mut title = String::new();

        let savepos = self.pos;

        // inline form: "(" spnl destination (spnl title)? spnl ")"
        if self.peek_byte() == Some(b'(') {
            self.pos += 1;
            self.spnl();
            match self.parse_link_destination() {
                Some(parsed_dest) => {
                    self.spnl();
                    // a title needs whitespace between it and the destination
                    if is_whitespace_byte(subject.as_bytes()[self.pos - 1])
                        && let Some(parsed_title) = self.parse_link_title()
                    {
                        title = parsed_title;
                    }
                    self.spnl();
                    if self.peek_byte() == Some(b')') {
                        self.pos += 1;
                        dest = parsed_dest;
                        matched = true;
                    } else {
                        self.pos = savepos;
                        title.clear();
                    }
                }
                None => self.pos = savepos,
            }
        }

        // reference forms: full, then collapsed or shortcut
        if !matched {
            let beforelabel = self.pos;
            let n = scanners::link_label(&subject[beforelabel..]);
            if n > 0 {
                self.pos = beforelabel + n;
            } else {
                // shortcut reference: rewind to just after "]"
                self.pos = savepos;
            }
            let mut reflabel: Option<&str> = None;
            if n > 2 {
                reflabel = Some(&subject[beforelabel + 1..beforelabel + n - 1]);
            } else if !self.brackets.get(opener_ix).bracket_after {
                let index = self.brackets.get(opener_ix).index;
                reflabel = Some(&subject[index..startpos - 1]);
            }

            if let Some(label) = reflabel
                && let Some(reference) = self.refmap.get(label)
            {
                log::trace!("reference {:?} resolved", normalize_label(label));
                dest = reference.destination.clone();
                title = reference.title.clone();
                matched = true;
            }
        }

        if matched {
            let node = self.tree.alloc(if is_image {
                NodeKind::Image
            } else {
                NodeKind::Link
            });
            self.tree[node].destination = dest;
            self.tree[node].title = title;

            let opener_node = self.brackets.get(opener_ix).node;
            let mut next = self.tree.next(opener_node);
            while let Some(id) = next {
                next = self.tree.next(id);
                self.tree.unlink(id);
                self.tree.append_child(node, id);
            }
            self.tree.append_child(block, node);

            let prev_delim_top = self.brackets.get(opener_ix).prev_delim_top;
            self.process_emphasis(prev_delim_top);
            self.brackets.pop();
            self.tree.unlink(opener_node);

            // no links in links: deactivate every link opener still below;
            // an already-inactive one means the rest are done too
            if !is_image {
                let mut ix = self.brackets.top();
                while let Some(bracket_ix) = ix {
                    if !self.brackets.get(bracket_ix).is_image {
                        if !self.brackets.get(bracket_ix).active {
                            break;
                        }
                        self.brackets.get_mut(bracket_ix).active = false;
                    }
                    ix = self.brackets.get(bracket_ix).prev;
                }
            }
        } else {
            self.brackets.pop();
            self.pos = startpos;
            let node = self.tree.text("]");
            self.tree.append_child(block, node);
        }
        true
    }
}
