//! The delimiter stack and the emphasis resolver.
//!
//! `*`, `_`, and (with smart punctuation) `'`/`"` runs are emitted as plain
//! text nodes while a record for each run is pushed onto the delimiter
//! stack. [`InlineParser::process_emphasis`] later pairs closers with
//! openers, splices the intervening siblings into new `Emph`/`Strong`
//! nodes, and trims the consumed characters off both text literals.
//!
//! The records form a doubly linked list laid over a `Vec` arena: removal
//! relinks neighbors but never deallocates, so indices held elsewhere (the
//! bracket stack snapshots one) stay valid for the whole session.

use crate::ast::{NodeId, NodeKind};

use super::classify::{is_unicode_punctuation, is_unicode_whitespace};
use super::{InlineParser, smart};

#[derive(Debug)]
pub(super) struct Delimiter {
    pub(super) ch: char,
    /// Delimiters still available for pairing.
    pub(super) count: usize,
    /// Length of the original run, for the rule-of-3 test.
    pub(super) orig_count: usize,
    /// The text node holding the remaining run of delimiter characters.
    pub(super) node: NodeId,
    pub(super) can_open: bool,
    pub(super) can_close: bool,
    pub(super) prev: Option<usize>,
    pub(super) next: Option<usize>,
}

#[derive(Debug, Default)]
pub(super) struct DelimiterStack {
    entries: Vec<Delimiter>,
    top: Option<usize>,
}

impl DelimiterStack {
    pub(super) fn top(&self) -> Option<usize> {
        self.top
    }

    pub(super) fn get(&self, ix: usize) -> &Delimiter {
        &self.entries[ix]
    }

    fn get_mut(&mut self, ix: usize) -> &mut Delimiter {
        &mut self.entries[ix]
    }

    fn push(&mut self, mut delimiter: Delimiter) -> usize {
        let ix = self.entries.len();
        delimiter.prev = self.top;
        delimiter.next = None;
        if let Some(top) = self.top {
            self.entries[top].next = Some(ix);
        }
        self.entries.push(delimiter);
        self.top = Some(ix);
        ix
    }

    /// Unlink the record at `ix` from the list. The entry itself stays in
    /// the arena.
    fn remove(&mut self, ix: usize) {
        let prev = self.entries[ix].prev;
        let next = self.entries[ix].next;
        match next {
            None => self.top = prev,
            Some(next) => self.entries[next].prev = prev,
        }
        if let Some(prev) = prev {
            self.entries[prev].next = next;
        }
    }

    /// Unlink everything strictly between `bottom` and `top`.
    fn remove_between(&mut self, bottom: usize, top: usize) {
        if self.entries[bottom].next != Some(top) {
            self.entries[bottom].next = Some(top);
            self.entries[top].prev = Some(bottom);
        }
    }
}

pub(super) struct DelimScan {
    numdelims: usize,
    can_open: bool,
    can_close: bool,
}

/// Per-character slot in the openers floor.
fn slot(ch: char) -> usize {
    match ch {
        '*' => 0,
        '_' => 1,
        '\'' => 2,
        _ => 3,
    }
}

impl InlineParser<'_, '_> {
    /// Measure the delimiter run at the current position and classify it
    /// per the flanking rules. The position is left unchanged.
    pub(super) fn scan_delims(&mut self, c: char) -> Option<DelimScan> {
        let start = self.pos;
        let mut numdelims = 0;
        if c == '\'' || c == '"' {
            numdelims += 1;
            self.pos += 1;
        } else {
            while self.peek() == Some(c) {
                numdelims += 1;
                self.pos += 1;
            }
        }
        if numdelims == 0 {
            return None;
        }

        let before = self.subject[..start].chars().next_back().unwrap_or('\n');
        let after = self.peek().unwrap_or('\n');

        let after_is_whitespace = is_unicode_whitespace(after);
        let after_is_punctuation = is_unicode_punctuation(after);
        let before_is_whitespace = is_unicode_whitespace(before);
        let before_is_punctuation = is_unicode_punctuation(before);

        let left_flanking = !after_is_whitespace
            && (!after_is_punctuation || before_is_whitespace || before_is_punctuation);
        let right_flanking = !before_is_whitespace
            && (!before_is_punctuation || after_is_whitespace || after_is_punctuation);

        let (can_open, can_close) = match c {
            '_' => (
                left_flanking && (!right_flanking || before_is_punctuation),
                right_flanking && (!left_flanking || after_is_punctuation),
            ),
            '\'' | '"' => (left_flanking && !right_flanking, right_flanking),
            _ => (left_flanking, right_flanking),
        };

        self.pos = start;
        Some(DelimScan {
            numdelims,
            can_open,
            can_close,
        })
    }

    /// Consume a delimiter run: emit its text node (curly provisional
    /// literals for smart quotes) and push a record for the resolver.
    pub(super) fn handle_delim(&mut self, c: char, block: NodeId) -> bool {
        let Some(scan) = self.scan_delims(c) else {
            return false;
        };
        let start = self.pos;
        // delimiter characters are all one byte
        self.pos += scan.numdelims;
        let contents = match c {
            '\'' | '"' => smart::provisional_quote(c).to_string(),
            _ => self.subject[start..self.pos].to_string(),
        };
        let node = self.tree.text(contents);
        self.tree.append_child(block, node);

        self.delimiters.push(Delimiter {
            ch: c,
            count: scan.numdelims,
            orig_count: scan.numdelims,
            node,
            can_open: scan.can_open,
            can_close: scan.can_close,
            prev: None,
            next: None,
        });
        true
    }

    /// Resolve emphasis over the part of the delimiter stack above
    /// `stack_bottom`, then pop everything above it.
    ///
    /// Closers are visited bottom-up; for each one the stack is searched
    /// back down for the nearest compatible opener, with a per-character
    /// floor that remembers where previous searches came up empty. A pair
    /// that fails the rule-of-3 test (`odd_match`) is skipped but does not
    /// lower the floor, since the closer may still pair after a later
    /// truncation.
    pub(super) fn process_emphasis(&mut self, stack_bottom: Option<usize>) {
        let mut openers_bottom: [Option<usize>; 4] = [stack_bottom; 4];
        let mut odd_match = false;

        // start at the first delimiter above stack_bottom
        let mut closer = self.delimiters.top();
        while let Some(ix) = closer {
            if self.delimiters.get(ix).prev == stack_bottom {
                break;
            }
            closer = self.delimiters.get(ix).prev;
        }

        while let Some(closer_ix) = closer {
            if !self.delimiters.get(closer_ix).can_close {
                closer = self.delimiters.get(closer_ix).next;
                continue;
            }
            let closer_char = self.delimiters.get(closer_ix).ch;

            let mut opener = self.delimiters.get(closer_ix).prev;
            let mut found_opener = None;
            while let Some(opener_ix) = opener {
                if Some(opener_ix) == stack_bottom
                    || Some(opener_ix) == openers_bottom[slot(closer_char)]
                {
                    break;
                }
                let o = self.delimiters.get(opener_ix);
                let c = self.delimiters.get(closer_ix);
                odd_match = (c.can_open || o.can_close)
                    && c.orig_count % 3 != 0
                    && (o.orig_count + c.orig_count) % 3 == 0;
                if o.ch == closer_char && o.can_open && !odd_match {
                    found_opener = Some(opener_ix);
                    break;
                }
                opener = o.prev;
            }
            let old_closer = closer_ix;

            if closer_char == '*' || closer_char == '_' {
                match found_opener {
                    Some(opener_ix) => {
                        log::debug!("pairing delimiters {opener_ix} and {closer_ix}");
                        closer = self.insert_emph(opener_ix, closer_ix);
                    }
                    None => closer = self.delimiters.get(closer_ix).next,
                }
            } else {
                // smart quotes never nest; only the literals change
                let closer_node = self.delimiters.get(closer_ix).node;
                self.tree[closer_node].literal = smart::closing_quote(closer_char).to_string();
                if let Some(opener_ix) = found_opener {
                    let opener_node = self.delimiters.get(opener_ix).node;
                    self.tree[opener_node].literal = smart::opening_quote(closer_char).to_string();
                }
                closer = self.delimiters.get(closer_ix).next;
            }

            if found_opener.is_none() && !odd_match {
                // no opener exists for this character below here; remember
                // that so later closers skip the dead range
                openers_bottom[slot(closer_char)] = self.delimiters.get(old_closer).prev;
                if !self.delimiters.get(old_closer).can_open {
                    self.delimiters.remove(old_closer);
                }
            }
        }

        // everything still on the stack is literal text
        while let Some(top) = self.delimiters.top() {
            if Some(top) == stack_bottom {
                break;
            }
            self.delimiters.remove(top);
        }
    }

    /// Pair `opener` with `closer`: build the `Emph`/`Strong` node, move
    /// the siblings between the two text nodes into it, and trim the
    /// consumed delimiters. Returns the closer to continue from.
    fn insert_emph(&mut self, opener_ix: usize, closer_ix: usize) -> Option<usize> {
        let opener_node = self.delimiters.get(opener_ix).node;
        let closer_node = self.delimiters.get(closer_ix).node;

        let use_delims = if self.delimiters.get(closer_ix).count >= 2
            && self.delimiters.get(opener_ix).count >= 2
        {
            2
        } else {
            1
        };

        self.delimiters.get_mut(opener_ix).count -= use_delims;
        self.delimiters.get_mut(closer_ix).count -= use_delims;

        let trimmed = self.tree[opener_node].literal.len() - use_delims;
        self.tree[opener_node].literal.truncate(trimmed);
        let trimmed = self.tree[closer_node].literal.len() - use_delims;
        self.tree[closer_node].literal.truncate(trimmed);

        let emph = self.tree.alloc(if use_delims == 1 {
            NodeKind::Emph
        } else {
            NodeKind::Strong
        });

        let mut next = self.tree.next(opener_node);
        while let Some(id) = next {
            if id == closer_node {
                break;
            }
            next = self.tree.next(id);
            self.tree.unlink(id);
            self.tree.append_child(emph, id);
        }
        self.tree.insert_after(opener_node, emph);

        self.delimiters.remove_between(opener_ix, closer_ix);

        if self.delimiters.get(opener_ix).count == 0 {
            self.tree.unlink(opener_node);
            self.delimiters.remove(opener_ix);
        }

        if self.delimiters.get(closer_ix).count == 0 {
            self.tree.unlink(closer_node);
            let next = self.delimiters.get(closer_ix).next;
            self.delimiters.remove(closer_ix);
            next
        } else {
            Some(closer_ix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Tree;
    use crate::config::ParseOptions;
    use crate::inline_parser::references::ReferenceMap;

    fn scan(subject: &str, pos: usize, c: char) -> DelimScan {
        let mut tree = Tree::new();
        let refmap = ReferenceMap::new();
        let options = ParseOptions::default();
        let mut parser = InlineParser::new(subject, &mut tree, &refmap, &options);
        parser.pos = pos;
        parser.scan_delims(c).expect("a delimiter run at pos")
    }

    #[test]
    fn star_flanking() {
        let open = scan("*word", 0, '*');
        assert!(open.can_open);
        assert!(!open.can_close);

        let close = scan("word*", 4, '*');
        assert!(close.can_close);
        assert!(!close.can_open);
    }

    #[test]
    fn star_next_to_space_does_nothing() {
        let s = scan("a * b", 2, '*');
        assert!(!s.can_open);
        assert!(!s.can_close);
    }

    #[test]
    fn intraword_star_can_do_both() {
        let s = scan("fo*o", 2, '*');
        assert!(s.can_open);
        assert!(s.can_close);
    }

    #[test]
    fn intraword_underscore_does_neither() {
        let s = scan("snake_case", 5, '_');
        assert!(!s.can_open);
        assert!(!s.can_close);
    }

    #[test]
    fn underscore_after_punctuation_can_close() {
        let s = scan("foo._", 4, '_');
        assert!(s.can_close);
    }

    #[test]
    fn run_length_is_measured() {
        let s = scan("a***b", 1, '*');
        assert_eq!(s.numdelims, 3);
    }

    #[test]
    fn quote_runs_are_single() {
        let s = scan("''", 0, '\'');
        assert_eq!(s.numdelims, 1);
    }

    #[test]
    fn stack_push_and_remove_relink() {
        let mut stack = DelimiterStack::default();
        let mut tree = Tree::new();
        let node = tree.text("*");
        let mk = |node| Delimiter {
            ch: '*',
            count: 1,
            orig_count: 1,
            node,
            can_open: true,
            can_close: false,
            prev: None,
            next: None,
        };
        let a = stack.push(mk(node));
        let b = stack.push(mk(node));
        let c = stack.push(mk(node));
        assert_eq!(stack.top(), Some(c));

        stack.remove(b);
        assert_eq!(stack.get(a).next, Some(c));
        assert_eq!(stack.get(c).prev, Some(a));

        stack.remove(c);
        assert_eq!(stack.top(), Some(a));
        stack.remove(a);
        assert_eq!(stack.top(), None);
    }
}
