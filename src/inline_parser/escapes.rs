//! Backslash escapes.

use crate::ast::{NodeId, NodeKind};

use super::InlineParser;

impl InlineParser<'_, '_> {
    /// Backslash: a hard break before a newline, the bare character for an
    /// ASCII punctuation escape, and a literal backslash otherwise.
    pub(super) fn parse_backslash(&mut self, block: NodeId) -> bool {
        self.pos += 1;
        match self.peek_byte() {
            Some(b'\n') => {
                self.pos += 1;
                let node = self.tree.alloc(NodeKind::Linebreak);
                self.tree.append_child(block, node);
            }
            Some(b) if b.is_ascii_punctuation() => {
                self.pos += 1;
                let node = self.tree.text((b as char).to_string());
                self.tree.append_child(block, node);
            }
            _ => {
                let node = self.tree.text("\\");
                self.tree.append_child(block, node);
            }
        }
        true
    }
}
