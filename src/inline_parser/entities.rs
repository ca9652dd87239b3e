//! Entity references.

use crate::ast::NodeId;
use crate::utils::decode_entities;

use super::{InlineParser, scanners};

impl InlineParser<'_, '_> {
    /// `&name;`, `&#nnn;`, or `&#xhh;`. The resolved text is emitted as a
    /// plain text node; grammatically valid but unknown names pass through
    /// unchanged. Anything else is not a match and falls back to a literal
    /// ampersand.
    pub(super) fn parse_entity(&mut self, block: NodeId) -> bool {
        let rest = &self.subject[self.pos..];
        match scanners::entity_len(rest) {
            Some(len) => {
                let node = self.tree.text(decode_entities(&rest[..len]).into_owned());
                self.tree.append_child(block, node);
                self.pos += len;
                true
            }
            None => false,
        }
    }
}
