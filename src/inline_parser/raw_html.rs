//! Raw inline HTML.

use crate::ast::{NodeId, NodeKind};

use super::{InlineParser, scanners};

impl InlineParser<'_, '_> {
    /// A raw HTML tag (open or closing tag, comment, processing
    /// instruction, declaration, or CDATA section), kept verbatim as the
    /// node literal.
    pub(super) fn parse_html_tag(&mut self, block: NodeId) -> bool {
        let rest = &self.subject[self.pos..];
        match scanners::html_tag_len(rest) {
            Some(len) => {
                let node = self.tree.alloc(NodeKind::HtmlInline);
                self.tree[node].literal = rest[..len].to_string();
                self.tree.append_child(block, node);
                self.pos += len;
                true
            }
            None => false,
        }
    }
}
