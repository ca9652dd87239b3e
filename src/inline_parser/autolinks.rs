//! Email and URI autolinks.

use crate::ast::{NodeId, NodeKind};
use crate::utils::normalize_uri;

use super::{InlineParser, scanners};

impl InlineParser<'_, '_> {
    /// `<addr@host>` or `<scheme:rest>`. The address or URI becomes both
    /// the (normalized) destination and the link's text child.
    pub(super) fn parse_autolink(&mut self, block: NodeId) -> bool {
        let subject = self.subject;
        let rest = &subject[self.pos..];

        if let Some(len) = scanners::email_autolink_len(rest) {
            let dest = &rest[1..len - 1];
            log::trace!("email autolink at {}: {dest}", self.pos);
            self.emit_autolink(block, normalize_uri(&format!("mailto:{dest}")), dest);
            self.pos += len;
            return true;
        }

        if let Some(len) = scanners::uri_autolink_len(rest) {
            let dest = &rest[1..len - 1];
            log::trace!("uri autolink at {}: {dest}", self.pos);
            self.emit_autolink(block, normalize_uri(dest), dest);
            self.pos += len;
            return true;
        }

        false
    }

    fn emit_autolink(&mut self, block: NodeId, destination: String, text: &str) {
        let node = self.tree.alloc(NodeKind::Link);
        self.tree[node].destination = destination;
        let label = self.tree.text(text);
        self.tree.append_child(node, label);
        self.tree.append_child(block, node);
    }
}
