//! Backtick code spans.

use crate::ast::NodeId;

use super::InlineParser;

/// Try to match a code span at the start of `text`. Returns the total
/// length consumed and the cooked literal, or `None` when the opening run
/// has no matching closer.
pub(super) fn try_parse_code_span(text: &str) -> Option<(usize, String)> {
    let ticks = text.bytes().take_while(|&b| b == b'`').count();
    if ticks == 0 {
        return None;
    }

    let rest = &text[ticks..];
    let bytes = rest.as_bytes();
    let mut pos = 0;
    while pos < rest.len() {
        if bytes[pos] == b'`' {
            let run = bytes[pos..].iter().take_while(|&&b| b == b'`').count();
            if run == ticks {
                return Some((ticks + pos + run, cook_code_span(&rest[..pos])));
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}

/// Newlines become spaces, and one layer of space padding is removed when
/// the content is space-wrapped but not all spaces.
fn cook_code_span(raw: &str) -> String {
    let contents: String = raw
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let bytes = contents.as_bytes();
    if contents.len() >= 2
        && bytes[0] == b' '
        && bytes[bytes.len() - 1] == b' '
        && contents.bytes().any(|b| b != b' ')
    {
        contents[1..contents.len() - 1].to_string()
    } else {
        contents
    }
}

impl InlineParser<'_, '_> {
    /// Backtick run: a code span when a matching closer exists, otherwise
    /// the run itself as literal text (and parsing resumes right after it).
    pub(super) fn parse_backticks(&mut self, block: NodeId) -> bool {
        let rest = &self.subject[self.pos..];
        match try_parse_code_span(rest) {
            Some((len, literal)) => {
                log::trace!("code span at {} ({} bytes)", self.pos, len);
                let node = self.tree.alloc(crate::ast::NodeKind::Code);
                self.tree[node].literal = literal;
                self.tree.append_child(block, node);
                self.pos += len;
            }
            None => {
                let ticks = rest.bytes().take_while(|&b| b == b'`').count();
                let node = self.tree.text(&rest[..ticks]);
                self.tree.append_child(block, node);
                self.pos += ticks;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_code_span() {
        assert_eq!(try_parse_code_span("`code`"), Some((6, "code".to_string())));
    }

    #[test]
    fn longer_opener_needs_matching_closer() {
        assert_eq!(
            try_parse_code_span("`` `backtick` ``"),
            Some((16, "`backtick`".to_string()))
        );
        assert_eq!(try_parse_code_span("`single``"), None);
    }

    #[test]
    fn no_closer() {
        assert_eq!(try_parse_code_span("`no close"), None);
        assert_eq!(try_parse_code_span("plain"), None);
    }

    #[test]
    fn newlines_become_spaces() {
        assert_eq!(try_parse_code_span("`a\nb`"), Some((5, "a b".to_string())));
    }

    #[test]
    fn one_space_of_padding_is_stripped() {
        assert_eq!(try_parse_code_span("` a `"), Some((5, "a".to_string())));
        assert_eq!(try_parse_code_span("`  a  `"), Some((7, " a ".to_string())));
    }

    #[test]
    fn all_space_content_is_kept() {
        assert_eq!(try_parse_code_span("`  `"), Some((4, "  ".to_string())));
        assert_eq!(try_parse_code_span("` `"), Some((3, " ".to_string())));
    }

    #[test]
    fn one_sided_padding_is_kept() {
        assert_eq!(try_parse_code_span("` a`"), Some((4, " a".to_string())));
    }
}
