//! Link-reference definitions and the map they populate.
//!
//! The block parser calls [`parse_reference`] at the start of each
//! candidate paragraph, repeatedly, consuming one definition at a time;
//! whatever it returns 0 for stays paragraph text. By the time inlines are
//! parsed the map is complete and read-only.

use std::collections::HashMap;

use crate::utils::normalize_label;

use super::scanners;

/// A link-reference definition: destination plus (possibly empty) title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub destination: String,
    pub title: String,
}

/// Map from normalized labels to definitions. The first definition of a
/// label wins; later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    entries: HashMap<String, Reference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition unless the normalized label is empty or already
    /// defined. Returns whether the definition was stored.
    pub fn insert(
        &mut self,
        label: &str,
        destination: impl Into<String>,
        title: impl Into<String>,
    ) -> bool {
        let key = normalize_label(label);
        if key.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(
            key,
            Reference {
                destination: destination.into(),
                title: title.into(),
            },
        );
        true
    }

    /// Look up a label; matching is against the normalized form.
    pub fn get(&self, label: &str) -> Option<&Reference> {
        self.entries.get(&normalize_label(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Try to consume one link-reference definition from the start of `s`,
/// inserting it into `refmap`. Returns the number of bytes consumed, or 0
/// when `s` does not begin with a definition (in which case `refmap` is
/// untouched).
pub fn parse_reference(s: &str, refmap: &mut ReferenceMap) -> usize {
    // [label]:
    let label_len = scanners::link_label(s);
    if label_len == 0 || label_len == 2 {
        return 0;
    }
    let raw_label = &s[1..label_len - 1];
    let mut pos = label_len;

    if s.as_bytes().get(pos) != Some(&b':') {
        return 0;
    }
    pos += 1;

    // destination
    pos += scanners::spnl(&s[pos..]);
    let Some((dest_len, destination)) = scanners::link_destination(&s[pos..]) else {
        return 0;
    };
    pos += dest_len;

    // optional title, only after at least one unit of whitespace
    let beforetitle = pos;
    pos += scanners::spnl(&s[pos..]);
    let mut title = String::new();
    if pos != beforetitle {
        match scanners::link_title(&s[pos..]) {
            Some((title_len, parsed_title)) => {
                title = parsed_title;
                pos += title_len;
            }
            None => pos = beforetitle,
        }
    }

    // the definition must end its line; a title that spoils this is
    // dropped and the check repeated right after the destination
    match scanners::space_at_end_of_line(&s[pos..]) {
        Some(eol) => pos += eol,
        None => {
            if title.is_empty() {
                return 0;
            }
            title.clear();
            pos = beforetitle;
            match scanners::space_at_end_of_line(&s[pos..]) {
                Some(eol) => pos += eol,
                None => return 0,
            }
        }
    }

    if normalize_label(raw_label).is_empty() {
        return 0;
    }

    log::trace!("reference definition {raw_label:?} -> {destination:?}");
    refmap.insert(raw_label, destination, title);
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_definition() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: /url\nrest";
        let consumed = parse_reference(input, &mut map);
        assert_eq!(consumed, 12, "consumes through the newline");
        let reference = map.get("foo").expect("definition stored");
        assert_eq!(reference.destination, "/url");
        assert_eq!(reference.title, "");
    }

    #[test]
    fn definition_with_title() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: /url \"the title\"\n";
        assert_eq!(parse_reference(input, &mut map), input.len());
        assert_eq!(map.get("foo").expect("stored").title, "the title");
    }

    #[test]
    fn title_on_next_line() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: /url\n'title'\n";
        assert_eq!(parse_reference(input, &mut map), input.len());
        assert_eq!(map.get("foo").expect("stored").title, "title");
    }

    #[test]
    fn pointy_destination() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: <my url>\n";
        assert_eq!(parse_reference(input, &mut map), input.len());
        assert_eq!(map.get("foo").expect("stored").destination, "my%20url");
    }

    #[test]
    fn at_end_of_input_without_newline() {
        let mut map = ReferenceMap::new();
        assert_eq!(parse_reference("[foo]: /url", &mut map), 11);
        assert!(map.contains("foo"));
    }

    #[test]
    fn junk_after_title_discards_only_the_title() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: /url \"title\" junk\nrest";
        // definition holds, but ends after the destination
        assert_eq!(parse_reference(input, &mut map), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn multiline_title_followed_by_junk_retries_without_it() {
        let mut map = ReferenceMap::new();
        let input = "[foo]: /url\n\"title\" junk\nrest";
        let consumed = parse_reference(input, &mut map);
        assert_eq!(consumed, 12, "stops after the destination line");
        let reference = map.get("foo").expect("stored without title");
        assert_eq!(reference.title, "");
    }

    #[test]
    fn not_a_definition_consumes_nothing() {
        let mut map = ReferenceMap::new();
        for input in [
            "plain paragraph",
            "[foo] /url",
            "[foo]:",
            "[]: /url",
            "[foo]: /url junk",
        ] {
            assert_eq!(parse_reference(input, &mut map), 0, "input: {input:?}");
            assert!(map.is_empty(), "input: {input:?}");
        }
    }

    #[test]
    fn blank_label_is_rejected() {
        let mut map = ReferenceMap::new();
        assert_eq!(parse_reference("[  \t]: /url\n", &mut map), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn first_definition_wins() {
        let mut map = ReferenceMap::new();
        let first = parse_reference("[foo]: /first\n", &mut map);
        assert!(first > 0);
        let second = parse_reference("[FOO]: /second\n", &mut map);
        assert!(second > 0, "the duplicate is still consumed");
        assert_eq!(map.get("foo").expect("kept").destination, "/first");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn lookup_normalizes_labels() {
        let mut map = ReferenceMap::new();
        map.insert("Foo  Bar", "/u", "");
        assert!(map.contains("foo bar"));
        assert!(map.contains("  FOO\nBAR "));
        assert!(!map.contains("foobar"));
    }
}
