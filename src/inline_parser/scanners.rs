//! Position-anchored scanner primitives.
//!
//! Every function here matches at the *start* of its input slice and
//! reports how many bytes it consumed; callers keep the parse position and
//! hand in `&subject[pos..]`. The grammar-heavy matchers (autolinks, raw
//! HTML tags, entities, link titles) are precompiled regexes; the rest are
//! byte scanners.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{normalize_uri, unescape_string};

/// `\` + ASCII punctuation, the CommonMark escapable set.
const ESCAPED_CHAR: &str = r"\\[!-/:-@\[-`{-~]";

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*>",
    )
    .unwrap()
});

static URI_AUTOLINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*>").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let tag_name = r"[A-Za-z][A-Za-z0-9-]*";
    let attribute = r#"\s+[a-zA-Z_:][a-zA-Z0-9:._-]*(?:\s*=\s*(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*"))?"#;
    let open_tag = format!(r"{tag_name}(?:{attribute})*\s*/?>");
    let close_tag = format!(r"/{tag_name}\s*>");
    let comment = r"!---->|!--(?:-?[^>-])(?:-?[^-])*-->";
    let processing = r"\?[\s\S]*?\?>";
    let declaration = r"![A-Z]+\s+[^>]*>";
    let cdata = r"!\[CDATA\[[\s\S]*?\]\]>";
    Regex::new(&format!(
        "^<(?:{open_tag}|{close_tag}|{comment}|{processing}|{declaration}|{cdata})"
    ))
    .unwrap()
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]{1,7};|#[xX][0-9A-Fa-f]{1,6};|[A-Za-z][A-Za-z0-9]{1,31};)").unwrap()
});

static LINK_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^(?:"(?:{ESCAPED_CHAR}|[^"])*"|'(?:{ESCAPED_CHAR}|[^'])*'|\((?:{ESCAPED_CHAR}|[^()])*\))"#
    ))
    .unwrap()
});

/// Bytes treated as whitespace by the link grammar.
pub(crate) fn is_whitespace_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Length of an email autolink (`<addr@host>`) at the start of `s`.
pub(crate) fn email_autolink_len(s: &str) -> Option<usize> {
    EMAIL_AUTOLINK.find(s).map(|m| m.end())
}

/// Length of a generic autolink (`<scheme:rest>`) at the start of `s`.
pub(crate) fn uri_autolink_len(s: &str) -> Option<usize> {
    URI_AUTOLINK.find(s).map(|m| m.end())
}

/// Length of a raw HTML tag (open tag, closing tag, comment, processing
/// instruction, declaration, or CDATA section) at the start of `s`.
pub(crate) fn html_tag_len(s: &str) -> Option<usize> {
    HTML_TAG.find(s).map(|m| m.end())
}

/// Length of a decimal, hexadecimal, or named entity reference at the start
/// of `s`.
pub(crate) fn entity_len(s: &str) -> Option<usize> {
    ENTITY.find(s).map(|m| m.end())
}

/// Skip zero or more spaces, at most one newline, then zero or more spaces.
/// Returns the number of bytes skipped; never fails.
pub(crate) fn spnl(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    while bytes.get(i) == Some(&b' ') {
        i += 1;
    }
    if bytes.get(i) == Some(&b'\n') {
        i += 1;
        while bytes.get(i) == Some(&b' ') {
            i += 1;
        }
    }
    i
}

/// Match optional spaces followed by a newline or the end of input.
/// Returns the bytes consumed (including the newline), or `None` if
/// something else follows the spaces.
pub(crate) fn space_at_end_of_line(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while bytes.get(i) == Some(&b' ') {
        i += 1;
    }
    match bytes.get(i) {
        None => Some(i),
        Some(&b'\n') => Some(i + 1),
        Some(_) => None,
    }
}

/// Match a link label (`[` … `]`, backslash escapes allowed, no nested
/// brackets) at the start of `s`. Returns the matched length including both
/// brackets, or 0. Labels over the length cap do not match.
pub(crate) fn link_label(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return 0;
    }
    let mut i = 1;
    let mut chars = 1usize;
    loop {
        if i >= s.len() {
            return 0;
        }
        match bytes[i] {
            b']' => {
                i += 1;
                chars += 1;
                return if chars > 1001 { 0 } else { i };
            }
            b'[' => return 0,
            b'\\' => {
                let Some(ch) = s[i + 1..].chars().next() else {
                    return 0;
                };
                if ch == '\n' {
                    return 0;
                }
                i += 1 + ch.len_utf8();
                chars += 2;
            }
            _ => {
                let Some(ch) = s[i..].chars().next() else {
                    return 0;
                };
                i += ch.len_utf8();
                chars += 1;
            }
        }
    }
}

/// Match a link destination at the start of `s`, in either the `<...>` form
/// or the bare balanced-parentheses form. Returns the consumed length and
/// the unescaped, URI-normalized destination.
pub(crate) fn link_destination(s: &str) -> Option<(usize, String)> {
    let bytes = s.as_bytes();
    if bytes.first() == Some(&b'<') {
        let mut i = 1;
        while i < s.len() {
            match bytes[i] {
                b'>' => {
                    let dest = normalize_uri(&unescape_string(&s[1..i]));
                    return Some((i + 1, dest));
                }
                b'<' | b'\n' => return None,
                b'\\' => {
                    let Some(ch) = s[i + 1..].chars().next() else {
                        return None;
                    };
                    if ch == '\n' {
                        return None;
                    }
                    i += 1 + ch.len_utf8();
                }
                _ => {
                    let Some(ch) = s[i..].chars().next() else {
                        return None;
                    };
                    i += ch.len_utf8();
                }
            }
        }
        None
    } else {
        let mut i = 0;
        let mut open_parens = 0usize;
        let mut stopped_at_paren = false;
        while i < s.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).is_some_and(|b| b.is_ascii_punctuation()) => {
                    i += 2;
                }
                b'(' => {
                    open_parens += 1;
                    i += 1;
                }
                b')' => {
                    if open_parens == 0 {
                        stopped_at_paren = true;
                        break;
                    }
                    open_parens -= 1;
                    i += 1;
                }
                b if is_whitespace_byte(b) => break,
                _ => {
                    let Some(ch) = s[i..].chars().next() else {
                        break;
                    };
                    i += ch.len_utf8();
                }
            }
        }
        // an empty destination is only allowed right before the closing paren
        if i == 0 && !stopped_at_paren {
            return None;
        }
        Some((i, normalize_uri(&unescape_string(&s[..i]))))
    }
}

/// Match a link title in `"…"`, `'…'`, or `(…)` form at the start of `s`.
/// Returns the consumed length and the unescaped title without its
/// delimiters.
pub(crate) fn link_title(s: &str) -> Option<(usize, String)> {
    let m = LINK_TITLE.find(s)?;
    let raw = &s[1..m.end() - 1];
    Some((m.end(), unescape_string(raw)))
}
