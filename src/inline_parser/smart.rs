//! Smart punctuation substitutions: ellipses and dash runs in ordinary
//! text, and the curly-quote literals used by the delimiter machinery.

/// Render a run of `count` hyphens as em and en dashes.
///
/// Runs divisible by 3 become all em dashes, runs divisible by 2 become all
/// en dashes, and the rest mix em dashes with one or two trailing en dashes
/// so the total width works out.
pub(crate) fn smart_dashes(count: usize) -> String {
    let (em_count, en_count) = if count % 3 == 0 {
        (count / 3, 0)
    } else if count % 2 == 0 {
        (0, count / 2)
    } else if count % 3 == 2 {
        ((count - 2) / 3, 1)
    } else {
        ((count - 4) / 3, 2)
    };
    let mut out = String::with_capacity((em_count + en_count) * 3);
    for _ in 0..em_count {
        out.push('\u{2014}');
    }
    for _ in 0..en_count {
        out.push('\u{2013}');
    }
    out
}

/// Apply the ordinary-text smart substitutions: every `...` becomes `…`,
/// then every run of two or more `-` becomes dashes per [`smart_dashes`].
pub(crate) fn replace_ellipses_and_dashes(text: &str) -> String {
    let text = text.replace("...", "\u{2026}");
    if !text.contains("--") {
        return text;
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(start) = rest.find('-') {
        out.push_str(&rest[..start]);
        let run = rest[start..].bytes().take_while(|&b| b == b'-').count();
        if run >= 2 {
            out.push_str(&smart_dashes(run));
        } else {
            out.push('-');
        }
        rest = &rest[start + run..];
    }
    out.push_str(rest);
    out
}

/// Provisional literal emitted when a smart quote delimiter is pushed.
/// The emphasis resolver rewrites it once the pairing is known.
pub(crate) fn provisional_quote(ch: char) -> &'static str {
    match ch {
        '\'' => "\u{2019}",
        _ => "\u{201C}",
    }
}

/// Final literal for a quote delimiter acting as a closer.
pub(crate) fn closing_quote(ch: char) -> &'static str {
    match ch {
        '\'' => "\u{2019}",
        _ => "\u{201D}",
    }
}

/// Final literal for a quote delimiter acting as a matched opener.
pub(crate) fn opening_quote(ch: char) -> &'static str {
    match ch {
        '\'' => "\u{2018}",
        _ => "\u{201C}",
    }
}
