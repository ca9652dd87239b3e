//! Character classes used by the flanking rules.

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Unicode whitespace. Covers the Zs category (including NBSP) plus the
/// ASCII control whitespace characters.
pub(crate) fn is_unicode_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Punctuation as the emphasis rules understand it: ASCII punctuation, or
/// anything in the Unicode `P` categories. Symbols (`S` categories) are not
/// punctuation here.
pub(crate) fn is_unicode_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_punctuation()
    } else {
        ch.general_category_group() == GeneralCategoryGroup::Punctuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_classes() {
        assert!(is_unicode_whitespace(' '));
        assert!(is_unicode_whitespace('\t'));
        assert!(is_unicode_whitespace('\n'));
        assert!(!is_unicode_whitespace('a'));

        assert!(is_unicode_punctuation('*'));
        assert!(is_unicode_punctuation('`'));
        assert!(is_unicode_punctuation('$'));
        assert!(!is_unicode_punctuation('a'));
        assert!(!is_unicode_punctuation('5'));
    }

    #[test]
    fn nbsp_counts_as_whitespace() {
        assert!(is_unicode_whitespace('\u{a0}'));
    }

    #[test]
    fn unicode_punctuation_is_p_categories_only() {
        assert!(is_unicode_punctuation('¡'));
        assert!(is_unicode_punctuation('。'));
        assert!(is_unicode_punctuation('“'));
        assert!(is_unicode_punctuation('—'));
        // currency and math symbols are S, not P
        assert!(!is_unicode_punctuation('€'));
        assert!(!is_unicode_punctuation('±'));
    }
}
