use serde::Deserialize;

/// Options controlling inline parsing.
///
/// The defaults give plain CommonMark behavior. Enabling `smart` turns
/// straight quotes into curly ones and substitutes typographic ellipses and
/// dashes in ordinary text.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    /// Smart punctuation: `'`/`"` become curly quotes, `...` becomes `…`,
    /// and runs of `-` become en and em dashes.
    pub smart: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle smart punctuation.
    pub fn smart(mut self, smart: bool) -> Self {
        self.smart = smart;
        self
    }
}
