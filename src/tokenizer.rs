//! A default [`Tokenizer`] implementation, for callers that have no word
//! tokenizer of their own to plug into the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::pipeline::Tokenizer;

/// Matched in priority order: a URL, an email address, a number (optionally
/// signed, with internal grouping separators), a word (letters joined by a
/// single internal apostrophe or hyphen), a run of sentence-ending
/// punctuation, a run of dashes, and finally any single non-whitespace
/// character as a fallback.
static WORD_TOKENIZATION_RULES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \w+://[\w$@.&+\-/]+
        | [\w.+\-]+@[\w\-]+\.[\w.\-]+
        | [+\-]?[0-9][0-9,.\-]*[0-9]?
        | \w+(?:['’`\-]\w+)*
        | [.!?]+
        | \-+
        | \S
        ",
    )
    .unwrap()
});

/// A general-purpose word tokenizer good for URLs, emails, numbers, and
/// apostrophe/hyphen-joined words, adapted from the reference
/// `RegexTokenizer` of the system this crate's pipeline is grounded on.
///
/// Unlike that reference, this version drops the Cyrillic-specific
/// `[0-9]+-word` rule and the combining-acute-accent (`U+0301`) special
/// casing, since neither is needed once the input is normalized to NFC
/// before reaching the tokenizer; everything else carries over.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, input: &str) -> Vec<String> {
        WORD_TOKENIZATION_RULES
            .find_iter(input)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
