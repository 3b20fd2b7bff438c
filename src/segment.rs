//! The [`Segment`] value type and its identity allocation.
//!
//! A `Segment` is a tagged union over the five kinds of atomic content a
//! tagged text is broken into: plain text, whitespace, self-closing
//! placeholder tags, paired group tags, and the zero-length sentence
//! separator used internally once a text has been split into sentences.
//!
//! Every segment additionally carries a [`SegmentId`] that is unique for the
//! lifetime of the process. Two segments with identical surface strings
//! (the word "the" occurring twice, say) must still be distinguishable as
//! alignment keys, so identity is never derived from content.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MarkupError, MarkupResult};

static PAIRED_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^</?g[^>]*>$").unwrap());
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^</?(?:x|bx|ex|lb|mrk)[^>]*>$").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+$").unwrap());

/// Process-unique identity for a [`Segment`], independent of its surface string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl SegmentId {
    fn fresh() -> Self {
        SegmentId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The fixed vocabulary of self-closing placeholder tags (§6 of the spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
    X,
    Bx,
    Ex,
    Lb,
    Mrk,
}

impl TagName {
    pub fn as_str(self) -> &'static str {
        match self {
            TagName::X => "x",
            TagName::Bx => "bx",
            TagName::Ex => "ex",
            TagName::Lb => "lb",
            TagName::Mrk => "mrk",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(TagName::X),
            "bx" => Some(TagName::Bx),
            "ex" => Some(TagName::Ex),
            "lb" => Some(TagName::Lb),
            "mrk" => Some(TagName::Mrk),
            _ => None,
        }
    }
}

/// The kind-specific payload of a [`Segment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Whitespace,
    Tag { name: TagName },
    /// Currently only `name == "g"`, kept as a field for parity with the spec's
    /// data model rather than hard-coded, since the surface vocabulary is
    /// expected to grow before the nesting semantics do.
    PairedTag { name: String, opening: bool },
    SentenceSeparator,
}

/// An atomic unit of a [`crate::segmented_text::SegmentedText`].
///
/// `surface` is the exact original text so that concatenating the surfaces of
/// every segment in a `SegmentedText` reproduces the string it was parsed
/// from byte-for-byte (the sentence separator's surface is the empty string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: SegmentId,
    surface: String,
    kind: SegmentKind,
}

impl Segment {
    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, SegmentKind::Text)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, SegmentKind::Whitespace)
    }

    pub fn is_newline(&self) -> bool {
        self.is_whitespace() && self.surface == "\n"
    }

    pub fn is_tag(&self) -> bool {
        matches!(self.kind, SegmentKind::Tag { .. })
    }

    pub fn tag_name(&self) -> Option<TagName> {
        match self.kind {
            SegmentKind::Tag { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_paired_tag(&self) -> bool {
        matches!(self.kind, SegmentKind::PairedTag { .. })
    }

    pub fn is_paired_opening(&self) -> bool {
        matches!(self.kind, SegmentKind::PairedTag { opening: true, .. })
    }

    pub fn is_sentence_separator(&self) -> bool {
        matches!(self.kind, SegmentKind::SentenceSeparator)
    }

    pub fn text(surface: impl Into<String>) -> Self {
        Segment {
            id: SegmentId::fresh(),
            surface: surface.into(),
            kind: SegmentKind::Text,
        }
    }

    pub fn whitespace(surface: impl Into<String>) -> Self {
        Segment {
            id: SegmentId::fresh(),
            surface: surface.into(),
            kind: SegmentKind::Whitespace,
        }
    }

    pub fn sentence_separator() -> Self {
        Segment {
            id: SegmentId::fresh(),
            surface: String::new(),
            kind: SegmentKind::SentenceSeparator,
        }
    }

    /// Classifies a raw token into the right `Segment` variant, assigning it
    /// a fresh identity.
    ///
    /// Classification order matches §4.A: a paired `g` tag, then one of the
    /// other placeholder tags, then whitespace, then plain text. A token that
    /// merely *looks* tag-shaped (`<...>`) but names something outside the
    /// fixed vocabulary falls through to TEXT, exactly like any other run of
    /// non-whitespace characters.
    pub fn from_token(token: &str) -> MarkupResult<Self> {
        if PAIRED_TAG_REGEX.is_match(token) {
            let opening = parse_paired_g(token)?;
            return Ok(Segment {
                id: SegmentId::fresh(),
                surface: token.to_string(),
                kind: SegmentKind::PairedTag {
                    name: "g".to_string(),
                    opening,
                },
            });
        }
        if TAG_REGEX.is_match(token) {
            let name = extract_tag_name(token)?;
            let tag_name = TagName::parse(&name).ok_or_else(|| MarkupError::MalformedTag(token.to_string()))?;
            return Ok(Segment {
                id: SegmentId::fresh(),
                surface: token.to_string(),
                kind: SegmentKind::Tag { name: tag_name },
            });
        }
        if WHITESPACE_REGEX.is_match(token) {
            return Ok(Segment::whitespace(token));
        }
        Ok(Segment::text(token))
    }

    /// Produces a structurally identical segment with a fresh identity, used
    /// whenever a view projection carries a segment over unchanged but still
    /// needs to align the old and new occurrences as distinct entities.
    pub fn duplicate(&self) -> Self {
        Segment {
            id: SegmentId::fresh(),
            surface: self.surface.clone(),
            kind: self.kind.clone(),
        }
    }
}

fn parse_paired_g(token: &str) -> MarkupResult<bool> {
    if token == "</g>" {
        Ok(false)
    } else if token.starts_with("<g") {
        Ok(true)
    } else {
        Err(MarkupError::MalformedTag(token.to_string()))
    }
}

fn extract_tag_name(token: &str) -> MarkupResult<String> {
    if let Some(rest) = token.strip_prefix("</") {
        let name: String = rest.chars().take_while(|c| c.is_alphanumeric()).collect();
        if name.is_empty() {
            return Err(MarkupError::MalformedTag(token.to_string()));
        }
        return Ok(name);
    }
    if let Some(rest) = token.strip_prefix('<') {
        let name: String = rest.chars().take_while(|c| c.is_alphanumeric()).collect();
        if name.is_empty() {
            return Err(MarkupError::MalformedTag(token.to_string()));
        }
        return Ok(name);
    }
    Err(MarkupError::MalformedTag(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_text() {
        let seg = Segment::from_token("hello").unwrap();
        assert!(seg.is_text());
        assert_eq!(seg.surface(), "hello");
    }

    #[test]
    fn classifies_whitespace() {
        let seg = Segment::from_token("   ").unwrap();
        assert!(seg.is_whitespace());
    }

    #[test]
    fn classifies_newline_as_whitespace() {
        let seg = Segment::from_token("\n").unwrap();
        assert!(seg.is_whitespace());
        assert!(seg.is_newline());
    }

    #[test]
    fn classifies_placeholder_tag() {
        let seg = Segment::from_token("<x id='1'/>").unwrap();
        assert_eq!(seg.tag_name(), Some(TagName::X));
    }

    #[test]
    fn classifies_paired_tag_open_and_close() {
        let open = Segment::from_token("<g id='1'>").unwrap();
        assert!(open.is_paired_opening());
        let close = Segment::from_token("</g>").unwrap();
        assert!(close.is_paired_tag());
        assert!(!close.is_paired_opening());
    }

    #[test]
    fn tag_shaped_token_outside_vocabulary_is_text() {
        // "<bogus/>" never reaches from_token as one token in practice, since the
        // lexer's tag alternative only matches the fixed vocabulary, but
        // from_token itself must still degrade gracefully if handed one directly.
        let seg = Segment::from_token("<bogus/>").unwrap();
        assert!(seg.is_text());
    }

    #[test]
    fn ids_are_unique_even_for_equal_surfaces() {
        let a = Segment::text("the");
        let b = Segment::text("the");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.surface(), b.surface());
    }
}
