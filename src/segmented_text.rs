//! [`SegmentedText`]: an ordered, lossless sequence of [`Segment`]s.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MarkupError, MarkupResult};
use crate::segment::{Segment, SegmentId};

/// The single regex alternation that tokenizes raw markup-bearing text.
///
/// Matched in priority order (§4.B): a paired `g` tag or one of the other
/// placeholder tags, a newline, a run of non-newline whitespace, a run of
/// non-`<` non-whitespace characters, and finally a run of non-`>`
/// non-whitespace characters (this last branch lets stray, unrecognized `<`
/// characters still end up inside a TEXT segment instead of stalling the lexer).
static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:</?(?:g|x|bx|ex|lb|mrk)[^>]*>)|\n|[^\S\n]+|[^<\s]+|[^>\s]+").unwrap()
});

/// An ordered sequence of [`Segment`]s whose surface strings, concatenated in
/// order, reproduce the text the sequence was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedText {
    segments: Vec<Segment>,
}

impl SegmentedText {
    pub fn new(segments: Vec<Segment>) -> Self {
        SegmentedText { segments }
    }

    pub fn empty() -> Self {
        SegmentedText { segments: Vec::new() }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn insert(&mut self, index: usize, segment: Segment) {
        self.segments.insert(index, segment);
    }

    /// Concatenation of every segment's surface string.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::surface).collect()
    }

    /// Lossless parse of a string into segments, per the lexer priority in §4.B.
    pub fn from_string(input: &str) -> MarkupResult<Self> {
        let mut segments = Vec::new();
        let mut reconstructed = String::new();
        for mat in SEGMENT_REGEX.find_iter(input) {
            reconstructed.push_str(mat.as_str());
            segments.push(Segment::from_token(mat.as_str())?);
        }
        if reconstructed != input {
            return Err(MarkupError::LossySegmentation {
                input: input.to_string(),
                reconstructed,
            });
        }
        Ok(SegmentedText { segments })
    }

    /// Parses each sentence independently and interleaves a
    /// [`Segment::sentence_separator`] between consecutive sentences (never
    /// after the last one).
    pub fn from_sentences(sentences: &[String]) -> MarkupResult<Self> {
        let mut segments = Vec::new();
        for (i, sentence) in sentences.iter().enumerate() {
            if i > 0 {
                segments.push(Segment::sentence_separator());
            }
            segments.extend(SegmentedText::from_string(sentence)?.segments);
        }
        Ok(SegmentedText { segments })
    }

    /// Runs `tokenizer` over every TEXT segment's surface string; if it splits
    /// the surface into more than one token, the TEXT segment is replaced by
    /// that many new TEXT segments (fresh identities). A single-token result,
    /// or a non-TEXT segment, passes through with identity preserved.
    pub fn tokenize(&self, tokenizer: &dyn crate::pipeline::Tokenizer) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            if seg.is_text() {
                let tokens = tokenizer.tokenize(seg.surface());
                if tokens.len() > 1 {
                    segments.extend(tokens.into_iter().map(Segment::text));
                    continue;
                }
            }
            segments.push(seg.clone());
        }
        SegmentedText { segments }
    }

    /// Splits on [`Segment::is_sentence_separator`] boundaries, excluding the
    /// separators themselves. Returns an owned, restartable collection of
    /// sub-sequences rather than a borrowing iterator, since segments are
    /// cheap to clone.
    pub fn split_sentences(&self) -> Vec<SegmentedText> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for seg in &self.segments {
            if seg.is_sentence_separator() {
                sentences.push(SegmentedText::new(std::mem::take(&mut current)));
            } else {
                current.push(seg.clone());
            }
        }
        sentences.push(SegmentedText::new(current));
        sentences
    }

    /// Builds a fresh `SegmentId -> position` index. Recomputed on demand
    /// rather than cached, since segments are never removed except through
    /// [`crate::aligned_segments::AlignedSegments`], which owns its own
    /// `SegmentedText` values.
    pub fn position_index(&self) -> HashMap<SegmentId, usize> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, seg)| (seg.id(), i))
            .collect()
    }

    pub fn position_of(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|seg| seg.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn count_newlines(&self) -> usize {
        self.segments.iter().filter(|seg| seg.is_newline()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }
}

impl<'a> IntoIterator for &'a SegmentedText {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
