//! Alignment recovery: reconstructing an [`Alignment`] between two
//! [`SegmentedText`]s whose TEXT content is known to agree, plus the
//! whitespace-inference pass that fills in gaps without crossing existing
//! pairs.

use crate::aligned_segments::AlignedSegments;
use crate::error::{MarkupError, MarkupResult};

impl AlignedSegments {
    /// Greedily reconstructs the alignment from segment equality. Assumes
    /// `self.alignment` is currently empty.
    ///
    /// Walks `tgt`'s non-whitespace segments in order; for each one, consumes
    /// `src` segments (skipping non-newline whitespace) until their
    /// concatenated surface matches the target segment's surface exactly,
    /// aligning every consumed source segment to it. A target segment's
    /// surface may therefore be composed of more than one source segment
    /// (`src: "Hello", "world"`, `tgt: "Helloworld"`), but never the reverse.
    pub fn recover_alignment(&mut self) -> MarkupResult<()> {
        let mut src_iter = self
            .src
            .iter()
            .filter(|seg| !seg.is_whitespace() || seg.is_newline())
            .peekable();
        let tgt_nonwhitespace = self
            .tgt
            .iter()
            .filter(|seg| (!seg.is_whitespace() && !seg.is_sentence_separator()) || seg.is_newline());

        for seg_tgt in tgt_nonwhitespace {
            let mut remaining = seg_tgt.surface().to_string();
            loop {
                let seg_src = src_iter.next().ok_or(MarkupError::UnrecoverableAlignment)?;
                if seg_src.surface() == remaining {
                    self.alignment.add(seg_src.id(), seg_tgt.id());
                    break;
                } else if remaining.starts_with(seg_src.surface()) && !seg_src.surface().is_empty() {
                    self.alignment.add(seg_src.id(), seg_tgt.id());
                    remaining = remaining[seg_src.surface().len()..].to_string();
                } else {
                    return Err(MarkupError::UnrecoverableAlignment);
                }
            }
        }
        if src_iter.next().is_some() {
            return Err(MarkupError::UnrecoverableAlignment);
        }
        Ok(())
    }

    /// Pairs up every `"\n"` segment of `src` with the corresponding `"\n"`
    /// segment of `tgt`, in order. Fails with [`MarkupError::NewlineMismatch`]
    /// if the counts differ.
    pub fn recover_newline_alignment(&mut self) -> MarkupResult<()> {
        let src_newlines: Vec<_> = self.src.iter().filter(|s| s.is_newline()).map(|s| s.id()).collect();
        let tgt_newlines: Vec<_> = self.tgt.iter().filter(|s| s.is_newline()).map(|s| s.id()).collect();
        if src_newlines.len() != tgt_newlines.len() {
            return Err(MarkupError::NewlineMismatch {
                src: src_newlines.len(),
                tgt: tgt_newlines.len(),
            });
        }
        for (s, t) in src_newlines.into_iter().zip(tgt_newlines) {
            self.alignment.add(s, t);
        }
        Ok(())
    }

    /// Fills in whitespace alignments that fit strictly between the nearest
    /// surrounding alignments, so no newly inferred pair crosses one that
    /// already exists.
    pub fn infer_whitespace_alignment(&mut self) {
        let rightmost = self.rightmost_alignment_by_src();
        let leftmost = self.leftmost_alignment_by_src();
        let src_segments: Vec<_> = self.src.iter().cloned().collect();
        for (i, seg_src) in src_segments.iter().enumerate() {
            if !seg_src.is_whitespace() || self.alignment.is_src_aligned(seg_src.id()) {
                continue;
            }
            let lo = rightmost[i] + 1;
            let hi = leftmost[i];
            if lo >= hi {
                continue;
            }
            for j in lo..hi {
                if j < 0 {
                    continue;
                }
                let Some(seg_tgt) = self.tgt.get(j as usize) else {
                    continue;
                };
                if seg_tgt.is_whitespace() && !self.alignment.is_tgt_aligned(seg_tgt.id()) {
                    self.alignment.add(seg_src.id(), seg_tgt.id());
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::segmented_text::SegmentedText;

    #[test]
    fn recovers_word_alignment_against_a_whitespace_stripped_view() {
        // Mirrors how recover_alignment is actually used in the pipeline: both
        // sides carry the same underlying text, just segmented differently
        // (here, tgt has already had its whitespace dropped, as aligner_view
        // would do).
        let src = SegmentedText::from_string("Hello world").unwrap();
        let tgt = SegmentedText::new(vec![crate::segment::Segment::text("Hello"), crate::segment::Segment::text("world")]);
        let mut aligned = AlignedSegments::new(src, tgt, Alignment::new());
        aligned.recover_alignment().unwrap();
        assert_eq!(aligned.alignment.pairs().len(), 2);
    }

    #[test]
    fn recovers_many_to_one_composition() {
        let src = SegmentedText::new(vec![crate::segment::Segment::text("Hello"), crate::segment::Segment::text("world")]);
        let tgt = SegmentedText::new(vec![crate::segment::Segment::text("Helloworld")]);
        let mut aligned = AlignedSegments::new(src, tgt, Alignment::new());
        aligned.recover_alignment().unwrap();
        assert_eq!(aligned.alignment.pairs().len(), 2);
    }

    #[test]
    fn fails_when_src_has_leftover_segments() {
        let src = SegmentedText::new(vec![crate::segment::Segment::text("a"), crate::segment::Segment::text("b")]);
        let tgt = SegmentedText::new(vec![crate::segment::Segment::text("a")]);
        let mut aligned = AlignedSegments::new(src, tgt, Alignment::new());
        assert!(matches!(
            aligned.recover_alignment(),
            Err(MarkupError::UnrecoverableAlignment)
        ));
    }

    #[test]
    fn newline_alignment_requires_equal_counts() {
        let src = SegmentedText::from_string("a\nb").unwrap();
        let tgt = SegmentedText::from_string("a b").unwrap();
        let mut aligned = AlignedSegments::new(src, tgt, Alignment::new());
        assert!(matches!(
            aligned.recover_newline_alignment(),
            Err(MarkupError::NewlineMismatch { src: 1, tgt: 0 })
        ));
    }

    #[test]
    fn infers_whitespace_between_existing_pairs() {
        let a = crate::segment::Segment::text("a");
        let ws_src = crate::segment::Segment::whitespace(" ");
        let b = crate::segment::Segment::text("b");
        let a2 = a.duplicate();
        let ws_tgt = crate::segment::Segment::whitespace(" ");
        let b2 = b.duplicate();
        let mut alignment = Alignment::new();
        alignment.add(a.id(), a2.id());
        alignment.add(b.id(), b2.id());
        let src = SegmentedText::new(vec![a, ws_src, b]);
        let tgt = SegmentedText::new(vec![a2, ws_tgt.clone(), b2]);
        let mut aligned = AlignedSegments::new(src, tgt, alignment);
        aligned.infer_whitespace_alignment();
        assert!(aligned.alignment.is_tgt_aligned(ws_tgt.id()));
    }
}
