//! Lossy projections of a [`SegmentedText`] used to feed the translator and
//! the aligner, each paired with an [`Alignment`] back into the original.

use crate::alignment::Alignment;
use crate::config::PipelineConfig;
use crate::segment::Segment;
use crate::segmented_text::SegmentedText;

/// Strips markup down to something closer to plain prose: tags are dropped
/// (placeholder tags configured as space-substituted become a literal space),
/// and whitespace other than `"\n"`/`" "` is normalized to a single space.
///
/// Returns the projected text together with an alignment from `source`'s
/// segments into the projection's segments.
pub fn translator_view(source: &SegmentedText, config: &PipelineConfig) -> (SegmentedText, Alignment) {
    let mut out = SegmentedText::empty();
    let mut alignment = Alignment::new();

    for seg in source.iter() {
        if seg.is_paired_tag() {
            continue;
        }
        if let Some(name) = seg.tag_name() {
            if config.treats_as_space(name.as_str()) {
                out.push(Segment::whitespace(" "));
            }
            continue;
        }
        if seg.is_whitespace() {
            let surface = seg.surface();
            let projected = if surface == "\n" || surface == " " {
                Segment::whitespace(surface)
            } else {
                Segment::whitespace(" ")
            };
            alignment.add(seg.id(), projected.id());
            out.push(projected);
            continue;
        }
        let projected = seg.duplicate();
        alignment.add(seg.id(), projected.id());
        out.push(projected);
    }

    (out, alignment)
}

/// Keeps only TEXT, SENTENCE_SEP, and newline WHITESPACE segments, the
/// minimal surface an external word aligner needs to operate on.
///
/// Returns the projected text together with an alignment from `source`'s
/// segments into the projection's segments.
pub fn aligner_view(source: &SegmentedText) -> (SegmentedText, Alignment) {
    let mut out = SegmentedText::empty();
    let mut alignment = Alignment::new();

    for seg in source.iter() {
        let keep = seg.is_text() || seg.is_sentence_separator() || seg.is_newline();
        if !keep {
            continue;
        }
        let projected = seg.duplicate();
        alignment.add(seg.id(), projected.id());
        out.push(projected);
    }

    (out, alignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translator_view_drops_paired_tags_and_x_becomes_space() {
        let source = SegmentedText::from_string("Ahoj <g id='1'>světe</g>!<x/> Jak").unwrap();
        let config = PipelineConfig::default();
        let (projected, _alignment) = translator_view(&source, &config);
        assert_eq!(projected.text(), "Ahoj světe!  Jak");
    }

    #[test]
    fn translator_view_normalizes_non_newline_whitespace() {
        let source = SegmentedText::from_string("a\tb").unwrap();
        let config = PipelineConfig::default();
        let (projected, _alignment) = translator_view(&source, &config);
        assert_eq!(projected.text(), "a b");
    }

    #[test]
    fn translator_view_preserves_newlines() {
        let source = SegmentedText::from_string("a\nb").unwrap();
        let config = PipelineConfig::default();
        let (projected, _alignment) = translator_view(&source, &config);
        assert_eq!(projected.text(), "a\nb");
    }

    #[test]
    fn aligner_view_keeps_only_text_and_structural_segments() {
        let source = SegmentedText::from_string("Ahoj <g id='1'>světe</g>!\n").unwrap();
        let (projected, _alignment) = aligner_view(&source);
        assert!(projected.iter().all(|s| s.is_text() || s.is_newline() || s.is_sentence_separator()));
        assert_eq!(projected.text(), "Ahojsvěte!\n");
    }
}
