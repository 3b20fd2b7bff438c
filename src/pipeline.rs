//! The pipeline orchestrator: wires a [`Translator`], an [`Aligner`], and a
//! [`Tokenizer`] together into a single `translate` call that preserves
//! markup across the round trip.

use crate::aligned_segments::AlignedSegments;
use crate::alignment::Alignment;
use crate::config::PipelineConfig;
use crate::error::{MarkupError, MarkupResult};
use crate::segmented_text::SegmentedText;
use crate::views::{aligner_view, translator_view};

/// External machine translation capability: given translator-view text,
/// returns the sentence split it used on the source alongside the
/// translated sentences, in the same order and count.
pub trait Translator {
    fn translate(&self, input: &str) -> MarkupResult<(Vec<String>, Vec<String>)>;
}

/// External word alignment capability: given parallel batches of tokenized
/// sentences, returns token index pairs `(src_index, tgt_index)` per
/// sentence.
pub trait Aligner {
    fn align(&self, src_batch: &[Vec<String>], tgt_batch: &[Vec<String>]) -> MarkupResult<Vec<Vec<(usize, usize)>>>;
}

/// Word tokenization capability applied within TEXT segments.
pub trait Tokenizer {
    fn tokenize(&self, input: &str) -> Vec<String>;
}

/// Orchestrates the full markup-preserving translation of one string.
pub struct MarkupTranslator<'a> {
    translator: &'a dyn Translator,
    aligner: &'a dyn Aligner,
    tokenizer: &'a dyn Tokenizer,
    config: PipelineConfig,
}

impl<'a> MarkupTranslator<'a> {
    pub fn new(translator: &'a dyn Translator, aligner: &'a dyn Aligner, tokenizer: &'a dyn Tokenizer) -> Self {
        MarkupTranslator {
            translator,
            aligner,
            tokenizer,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    fn align_segments(&self, src: &SegmentedText, tgt: &SegmentedText) -> MarkupResult<AlignedSegments> {
        let src_sentences = src.split_sentences();
        let tgt_sentences = tgt.split_sentences();

        let src_batch: Vec<Vec<String>> = src_sentences
            .iter()
            .map(|sent| sent.iter().map(|s| s.surface().to_string()).collect())
            .collect();
        let tgt_batch: Vec<Vec<String>> = tgt_sentences
            .iter()
            .map(|sent| sent.iter().map(|s| s.surface().to_string()).collect())
            .collect();

        let pairwise = self.aligner.align(&src_batch, &tgt_batch)?;

        let mut merged = Alignment::new();
        for ((src_sentence, tgt_sentence), pairs) in src_sentences.iter().zip(tgt_sentences.iter()).zip(pairwise) {
            for (i, j) in pairs {
                let src_seg = src_sentence.get(i).ok_or(MarkupError::AlignerIndex(i))?;
                let tgt_seg = tgt_sentence.get(j).ok_or(MarkupError::AlignerIndex(j))?;
                merged.add(src_seg.id(), tgt_seg.id());
            }
        }
        Ok(AlignedSegments::new(src.clone(), tgt.clone(), merged))
    }

    /// Translates `src`, preserving every placeholder tag, paired tag, and
    /// unusual whitespace run it contains.
    pub fn translate(&self, src: &str) -> MarkupResult<String> {
        let src = src.replace('\u{a0}', " ");

        let src_segments = SegmentedText::from_string(&src)?;
        let src_segments = src_segments.tokenize(self.tokenizer);

        let (src_for_translation, src_segments_to_src_for_translation_alignment) =
            translator_view(&src_segments, &self.config);
        let src_segments_to_src_for_translation = AlignedSegments::new(
            src_segments,
            src_for_translation.clone(),
            src_segments_to_src_for_translation_alignment,
        );

        log::info!("running translation");
        let (src_sentences, tgt_sentences) = self.translator.translate(&src_for_translation.text())?;
        if src_sentences.len() != tgt_sentences.len() {
            return Err(MarkupError::SentenceCountMismatch {
                src: src_sentences.len(),
                tgt: tgt_sentences.len(),
            });
        }

        let src_sentences = SegmentedText::from_sentences(&src_sentences)?;
        let src_sentences = src_sentences.tokenize(self.tokenizer);
        let (src_tokens, src_sentences_to_src_tokens_alignment) = aligner_view(&src_sentences);
        let src_sentences_to_src_tokens =
            AlignedSegments::new(src_sentences.clone(), src_tokens.clone(), src_sentences_to_src_tokens_alignment);

        let mut src_for_translation_to_src_sentences =
            AlignedSegments::new(src_for_translation, src_sentences, Alignment::new());
        src_for_translation_to_src_sentences.recover_alignment()?;

        let tgt_sentences = SegmentedText::from_sentences(&tgt_sentences)?;
        let tgt_sentences = tgt_sentences.tokenize(self.tokenizer);
        let (tgt_tokens, tgt_sentences_to_tgt_tokens_alignment) = aligner_view(&tgt_sentences);
        let tgt_sentences_to_tgt_tokens =
            AlignedSegments::new(tgt_sentences, tgt_tokens.clone(), tgt_sentences_to_tgt_tokens_alignment);
        let tgt_tokens_to_tgt_sentences = tgt_sentences_to_tgt_tokens.swap_sides();

        log::info!("running word alignment");
        let mut src_tokens_to_tgt_tokens = self.align_segments(&src_tokens, &tgt_tokens)?;
        src_tokens_to_tgt_tokens.recover_newline_alignment()?;

        let mut src_for_translation_to_tgt_sentences = src_for_translation_to_src_sentences
            .compose(src_sentences_to_src_tokens)?
            .compose(src_tokens_to_tgt_tokens)?
            .compose(tgt_tokens_to_tgt_sentences)?;

        src_for_translation_to_tgt_sentences.infer_whitespace_alignment();

        let mut src_segments_to_tgt_sentences =
            src_segments_to_src_for_translation.compose(src_for_translation_to_tgt_sentences)?;

        log::debug!("reinserting paired tags");
        src_segments_to_tgt_sentences.reinsert_tags()?;
        log::debug!("reinserting original whitespace");
        src_segments_to_tgt_sentences.reinsert_whitespace();
        log::debug!("reinserting unaligned segments");
        src_segments_to_tgt_sentences.reinsert_segments();

        Ok(src_segments_to_tgt_sentences.tgt.text())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Enables `log` output for a test run via `RUST_LOG`; safe to call from
    /// every test since `env_logger::try_init` is idempotent across calls.
    pub fn init_logging() {
        let _ = env_logger::try_init();
    }

    /// Splits text on sentence-ending punctuation. Runs of newlines are
    /// treated as a unit and appended to the previously emitted sentence
    /// rather than starting a new one, so `"foo.\n\nbar."` yields
    /// `["foo.\n\n", "bar."]`.
    ///
    /// A single space sitting between two sentences on the same line (no
    /// newline between them) is kept as trailing content of the sentence it
    /// follows rather than dropped, so that `concat(sentences)` reproduces the
    /// input exactly for that case — matching the `Translator` contract's
    /// "modulo trailing sentence spaces" requirement instead of silently
    /// losing a character of input text.
    pub fn split_sentences(text: &str) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_is_newline: Option<bool> = None;
        for ch in text.chars() {
            let is_nl = ch == '\n';
            if current_is_newline.is_none() || current_is_newline == Some(is_nl) {
                current.push(ch);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push(ch);
            }
            current_is_newline = Some(is_nl);
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        let mut sentences: Vec<String> = Vec::new();
        for chunk in chunks {
            if chunk.starts_with('\n') {
                if let Some(last) = sentences.last_mut() {
                    last.push_str(&chunk);
                }
                continue;
            }
            let mut sentence = String::new();
            for ch in chunk.chars() {
                sentence.push(ch);
                if matches!(ch, '.' | '!' | '?') {
                    sentences.push(std::mem::take(&mut sentence));
                }
            }
        }

        if let Some(first) = sentences.first_mut() {
            let leading_len = first.chars().take_while(|&c| c == ' ').count();
            if leading_len > 0 {
                first.replace_range(..leading_len, "");
            }
        }
        for i in 1..sentences.len() {
            let leading_len = sentences[i].chars().take_while(|&c| c == ' ').count();
            if leading_len == 0 {
                continue;
            }
            let boundary = sentences[i][..leading_len].to_string();
            sentences[i].replace_range(..leading_len, "");
            if !sentences[i - 1].ends_with('\n') {
                sentences[i - 1].push_str(&boundary);
            }
        }

        sentences
    }

    pub struct DummyTranslator;
    impl Translator for DummyTranslator {
        fn translate(&self, input: &str) -> MarkupResult<(Vec<String>, Vec<String>)> {
            let mut tgt = input.replace("Ahoj světe", "Hello world");
            tgt = tgt.replace("Jak se máš", "How are you");
            tgt = tgt.replace("Mám se fajn", "I am fine");
            Ok((split_sentences(input), split_sentences(&tgt)))
        }
    }

    pub struct IdentityAligner;
    impl Aligner for IdentityAligner {
        fn align(&self, src_batch: &[Vec<String>], _tgt_batch: &[Vec<String>]) -> MarkupResult<Vec<Vec<(usize, usize)>>> {
            Ok(src_batch.iter().map(|sent| (0..sent.len()).map(|i| (i, i)).collect()).collect())
        }
    }

    pub struct WhitespaceTokenizer;
    impl Tokenizer for WhitespaceTokenizer {
        fn tokenize(&self, input: &str) -> Vec<String> {
            let tokens: Vec<String> = input.split_whitespace().map(|t| t.to_string()).collect();
            if tokens.is_empty() {
                vec![input.to_string()]
            } else {
                tokens
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn translates_plain_text_without_markup() {
        init_logging();
        let translator = DummyTranslator;
        let aligner = IdentityAligner;
        let tokenizer = WhitespaceTokenizer;
        let pipeline = MarkupTranslator::new(&translator, &aligner, &tokenizer);

        let src = "Ahoj světe! Jak se máš?\n\nMám se fajn.\n\n";
        let out = pipeline.translate(src).unwrap();
        assert_eq!(out, "Hello world! How are you?\n\nI am fine.\n\n");
    }

    #[test]
    fn preserves_placeholder_and_paired_tags() {
        init_logging();
        let translator = DummyTranslator;
        let aligner = IdentityAligner;
        let tokenizer = WhitespaceTokenizer;
        let pipeline = MarkupTranslator::new(&translator, &aligner, &tokenizer);

        let src = "Ahoj <g id='1'>světe</g>!<ex id='2'/> Jak se máš?\n\n<bx id='3'/>Mám se <g id='4'>fajn</g>.\n\n";
        let out = pipeline.translate(src).unwrap();
        assert!(out.contains("<g id='1'>"));
        assert!(out.contains("</g>"));
        assert!(out.contains("<ex id='2'/>"));
        assert!(out.contains("<bx id='3'/>"));
    }

    #[test]
    fn propagates_sentence_count_mismatch() {
        init_logging();
        struct UnevenTranslator;
        impl Translator for UnevenTranslator {
            fn translate(&self, _input: &str) -> MarkupResult<(Vec<String>, Vec<String>)> {
                Ok((vec!["one.".to_string(), "two.".to_string()], vec!["jedna.".to_string()]))
            }
        }
        let translator = UnevenTranslator;
        let aligner = IdentityAligner;
        let tokenizer = WhitespaceTokenizer;
        let pipeline = MarkupTranslator::new(&translator, &aligner, &tokenizer);

        let err = pipeline.translate("one. two.").unwrap_err();
        assert!(matches!(err, MarkupError::SentenceCountMismatch { src: 2, tgt: 1 }));
    }
}
