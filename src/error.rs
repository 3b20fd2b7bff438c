//! Error types for the markup-preserving translation pipeline.
//!
//! Every fallible operation in this crate returns a [`MarkupError`] rather than
//! a string or a boxed `dyn Error`, so callers can match on the precise failure
//! mode instead of parsing messages.

use thiserror::Error;

/// Convenient result alias that propagates [`MarkupError`] instances.
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors surfaced by the segmentation, alignment, and reinsertion stages.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("tag surface '{0}' could not be classified")]
    MalformedTag(String),
    #[error("segmentation of '{input}' lost characters: reconstructed '{reconstructed}'")]
    LossySegmentation { input: String, reconstructed: String },
    #[error("cannot compose alignments: target of left side does not match source of right side")]
    ComposeMismatch,
    #[error("greedy alignment recovery could not reconcile src and tgt text")]
    UnrecoverableAlignment,
    #[error("src has {src} newline(s) but tgt has {tgt}")]
    NewlineMismatch { src: usize, tgt: usize },
    #[error("paired tags do not nest correctly: {0}")]
    MalformedTagNesting(String),
    #[error("a paired tag is still open when a newline was encountered during tag reinsertion")]
    TagSpansNewline,
    #[error("attempted to remove an alignment pair that does not exist")]
    AbsentAlignment,
    #[error("aligner returned an out-of-range token index: {0}")]
    AlignerIndex(usize),
    #[error("translator returned {src} source sentence(s) but {tgt} target sentence(s)")]
    SentenceCountMismatch { src: usize, tgt: usize },
}
