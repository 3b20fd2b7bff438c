//! Markup-preserving translation pipeline.
//!
//! A tagged-text string is segmented into atomic [`Segment`]s, projected into
//! lossy views suited to an external translator and word aligner, and the
//! resulting alignment is composed and walked backwards to reinsert the
//! markup the views dropped. See [`pipeline::MarkupTranslator`] for the
//! entry point.

mod alignment;
mod aligned_segments;
mod config;
mod error;
mod pipeline;
mod recovery;
mod reinsert;
mod segment;
mod segmented_text;
mod tokenizer;
mod views;

pub use crate::alignment::Alignment;
pub use crate::aligned_segments::AlignedSegments;
pub use crate::config::PipelineConfig;
pub use crate::error::{MarkupError, MarkupResult};
pub use crate::pipeline::{Aligner, MarkupTranslator, Tokenizer, Translator};
pub use crate::segment::{Segment, SegmentId, SegmentKind, TagName};
pub use crate::segmented_text::SegmentedText;
pub use crate::tokenizer::RegexTokenizer;
pub use crate::views::{aligner_view, translator_view};
