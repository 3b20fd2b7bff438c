//! Tunable knobs for the translation pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for the markup-preserving translation pipeline.
///
/// The pipeline's core algorithm is fixed by the spec it implements, but a few
/// surface choices are left to the caller, mirroring the way `ConversionOptions`
/// parameterizes the XLIFF-to-JLIFF conversion this crate's pipeline is a
/// sibling of. Unlike `ConversionOptions`, this type sits at a library
/// boundary that may be loaded from a host's own config file, so it derives
/// `Serialize`/`Deserialize` the way `jliff::model` types do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Self-closing placeholder tag names that create a word boundary and are
    /// therefore replaced by a single space in the translator view instead of
    /// being dropped outright.
    ///
    /// Defaults to `["x", "lb"]`, per the XLIFF convention that these tags
    /// typically stand in for a line break or an arbitrary inline element.
    pub space_substituted_tags: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            space_substituted_tags: vec!["x".to_string(), "lb".to_string()],
        }
    }
}

impl PipelineConfig {
    pub fn treats_as_space(&self, tag_name: &str) -> bool {
        self.space_substituted_tags.iter().any(|t| t == tag_name)
    }
}
