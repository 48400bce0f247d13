use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::CompositingRegion;
use crate::foundation::error::{ViewerError, ViewerResult};

/// Per-invocation configuration of the viewer sink.
///
/// All fields are read-only inputs supplied by the surrounding evaluator. The JSON form uses the
/// field names as written here; missing fields take their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    /// Conform the output to the compositing region instead of the input's extent.
    pub treat_as_composite_output: bool,
    /// Region used when `treat_as_composite_output` is set, and as the fallback canvas for
    /// single-value inputs.
    pub compositing_region: CompositingRegion,
    /// Force the output alpha to 1.
    pub ignore_alpha: bool,
    /// Whether the "Alpha" socket is fed by another node.
    pub alpha_input_is_linked: bool,
}

impl SinkConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ViewerResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ViewerError::serde(format!("parse sink config JSON: {e}")))
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> ViewerResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| ViewerError::serde(format!("parse sink config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ViewerError::validation(format!("open sink config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> ViewerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ViewerError::serde(format!("serialize sink config: {e}")))
    }

    /// Return a config that conforms the output to `region`.
    pub fn with_composite_region(mut self, region: CompositingRegion) -> Self {
        self.treat_as_composite_output = true;
        self.compositing_region = region;
        self
    }

    /// Return a config with `region` as fallback canvas only.
    pub fn with_fallback_region(mut self, region: CompositingRegion) -> Self {
        self.compositing_region = region;
        self
    }

    /// Return a config with the ignore-alpha setting.
    pub fn with_ignore_alpha(mut self, ignore_alpha: bool) -> Self {
        self.ignore_alpha = ignore_alpha;
        self
    }

    /// Return a config with the alpha link state.
    pub fn with_alpha_linked(mut self, linked: bool) -> Self {
        self.alpha_input_is_linked = linked;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sink/config.rs"]
mod tests;
