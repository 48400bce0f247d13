use crate::buffer::pixel::PixelBuffer;
use crate::sink::config::SinkConfig;

/// How the sink produces its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Both inputs are single values: fill with one color.
    Clear,
    /// Write the image with alpha forced to 1.
    IgnoreAlpha,
    /// Write the image unchanged.
    Copy,
    /// Write the image RGB with alpha taken from the alpha input.
    SetAlpha,
}

impl Strategy {
    /// Stable lowercase name, used in logs and by the GPU kernel table.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Clear => "clear",
            Strategy::IgnoreAlpha => "ignore_alpha",
            Strategy::Copy => "copy",
            Strategy::SetAlpha => "set_alpha",
        }
    }
}

/// Pick the cheapest strategy that yields the right output. First match wins.
pub fn select_strategy(image: &PixelBuffer, alpha: &PixelBuffer, config: &SinkConfig) -> Strategy {
    let strategy = if image.is_single_value() && alpha.is_single_value() {
        Strategy::Clear
    } else if config.ignore_alpha {
        Strategy::IgnoreAlpha
    } else if !config.alpha_input_is_linked {
        Strategy::Copy
    } else {
        Strategy::SetAlpha
    };
    tracing::debug!(strategy = strategy.name(), "selected viewer strategy");
    strategy
}

#[cfg(test)]
#[path = "../../tests/unit/sink/strategy.rs"]
mod tests;
