use crate::foundation::core::{Bounds, Domain, Int2};
use crate::sink::config::SinkConfig;
use crate::sink::plan::SinkInputs;

/// Domain the sink iterates over.
///
/// Composite outputs conform to the compositing region. Otherwise the first non-single-value
/// input (Image, then Alpha) decides, and a 1x1 result falls back to the region size.
pub fn resolve_domain(inputs: &SinkInputs<'_>, config: &SinkConfig) -> Domain {
    let region_size = config.compositing_region.size();
    if config.treat_as_composite_output {
        return region_size;
    }

    let natural = natural_domain(inputs);
    if natural.is_single() {
        region_size
    } else {
        natural
    }
}

/// Output rectangle this invocation writes, inclusive on both corners.
pub fn resolve_bounds(domain: Domain, config: &SinkConfig) -> Bounds {
    if config.treat_as_composite_output {
        let region = &config.compositing_region;
        return Bounds::new(region.origin(), region.max());
    }
    Bounds::new(Int2::ZERO, domain.size())
}

fn natural_domain(inputs: &SinkInputs<'_>) -> Domain {
    [inputs.image, inputs.alpha]
        .into_iter()
        .find(|b| !b.is_single_value())
        .map(|b| b.domain())
        .unwrap_or(Domain::SINGLE)
}

#[cfg(test)]
#[path = "../../tests/unit/sink/resolve.rs"]
mod tests;
