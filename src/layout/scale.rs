use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LayoutConfig;

use super::graph::SankeyGraph;

/// Slack added to the extent per node, in multiples of the padding, so that
/// stacked nodes plus their gaps fit the cross axis.
const PADDING_SLACK_FACTOR: f32 = 2.5;

/// Linear value -> length mapping shared by node and link sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Builds the scale from the busiest layer: the largest per-layer value
    /// sum, plus padding slack, maps onto the available cross-axis length.
    pub fn for_graph(graph: &SankeyGraph, config: &LayoutConfig) -> Self {
        let mut layer_sums: BTreeMap<usize, f32> = BTreeMap::new();
        for node in &graph.nodes {
            *layer_sums.entry(node.layer()).or_insert(0.0) += node.value;
        }
        let busiest = layer_sums.values().copied().fold(0.0f32, f32::max);
        let slack = config.padding() * graph.nodes.len() as f32 * PADDING_SLACK_FACTOR;
        let scale = Self::new((0.0, busiest + slack), (0.0, config.cross_axis_length()));
        tracing::debug!(
            extent_max = scale.domain.1,
            range = scale.range.1,
            "built value scale"
        );
        scale
    }

    pub fn apply(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if !(span.is_finite() && span > 0.0) {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    pub fn extent(&self) -> (f32, f32) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}
