use serde::Serialize;

use crate::config::LayoutConfig;

use super::graph::SankeyGraph;

/// A layer counts as sparse when its stacked span, grown by this factor,
/// still fits the cross axis.
const SPARSE_LAYER_FACTOR: f32 = 1.2;
/// Share of the free cross-axis space handed out as extra gaps.
const SPREAD_SHARE: f32 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub layer: usize,
    /// Node indices in stacking order.
    pub nodes: Vec<usize>,
    /// Cross-axis length consumed by the stacked nodes and their padding.
    pub span: f32,
    /// Extra gap inserted between neighbours by the spread pass.
    pub extra_padding: f32,
}

pub(super) fn position_by_layer(graph: &mut SankeyGraph, config: &LayoutConfig, max_layer: usize) {
    let orientation = config.orientation;
    if max_layer == 0 {
        for node in &mut graph.nodes {
            node.set_layer_coord(orientation, 0.0);
        }
        return;
    }

    let length = config.layer_axis_length();
    let step = length / max_layer as f32;
    let thickness = config.node_thickness();
    for node in &mut graph.nodes {
        let layer = node.layer();
        let mut pos = layer as f32 * step;
        if layer == max_layer || pos >= length {
            pos -= thickness;
        }
        node.set_layer_coord(orientation, pos.max(0.0));
    }
}

pub(super) fn position_in_layer(graph: &mut SankeyGraph, config: &LayoutConfig) -> Vec<LayerSummary> {
    let orientation = config.orientation;
    let padding = config.padding();
    let mut summaries: Vec<LayerSummary> = Vec::new();
    let mut offset = 0.0f32;

    for &idx in &graph.order {
        let node = &mut graph.nodes[idx];
        let layer = node.layer();
        if summaries.last().map(|s| s.layer) != Some(layer) {
            offset = 0.0;
            summaries.push(LayerSummary {
                layer,
                nodes: Vec::new(),
                span: 0.0,
                extra_padding: 0.0,
            });
        }
        node.set_cross_coord(orientation, offset);
        let end = offset + node.cross_size(orientation);
        if let Some(summary) = summaries.last_mut() {
            summary.nodes.push(idx);
            summary.span = end;
        }
        offset = end + padding;
    }

    let total = config.cross_axis_length();
    for summary in &mut summaries {
        let count = summary.nodes.len();
        if count < 2 || summary.span * SPARSE_LAYER_FACTOR >= total {
            continue;
        }
        let extra = (total - summary.span) * SPREAD_SHARE / (count - 1) as f32;
        summary.extra_padding = extra;
        for (k, &idx) in summary.nodes.iter().enumerate().skip(1) {
            let node = &mut graph.nodes[idx];
            let pos = node.cross_coord(orientation) + k as f32 * extra;
            node.set_cross_coord(orientation, pos);
        }
    }

    tracing::debug!(layers = summaries.len(), "positioned nodes within layers");
    summaries
}
