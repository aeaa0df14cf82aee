use crate::config::{LayoutConfig, Orientation};

use super::graph::SankeyGraph;
use super::scale::LinearScale;

/// Every node gets the fixed thickness on the layer axis and at least one
/// unit along the cross axis, so tiny flows stay visible.
pub(super) fn size_nodes(graph: &mut SankeyGraph, scale: &LinearScale, config: &LayoutConfig) {
    let thickness = config.node_thickness();
    for node in &mut graph.nodes {
        let major = scale.apply(node.value).max(1.0);
        match config.orientation {
            Orientation::Horizontal => {
                node.width = thickness;
                node.height = major;
            }
            Orientation::Vertical => {
                node.width = major;
                node.height = thickness;
            }
        }
    }
}
