use crate::config::{LayoutConfig, Orientation};
use crate::ir::{LinkRecord, NodeRecord};

use super::LayoutError;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Ingestion index; stable across layout passes.
    pub id: usize,
    pub name: String,
    /// Value as supplied by the caller, if any.
    pub supplied_value: Option<f32>,
    /// Resolved value, written by the layer assigner.
    pub value: f32,
    pub layer: Option<usize>,
    pub fill: String,
    pub story: Option<String>,
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: usize,
    pub source: usize,
    pub target: usize,
    pub value: f32,
    pub fill: String,
    pub story: Option<String>,
    pub thickness: f32,
    /// Cross-axis centre of the link where it leaves the source node.
    pub source_offset: f32,
    /// Cross-axis centre of the link where it enters the target node.
    pub target_offset: f32,
}

/// Dense node and link arrays. Links refer to nodes by index and nodes keep
/// index lists of their incident links, so nothing holds a reference cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SankeyGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Canonical node order (indices into `nodes`), fixed by layering.
    pub order: Vec<usize>,
    /// Link stacking order (indices into `links`), fixed by routing.
    pub link_order: Vec<usize>,
}

impl Node {
    pub fn layer(&self) -> usize {
        self.layer.unwrap_or(0)
    }

    pub fn is_source(&self) -> bool {
        self.incoming.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.outgoing.is_empty()
    }

    pub fn layer_coord(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn set_layer_coord(&mut self, orientation: Orientation, value: f32) {
        match orientation {
            Orientation::Horizontal => self.x = value,
            Orientation::Vertical => self.y = value,
        }
    }

    pub fn cross_coord(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    pub fn set_cross_coord(&mut self, orientation: Orientation, value: f32) {
        match orientation {
            Orientation::Horizontal => self.y = value,
            Orientation::Vertical => self.x = value,
        }
    }

    /// Size along the stacking axis; this is the side that scales with value.
    pub fn cross_size(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.height,
            Orientation::Vertical => self.width,
        }
    }
}

impl SankeyGraph {
    pub fn build(
        nodes: &[NodeRecord],
        links: &[LinkRecord],
        config: &LayoutConfig,
    ) -> Result<Self, LayoutError> {
        let node_count = nodes.len();
        let mut graph = SankeyGraph {
            nodes: Vec::with_capacity(node_count),
            links: Vec::with_capacity(links.len()),
            order: (0..node_count).collect(),
            link_order: Vec::new(),
        };

        for (id, record) in nodes.iter().enumerate() {
            graph.nodes.push(Node {
                id,
                name: record.name.clone(),
                supplied_value: record.value,
                value: record.value.unwrap_or(0.0),
                layer: None,
                fill: record
                    .fill
                    .clone()
                    .unwrap_or_else(|| config.palette_color(id)),
                story: record.story.clone(),
                incoming: Vec::new(),
                outgoing: Vec::new(),
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            });
        }

        for (id, record) in links.iter().enumerate() {
            for index in [record.source, record.target] {
                if index >= node_count {
                    return Err(LayoutError::LinkIndex {
                        link: id,
                        index,
                        node_count,
                    });
                }
            }
            let fill = record
                .fill
                .clone()
                .unwrap_or_else(|| graph.nodes[record.source].fill.clone());
            graph.links.push(Link {
                id,
                source: record.source,
                target: record.target,
                value: record.value,
                fill,
                story: record.story.clone(),
                thickness: 0.0,
                source_offset: 0.0,
                target_offset: 0.0,
            });
            graph.nodes[record.source].outgoing.push(id);
            graph.nodes[record.target].incoming.push(id);
        }

        graph.link_order = (0..graph.links.len()).collect();
        Ok(graph)
    }

    pub fn node(&self, id: usize) -> Result<&Node, LayoutError> {
        self.nodes.get(id).ok_or(LayoutError::UnknownNode { id })
    }

    pub fn link(&self, id: usize) -> Result<&Link, LayoutError> {
        self.links.get(id).ok_or(LayoutError::UnknownLink { id })
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Links entering or leaving `node`, in routing order.
    pub fn links_touching(&self, node: usize) -> Vec<usize> {
        self.link_order
            .iter()
            .copied()
            .filter(|&idx| {
                let link = &self.links[idx];
                link.source == node || link.target == node
            })
            .collect()
    }

    /// Nodes in canonical order.
    pub fn ordered_nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(|&idx| &self.nodes[idx])
    }

    /// Links in routing order.
    pub fn ordered_links(&self) -> impl Iterator<Item = &Link> {
        self.link_order.iter().map(|&idx| &self.links[idx])
    }

    pub fn incoming_total(&self, node: usize) -> f32 {
        self.nodes[node]
            .incoming
            .iter()
            .map(|&idx| self.links[idx].value)
            .sum()
    }

    pub fn outgoing_total(&self, node: usize) -> f32 {
        self.nodes[node]
            .outgoing
            .iter()
            .map(|&idx| self.links[idx].value)
            .sum()
    }
}
