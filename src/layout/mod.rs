mod error;
pub mod graph;
mod interaction;
mod layering;
mod playback;
mod position;
mod routing;
mod scale;
mod sizing;
pub(crate) mod types;

pub use error::LayoutError;
pub use graph::{Link, Node, SankeyGraph};
pub use playback::Playback;
pub use position::LayerSummary;
pub use scale::LinearScale;
pub use types::*;

use std::fmt;

use crate::config::LayoutConfig;
use crate::ir::SankeyData;
use crate::layout_dump::text_dump;

use layering::assign_layers;
use position::{position_by_layer, position_in_layer};
use routing::route_links;
use sizing::size_nodes;

/// Layout engine state: the graph with its computed geometry plus the
/// interaction state a host reads back (selection, playback, events).
#[derive(Debug, Clone)]
pub struct Sankey {
    config: LayoutConfig,
    graph: SankeyGraph,
    scale: LinearScale,
    max_layer: usize,
    layers: Vec<LayerSummary>,
    selection: Selection,
    playback: Option<Playback>,
    events: Vec<SankeyEvent>,
}

impl Sankey {
    pub fn new(data: &SankeyData, config: LayoutConfig) -> Result<Self, LayoutError> {
        let graph = SankeyGraph::build(&data.nodes, &data.links, &config)?;
        let mut sankey = Self {
            config,
            graph,
            scale: LinearScale::default(),
            max_layer: 0,
            layers: Vec::new(),
            selection: Selection::None,
            playback: None,
            events: Vec::new(),
        };
        sankey.initialise();
        Ok(sankey)
    }

    /// Replaces the data and lays it out again.
    pub fn data(&mut self, data: &SankeyData) -> Result<&mut Self, LayoutError> {
        self.graph = SankeyGraph::build(&data.nodes, &data.links, &self.config)?;
        Ok(self.initialise())
    }

    /// Replaces the configuration and lays the current data out again.
    pub fn configure(&mut self, config: LayoutConfig) -> &mut Self {
        self.config = config;
        self.initialise()
    }

    /// Runs the whole pipeline: layers, scale, sizes, positions, links.
    /// Selection and playback progress are reset.
    pub fn initialise(&mut self) -> &mut Self {
        for node in &mut self.graph.nodes {
            node.layer = None;
        }
        self.max_layer = assign_layers(&mut self.graph, self.config.layering);
        self.scale = LinearScale::for_graph(&self.graph, &self.config);
        size_nodes(&mut self.graph, &self.scale, &self.config);
        position_by_layer(&mut self.graph, &self.config, self.max_layer);
        self.layers = position_in_layer(&mut self.graph, &self.config);
        route_links(&mut self.graph, &self.scale, &self.config);

        self.selection = Selection::None;
        self.playback = self
            .config
            .playback
            .then(|| Playback::new(&self.graph));
        tracing::debug!(
            nodes = self.graph.nodes.len(),
            links = self.graph.links.len(),
            max_layer = self.max_layer,
            "initialised sankey layout"
        );
        self
    }

    /// Recomputes link attachment points from the current node positions.
    pub fn reroute(&mut self) {
        route_links(&mut self.graph, &self.scale, &self.config);
    }

    pub fn layout(&self) -> SankeyLayout {
        let nodes = self
            .graph
            .ordered_nodes()
            .map(|node| SankeyNodeLayout {
                id: node.id,
                name: node.name.clone(),
                value: node.value,
                layer: node.layer(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                fill: node.fill.clone(),
                story: node.story.clone(),
            })
            .collect();
        let links = self
            .graph
            .ordered_links()
            .map(|link| SankeyLinkLayout {
                id: link.id,
                source: link.source,
                target: link.target,
                value: link.value,
                thickness: link.thickness,
                source_offset: link.source_offset,
                target_offset: link.target_offset,
                fill: link.fill.clone(),
                story: link.story.clone(),
            })
            .collect();
        SankeyLayout {
            orientation: self.config.orientation,
            width: self.config.available_width(),
            height: self.config.available_height(),
            node_thickness: self.config.node_thickness(),
            max_layer: self.max_layer,
            extent: self.scale.extent(),
            nodes,
            links,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn graph(&self) -> &SankeyGraph {
        &self.graph
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn max_layer(&self) -> usize {
        self.max_layer
    }

    pub fn layers(&self) -> &[LayerSummary] {
        &self.layers
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }
}

impl fmt::Display for Sankey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text_dump(&self.layout()))
    }
}

pub fn compute_sankey_layout(
    data: &SankeyData,
    config: &LayoutConfig,
) -> Result<SankeyLayout, LayoutError> {
    Ok(Sankey::new(data, config.clone())?.layout())
}
