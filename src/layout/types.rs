use serde::Serialize;

use crate::config::Orientation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNodeLayout {
    pub id: usize,
    pub name: String,
    pub value: f32,
    pub layer: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLinkLayout {
    pub id: usize,
    /// Source node id.
    pub source: usize,
    /// Target node id.
    pub target: usize,
    pub value: f32,
    pub thickness: f32,
    pub source_offset: f32,
    pub target_offset: f32,
    pub fill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

/// Everything a renderer needs to draw the diagram. Nodes come in canonical
/// order, links in stacking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLayout {
    pub orientation: Orientation,
    /// Usable drawing width (container minus margins).
    pub width: f32,
    /// Usable drawing height (container minus margins).
    pub height: f32,
    pub node_thickness: f32,
    pub max_layer: usize,
    pub extent: (f32, f32),
    pub nodes: Vec<SankeyNodeLayout>,
    pub links: Vec<SankeyLinkLayout>,
}

impl SankeyLayout {
    pub fn node(&self, id: usize) -> Option<&SankeyNodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn link(&self, id: usize) -> Option<&SankeyLinkLayout> {
        self.links.iter().find(|link| link.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    /// A node and every link touching it.
    Node { node: usize, links: Vec<usize> },
    Link { link: usize },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeStep {
    pub node: usize,
    /// Links revealed by this step, in stacking order.
    pub revealed: Vec<usize>,
    /// Shadow quantity left on each downstream node after this step.
    pub remaining: Vec<(usize, f32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

/// State transitions signalled to the host. The engine only queues them;
/// dispatch is up to whoever drains the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SankeyEvent {
    NodeSelected { node: usize, links: Vec<usize> },
    LinkSelected { link: usize },
    SelectionCleared,
    NodeRepositioned { node: usize, x: f32, y: f32 },
    NarrativeStepAdvanced(NarrativeStep),
}
