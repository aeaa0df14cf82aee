use serde::{Deserialize, Serialize};

/// A node as supplied by the caller. `value` may be omitted, in which case
/// it is derived from the incident links during layering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Narration shown when the node is explained in playback mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

/// A link as supplied by the caller. `source` and `target` are zero-based
/// indices into the node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub source: usize,
    pub target: usize,
    pub value: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyData {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            fill: None,
            story: None,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

impl LinkRecord {
    pub fn new(source: usize, target: usize, value: f32) -> Self {
        Self {
            source,
            target,
            value,
            fill: None,
            story: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

impl SankeyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the node called `name`, appending it first if it
    /// does not exist yet.
    pub fn ensure_node(&mut self, name: &str) -> usize {
        if let Some(idx) = self.nodes.iter().position(|node| node.name == name) {
            return idx;
        }
        self.nodes.push(NodeRecord::new(name));
        self.nodes.len() - 1
    }

    pub fn push_link(&mut self, source: &str, target: &str, value: f32) {
        let source = self.ensure_node(source);
        let target = self.ensure_node(target);
        self.links.push(LinkRecord::new(source, target, value));
    }
}
