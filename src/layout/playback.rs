use super::LayoutError;
use super::graph::SankeyGraph;
use super::types::NarrativeStep;

/// Narrative mode: links start hidden and are revealed one source node at a
/// time. Each node carries a shadow quantity, the part of its value not yet
/// explained by revealed incoming links.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    revealed: Vec<bool>,
    explained: Vec<bool>,
    shadow: Vec<f32>,
}

impl Playback {
    pub fn new(graph: &SankeyGraph) -> Self {
        Self {
            revealed: vec![false; graph.links.len()],
            explained: vec![false; graph.nodes.len()],
            shadow: graph.nodes.iter().map(|node| node.value).collect(),
        }
    }

    pub fn reset(&mut self, graph: &SankeyGraph) {
        *self = Self::new(graph);
    }

    /// Reveals every outgoing link of `node` and takes their values off the
    /// shadow of each target. Explaining a node twice is a no-op.
    pub fn advance(&mut self, graph: &SankeyGraph, node: usize) -> Result<NarrativeStep, LayoutError> {
        let story = graph.node(node)?.story.clone();
        if self.explained[node] {
            return Ok(NarrativeStep {
                node,
                revealed: Vec::new(),
                remaining: Vec::new(),
                story,
            });
        }
        self.explained[node] = true;

        let mut revealed = Vec::new();
        let mut remaining: Vec<(usize, f32)> = Vec::new();
        for link in graph.ordered_links().filter(|link| link.source == node) {
            self.revealed[link.id] = true;
            revealed.push(link.id);
            let shadow = &mut self.shadow[link.target];
            *shadow = (*shadow - link.value).max(0.0);
            match remaining.iter_mut().find(|(target, _)| *target == link.target) {
                Some(entry) => entry.1 = *shadow,
                None => remaining.push((link.target, *shadow)),
            }
        }

        Ok(NarrativeStep {
            node,
            revealed,
            remaining,
            story,
        })
    }

    pub fn is_revealed(&self, link: usize) -> bool {
        self.revealed.get(link).copied().unwrap_or(false)
    }

    pub fn is_explained(&self, node: usize) -> bool {
        self.explained.get(node).copied().unwrap_or(false)
    }

    pub fn shadow(&self, node: usize) -> Option<f32> {
        self.shadow.get(node).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.revealed.iter().all(|&revealed| revealed)
    }
}
