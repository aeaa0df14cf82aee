use crate::config::Orientation;

use super::types::{NarrativeStep, SankeyEvent, Selection};
use super::{LayoutError, Sankey};

impl Sankey {
    /// Applies a drag result: stores the node's new top-left corner on the
    /// axes the configuration allows, then restacks the links. A request
    /// that leaves the node where it was changes nothing and queues no event.
    pub fn move_node(&mut self, node: usize, x: f32, y: f32) -> Result<(), LayoutError> {
        let (allow_x, allow_y) = self.screen_axes_allowed();
        let target = self
            .graph
            .nodes
            .get_mut(node)
            .ok_or(LayoutError::UnknownNode { id: node })?;
        let before = (target.x, target.y);
        if allow_x {
            target.x = x.max(0.0);
        }
        if allow_y {
            target.y = y.max(0.0);
        }
        let (x, y) = (target.x, target.y);
        if (x, y) == before {
            return Ok(());
        }
        self.reroute();
        self.events
            .push(SankeyEvent::NodeRepositioned { node, x, y });
        Ok(())
    }

    /// Incremental variant of [`Sankey::move_node`] for in-progress drags.
    pub fn move_node_by(&mut self, node: usize, dx: f32, dy: f32) -> Result<(), LayoutError> {
        let current = self.graph.node(node)?;
        let (x, y) = (current.x + dx, current.y + dy);
        self.move_node(node, x, y)
    }

    fn screen_axes_allowed(&self) -> (bool, bool) {
        let major = self.config.allow_move_major;
        let minor = self.config.allow_move_minor;
        match self.config.orientation {
            Orientation::Horizontal => (major, minor),
            Orientation::Vertical => (minor, major),
        }
    }

    pub fn select_node(&mut self, node: usize) -> Result<&Selection, LayoutError> {
        self.graph.node(node)?;
        let links = self.graph.links_touching(node);
        self.selection = Selection::Node {
            node,
            links: links.clone(),
        };
        self.events.push(SankeyEvent::NodeSelected { node, links });
        Ok(&self.selection)
    }

    pub fn select_link(&mut self, link: usize) -> Result<&Selection, LayoutError> {
        self.graph.link(link)?;
        self.selection = Selection::Link { link };
        self.events.push(SankeyEvent::LinkSelected { link });
        Ok(&self.selection)
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_none() {
            return;
        }
        self.selection = Selection::None;
        self.events.push(SankeyEvent::SelectionCleared);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn advance_playback(&mut self, node: usize) -> Result<NarrativeStep, LayoutError> {
        let playback = self
            .playback
            .as_mut()
            .ok_or(LayoutError::PlaybackDisabled)?;
        let step = playback.advance(&self.graph, node)?;
        self.events
            .push(SankeyEvent::NarrativeStepAdvanced(step.clone()));
        Ok(step)
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SankeyEvent> {
        std::mem::take(&mut self.events)
    }
}
