use std::collections::HashMap;

use crate::config::LayoutConfig;

use super::graph::SankeyGraph;
use super::scale::LinearScale;

/// Stacks links against the faces of the nodes they touch. Heavier links are
/// stacked first; ties break on the source name. The free-offset maps live
/// only for this call, so rerouting with unchanged positions is a no-op.
pub(super) fn route_links(graph: &mut SankeyGraph, scale: &LinearScale, config: &LayoutConfig) {
    let orientation = config.orientation;

    let mut order: Vec<usize> = (0..graph.links.len()).collect();
    {
        let links = &graph.links;
        let nodes = &graph.nodes;
        order.sort_by(|&a, &b| {
            let (la, lb) = (&links[a], &links[b]);
            lb.value
                .total_cmp(&la.value)
                .then_with(|| nodes[la.source].name.cmp(&nodes[lb.source].name))
                .then_with(|| la.id.cmp(&lb.id))
        });
    }

    let mut source_free: HashMap<usize, f32> = HashMap::new();
    let mut target_free: HashMap<usize, f32> = HashMap::new();
    for &link_idx in &order {
        let (source, target, value) = {
            let link = &graph.links[link_idx];
            (link.source, link.target, link.value)
        };
        let thickness = scale.apply(value).max(1.0);

        let src_start = *source_free
            .entry(source)
            .or_insert_with(|| graph.nodes[source].cross_coord(orientation));
        source_free.insert(source, src_start + thickness);

        let tgt_start = *target_free
            .entry(target)
            .or_insert_with(|| graph.nodes[target].cross_coord(orientation));
        target_free.insert(target, tgt_start + thickness);

        let link = &mut graph.links[link_idx];
        link.thickness = thickness;
        link.source_offset = src_start + thickness / 2.0;
        link.target_offset = tgt_start + thickness / 2.0;
    }

    graph.link_order = order;
    tracing::debug!(links = graph.links.len(), "routed links");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{LinkRecord, NodeRecord};

    fn graph(links: Vec<LinkRecord>) -> SankeyGraph {
        let nodes = vec![
            NodeRecord::new("A"),
            NodeRecord::new("B"),
            NodeRecord::new("C"),
            NodeRecord::new("D"),
        ];
        SankeyGraph::build(&nodes, &links, &LayoutConfig::default()).unwrap()
    }

    fn unit_scale() -> LinearScale {
        LinearScale::new((0.0, 1.0), (0.0, 1.0))
    }

    #[test]
    fn heavier_links_stack_first() {
        let mut g = graph(vec![
            LinkRecord::new(0, 1, 10.0),
            LinkRecord::new(0, 2, 30.0),
            LinkRecord::new(0, 3, 20.0),
        ]);
        g.nodes[0].y = 100.0;
        route_links(&mut g, &unit_scale(), &LayoutConfig::default());
        assert_eq!(g.link_order, vec![1, 2, 0]);
        assert_eq!(g.links[1].source_offset, 115.0);
        assert_eq!(g.links[2].source_offset, 140.0);
        assert_eq!(g.links[0].source_offset, 155.0);
        assert_eq!(g.links[0].thickness, 10.0);
    }

    #[test]
    fn ties_break_on_source_name() {
        let mut g = graph(vec![
            LinkRecord::new(2, 3, 5.0),
            LinkRecord::new(1, 3, 5.0),
            LinkRecord::new(0, 3, 5.0),
        ]);
        route_links(&mut g, &unit_scale(), &LayoutConfig::default());
        assert_eq!(g.link_order, vec![2, 1, 0]);
        assert_eq!(g.links[2].target_offset, 2.5);
        assert_eq!(g.links[1].target_offset, 7.5);
        assert_eq!(g.links[0].target_offset, 12.5);
    }

    #[test]
    fn thin_links_get_one_unit() {
        let mut g = graph(vec![LinkRecord::new(0, 1, 0.0), LinkRecord::new(0, 1, -3.0)]);
        route_links(&mut g, &unit_scale(), &LayoutConfig::default());
        assert!(g.links.iter().all(|l| l.thickness == 1.0));
        assert_eq!(g.links[0].source_offset, 0.5);
        assert_eq!(g.links[1].source_offset, 1.5);
    }

    #[test]
    fn rerouting_is_idempotent() {
        let mut g = graph(vec![
            LinkRecord::new(0, 1, 3.0),
            LinkRecord::new(0, 2, 4.0),
            LinkRecord::new(1, 2, 2.0),
        ]);
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        route_links(&mut g, &scale, &LayoutConfig::default());
        let first = g.links.clone();
        route_links(&mut g, &scale, &LayoutConfig::default());
        assert_eq!(first, g.links);
    }
}
