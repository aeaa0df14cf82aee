use std::collections::{HashMap, VecDeque};

use crate::config::LayeringStrategy;

use super::graph::SankeyGraph;

/// Resolves node values, assigns a layer to every node and sorts the
/// canonical node order. Returns the highest layer index.
pub(super) fn assign_layers(graph: &mut SankeyGraph, strategy: LayeringStrategy) -> usize {
    resolve_values(graph);

    let mut layers = match strategy {
        LayeringStrategy::LongestPath => longest_path_layers(graph),
        LayeringStrategy::Discovery => discovery_layers(graph),
    };

    let max_layer = layers.iter().copied().max().unwrap_or(0);
    for (idx, node) in graph.nodes.iter().enumerate() {
        if node.is_sink() && layers[idx] < max_layer {
            layers[idx] = max_layer;
        }
    }
    for (node, layer) in graph.nodes.iter_mut().zip(layers) {
        node.layer = Some(layer);
    }

    sort_canonical(graph);
    tracing::debug!(
        nodes = graph.nodes.len(),
        max_layer,
        ?strategy,
        "assigned layers"
    );
    max_layer
}

fn resolve_values(graph: &mut SankeyGraph) {
    for idx in 0..graph.nodes.len() {
        let value = match graph.nodes[idx].supplied_value {
            Some(value) => value,
            None => graph
                .incoming_total(idx)
                .max(graph.outgoing_total(idx))
                .max(1.0),
        };
        graph.nodes[idx].value = value;
    }
}

fn longest_path_layers(graph: &SankeyGraph) -> Vec<usize> {
    let node_count = graph.nodes.len();
    let mut layers = vec![0usize; node_count];
    let mut indegree: Vec<usize> = graph.nodes.iter().map(|n| n.incoming.len()).collect();
    let mut queue: VecDeque<usize> = graph
        .order
        .iter()
        .copied()
        .filter(|&idx| indegree[idx] == 0)
        .collect();

    let mut processed = 0usize;
    while let Some(idx) = queue.pop_front() {
        processed += 1;
        for &link_idx in &graph.nodes[idx].outgoing {
            let target = graph.links[link_idx].target;
            layers[target] = layers[target].max(layers[idx] + 1);
            if indegree[target] > 0 {
                indegree[target] -= 1;
                if indegree[target] == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    if processed < node_count {
        tracing::warn!(
            unresolved = node_count - processed,
            "graph contains a cycle; nodes on it keep partially relaxed layers"
        );
    }
    layers
}

fn discovery_layers(graph: &SankeyGraph) -> Vec<usize> {
    let mut layers: Vec<Option<usize>> = vec![None; graph.nodes.len()];
    // predecessors recorded against each destination
    let mut track: HashMap<usize, Vec<usize>> = HashMap::new();

    for &idx in &graph.order {
        let node = &graph.nodes[idx];
        if node.is_source() {
            layers[idx] = Some(0);
            track.entry(idx).or_default();
        }
        // a node nobody has reached yet hands its successors layer 0
        let next = layers[idx].map_or(0, |layer| layer + 1);
        for &link_idx in &node.outgoing {
            let target = graph.links[link_idx].target;
            match track.get_mut(&target) {
                Some(preds) => {
                    if !preds.contains(&idx) {
                        layers[target] = Some(next);
                        preds.push(idx);
                    }
                }
                None => {
                    layers[target] = Some(next);
                    track.insert(target, vec![idx]);
                }
            }
        }
    }

    layers.into_iter().map(|layer| layer.unwrap_or(0)).collect()
}

/// Layer ascending, value descending, then name a-z; the id keeps equal
/// names deterministic.
fn sort_canonical(graph: &mut SankeyGraph) {
    let nodes = &graph.nodes;
    graph.order.sort_by(|&a, &b| {
        let (na, nb) = (&nodes[a], &nodes[b]);
        na.layer()
            .cmp(&nb.layer())
            .then_with(|| nb.value.total_cmp(&na.value))
            .then_with(|| na.name.cmp(&nb.name))
            .then_with(|| na.id.cmp(&nb.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{LinkRecord, NodeRecord};

    fn graph(names: &[&str], links: &[(usize, usize, f32)]) -> SankeyGraph {
        let nodes: Vec<NodeRecord> = names.iter().map(|n| NodeRecord::new(*n)).collect();
        let links: Vec<LinkRecord> = links
            .iter()
            .map(|&(s, t, v)| LinkRecord::new(s, t, v))
            .collect();
        SankeyGraph::build(&nodes, &links, &LayoutConfig::default()).unwrap()
    }

    fn layer_of(graph: &SankeyGraph, name: &str) -> usize {
        graph.node_by_name(name).unwrap().layer()
    }

    #[test]
    fn diamond_layers() {
        let mut g = graph(
            &["A", "B", "C", "D"],
            &[(0, 1, 5.0), (0, 2, 3.0), (1, 3, 5.0), (2, 3, 3.0)],
        );
        let max = assign_layers(&mut g, LayeringStrategy::LongestPath);
        assert_eq!(max, 2);
        assert_eq!(layer_of(&g, "A"), 0);
        assert_eq!(layer_of(&g, "B"), 1);
        assert_eq!(layer_of(&g, "C"), 1);
        assert_eq!(layer_of(&g, "D"), 2);
        assert_eq!(g.nodes[3].value, 8.0);
        assert_eq!(g.nodes[0].value, 8.0);
    }

    #[test]
    fn longest_path_wins_over_shortcut() {
        // A -> D directly and A -> B -> C -> D; D has an outgoing link so it
        // is not moved by sink alignment.
        let mut g = graph(
            &["D", "A", "B", "C", "E"],
            &[(1, 0, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0), (0, 4, 1.0)],
        );
        let max = assign_layers(&mut g, LayeringStrategy::LongestPath);
        assert_eq!(layer_of(&g, "D"), 3);
        assert_eq!(layer_of(&g, "E"), 4);
        assert_eq!(max, 4);
    }

    #[test]
    fn discovery_layering_depends_on_traversal_order() {
        // D is listed first and has not been reached yet, so E inherits
        // layer 0 from it; F then lands one past E before sink alignment.
        let mut g = graph(
            &["D", "A", "B", "C", "E", "F"],
            &[
                (1, 0, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 0, 1.0),
                (0, 4, 1.0),
                (4, 5, 1.0),
            ],
        );
        assign_layers(&mut g, LayeringStrategy::Discovery);
        assert_eq!(layer_of(&g, "D"), 3);
        assert_eq!(layer_of(&g, "E"), 0);
        assert_eq!(layer_of(&g, "F"), 3);

        let mut g2 = g.clone();
        for node in &mut g2.nodes {
            node.layer = None;
        }
        g2.order = (0..g2.nodes.len()).collect();
        assign_layers(&mut g2, LayeringStrategy::LongestPath);
        assert_eq!(layer_of(&g2, "E"), 4);
    }

    #[test]
    fn sinks_align_to_last_layer() {
        let mut g = graph(
            &["A", "B", "C", "D", "Z"],
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 4, 1.0)],
        );
        let max = assign_layers(&mut g, LayeringStrategy::LongestPath);
        assert_eq!(max, 3);
        assert_eq!(layer_of(&g, "Z"), 3);
    }

    #[test]
    fn values_are_derived_and_floored() {
        let nodes = vec![
            NodeRecord::new("A"),
            NodeRecord::new("B").with_value(42.0),
            NodeRecord::new("C"),
            NodeRecord::new("lonely"),
        ];
        let links = vec![
            LinkRecord::new(0, 1, 0.25),
            LinkRecord::new(1, 2, 0.5),
            LinkRecord::new(0, 2, 9.0),
        ];
        let mut g = SankeyGraph::build(&nodes, &links, &LayoutConfig::default()).unwrap();
        assign_layers(&mut g, LayeringStrategy::LongestPath);
        assert_eq!(g.nodes[0].value, 9.25);
        assert_eq!(g.nodes[1].value, 42.0);
        assert_eq!(g.nodes[2].value, 9.5);
        assert_eq!(g.nodes[3].value, 1.0);
    }

    #[test]
    fn canonical_order_sorts_by_layer_value_name() {
        let nodes = vec![
            NodeRecord::new("src"),
            NodeRecord::new("b").with_value(5.0),
            NodeRecord::new("a").with_value(5.0),
            NodeRecord::new("big").with_value(50.0),
        ];
        let links = vec![
            LinkRecord::new(0, 1, 1.0),
            LinkRecord::new(0, 2, 1.0),
            LinkRecord::new(0, 3, 1.0),
        ];
        let mut g = SankeyGraph::build(&nodes, &links, &LayoutConfig::default()).unwrap();
        assign_layers(&mut g, LayeringStrategy::LongestPath);
        let names: Vec<&str> = g.ordered_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["src", "big", "a", "b"]);
    }

    #[test]
    fn cycle_does_not_hang() {
        let mut g = graph(&["A", "B", "C"], &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0)]);
        assign_layers(&mut g, LayeringStrategy::LongestPath);
        assert_eq!(layer_of(&g, "A"), 0);
        assert!(layer_of(&g, "B") >= 1);
    }

    #[test]
    fn graph_without_links_has_single_layer() {
        let mut g = graph(&["A", "B"], &[]);
        assert_eq!(assign_layers(&mut g, LayeringStrategy::LongestPath), 0);
        assert_eq!(layer_of(&g, "B"), 0);
    }
}
