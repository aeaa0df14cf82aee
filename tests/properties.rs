//! Property-based checks of the layout pipeline over random acyclic graphs.

use float_cmp::approx_eq;
use proptest::prelude::*;

use sankey_layout::{LayoutConfig, LinkRecord, NodeRecord, Orientation, Sankey, SankeyData};

const EPS: f32 = 1e-3;

/// Links only run from a lower to a higher node index, so every generated
/// graph is acyclic.
fn dag_strategy() -> impl Strategy<Value = SankeyData> {
    (2usize..14).prop_flat_map(|n| {
        let link = (0..n - 1)
            .prop_flat_map(move |src| (Just(src), (src + 1)..n, 1u32..500))
            .prop_map(|(src, dst, value)| LinkRecord::new(src, dst, value as f32));
        prop::collection::vec(link, 1..3 * n).prop_map(move |links| SankeyData {
            nodes: (0..n).map(|i| NodeRecord::new(format!("n{i}"))).collect(),
            links,
        })
    })
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn config(orientation: Orientation) -> LayoutConfig {
    LayoutConfig {
        orientation,
        width: 800.0,
        height: 400.0,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn layers_follow_links(data in dag_strategy(), orientation in orientation_strategy()) {
        let sankey = Sankey::new(&data, config(orientation)).unwrap();
        let graph = sankey.graph();
        let max_layer = sankey.max_layer();
        for link in &graph.links {
            let (src, dst) = (&graph.nodes[link.source], &graph.nodes[link.target]);
            prop_assert!(dst.layer() >= src.layer() + 1);
        }
        for node in &graph.nodes {
            if node.is_source() && !node.is_sink() {
                prop_assert_eq!(node.layer(), 0);
            }
            if node.is_sink() && !node.is_source() {
                prop_assert_eq!(node.layer(), max_layer);
            }
            prop_assert!(node.layer() <= max_layer);
        }
    }

    #[test]
    fn node_values_cover_their_flows(data in dag_strategy()) {
        let sankey = Sankey::new(&data, config(Orientation::Horizontal)).unwrap();
        let graph = sankey.graph();
        for node in &graph.nodes {
            let inflow = graph.incoming_total(node.id);
            let outflow = graph.outgoing_total(node.id);
            prop_assert!(node.value + EPS >= inflow);
            prop_assert!(node.value + EPS >= outflow);
            // derived values are the larger side of the flow, floored at 1
            prop_assert!(node.supplied_value.is_none());
            prop_assert!(approx_eq!(
                f32,
                node.value,
                inflow.max(outflow).max(1.0),
                epsilon = EPS
            ));
        }
    }

    #[test]
    fn nodes_in_a_layer_do_not_overlap(data in dag_strategy(), orientation in orientation_strategy()) {
        let sankey = Sankey::new(&data, config(orientation)).unwrap();
        let graph = sankey.graph();
        for summary in sankey.layers() {
            for pair in summary.nodes.windows(2) {
                let (a, b) = (&graph.nodes[pair[0]], &graph.nodes[pair[1]]);
                prop_assert!(
                    a.cross_coord(orientation) + a.cross_size(orientation)
                        <= b.cross_coord(orientation) + EPS
                );
            }
        }
    }

    #[test]
    fn links_stack_without_overlap(data in dag_strategy(), orientation in orientation_strategy()) {
        let sankey = Sankey::new(&data, config(orientation)).unwrap();
        let graph = sankey.graph();
        for node in &graph.nodes {
            let mut starts: Vec<(f32, f32)> = node
                .outgoing
                .iter()
                .map(|&id| &graph.links[id])
                .map(|link| (link.source_offset - link.thickness / 2.0, link.thickness))
                .collect();
            starts.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in starts.windows(2) {
                prop_assert!(pair[0].0 + pair[0].1 <= pair[1].0 + EPS);
            }
            for &id in &node.outgoing {
                prop_assert!(graph.links[id].thickness >= 1.0);
            }
        }
    }

    #[test]
    fn layout_is_idempotent(data in dag_strategy(), orientation in orientation_strategy()) {
        let mut sankey = Sankey::new(&data, config(orientation)).unwrap();
        let first = sankey.layout();
        sankey.initialise();
        prop_assert_eq!(&first, &sankey.layout());
        sankey.reroute();
        prop_assert_eq!(&first, &sankey.layout());
    }
}

#[test]
fn short_branch_sink_joins_last_layer() {
    // a -> b -> c -> d sets the max layer to 3; a -> e would leave e at 1.
    let mut data = SankeyData::new();
    data.push_link("a", "b", 5.0);
    data.push_link("b", "c", 5.0);
    data.push_link("c", "d", 5.0);
    data.push_link("a", "e", 2.0);

    let sankey = Sankey::new(&data, config(Orientation::Horizontal)).unwrap();
    assert_eq!(sankey.max_layer(), 3);
    let e = sankey.graph().node_by_name("e").unwrap();
    assert_eq!(e.layer(), 3);
    let d = sankey.graph().node_by_name("d").unwrap();
    assert_eq!(e.x, d.x);
}

#[test]
fn dragging_only_moves_touching_links() {
    let mut data = SankeyData::new();
    data.push_link("a", "c", 30.0);
    data.push_link("b", "c", 20.0);
    data.push_link("b", "d", 10.0);
    data.push_link("c", "e", 50.0);

    let mut sankey = Sankey::new(&data, config(Orientation::Horizontal)).unwrap();
    let before = sankey.layout();
    let d = sankey.graph().node_by_name("d").unwrap().id;
    sankey.move_node_by(d, 0.0, 40.0).unwrap();
    let after = sankey.layout();

    let touching = sankey.graph().links_touching(d);
    assert_eq!(touching.len(), 1);
    for link in &after.links {
        let old = before.link(link.id).unwrap();
        if touching.contains(&link.id) {
            assert_eq!(link.source_offset, old.source_offset);
            assert!(approx_eq!(
                f32,
                link.target_offset,
                old.target_offset + 40.0,
                epsilon = 1e-3
            ));
        } else {
            assert_eq!(link, old);
        }
    }
}
