//! Property-based round trips: any well-formed network survives load and save.
use netmodel::prelude::*;
use netmodel::sync::{NoFacilities, load_visual_graph};
use proptest::prelude::*;

fn position_strategy() -> impl Strategy<Value = Position> {
    // Quarters survive JSON exactly.
    ((-400i32..400), (-400i32..400)).prop_map(|(x, y)| Position::new(x as f64 / 4.0, y as f64))
}

fn allocation_strategy() -> impl Strategy<Value = AllocationSeries> {
    prop_oneof![
        (0u32..=100).prop_map(|v| AllocationSeries::flat(v as f64)),
        (1u32..400).prop_map(|v| AllocationSeries::flat(v as f64 / 4.0)),
        prop::collection::vec((2020u32..2030, 0u32..=100), 1..4).prop_map(|rows| {
            AllocationSeries::dated(rows.into_iter().map(|(year, v)| (format!("{year}-01"), v as f64)))
        }),
    ]
}

fn commodity_strategy() -> impl Strategy<Value = StreamRole> {
    prop_oneof![Just(StreamRole::Oil), Just(StreamRole::Gas), Just(StreamRole::Water)]
}

/// Well groups feeding econ outputs, every edge on a preset port of matching stream.
fn network_strategy() -> impl Strategy<Value = NetworkDocument> {
    (1usize..5, 1usize..4).prop_flat_map(|(wells, sinks)| {
        let nodes = prop::collection::vec(position_strategy(), wells + sinks);
        let edges = prop::collection::vec(
            (0..wells, 0..sinks, commodity_strategy(), allocation_strategy()),
            0..8,
        );
        (Just(wells), nodes, edges)
    })
    .prop_map(|(wells, positions, links)| {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let node = if i < wells {
                    Node::new(format!("wg-{i}"), NodeType::WellGroup)
                } else {
                    Node::new(format!("econ-{}", i - wells), NodeType::EconOutput)
                };
                node.at(p.x, p.y)
            })
            .collect();
        let mut seen = Vec::new();
        let mut edges = Vec::new();
        for (from, to, role, allocation) in links {
            if seen.contains(&(from, to, role)) {
                continue;
            }
            seen.push((from, to, role));
            let mut edge = Edge::new(
                format!("e-{}", edges.len()),
                role,
                (format!("wg-{from}").as_str(), role.as_str()),
                (format!("econ-{to}").as_str(), role.as_str()),
            );
            edge.params = Some(allocation);
            edges.push(edge);
        }
        NetworkDocument {
            id: "prop".to_string(),
            name: "Generated".to_string(),
            nodes,
            edges,
        }
    })
}

proptest! {
    #[test]
    fn network_round_trip_is_lossless(network in network_strategy()) {
        let document = Document::from(network);
        let graph = load_visual_graph(&document, &NoFacilities).expect("well-formed network loads");
        let report = visual_to_domain(&graph);
        prop_assert!(report.is_clean());
        prop_assert_eq!(&report.document, &document);
    }

    #[test]
    fn network_json_round_trip(network in network_strategy()) {
        let document = Document::from(network);
        let json = document.to_json_pretty().expect("serializes");
        let reparsed = Document::from_json(DocumentKind::Network, &json).expect("reparses");
        prop_assert_eq!(reparsed, document);
    }

    #[test]
    fn delete_all_undoes_in_one_step(network in network_strategy()) {
        let mut session = EditorSession::builder(network).build().expect("loads");
        let before = session.save().document;
        session.select_all();
        session.delete_selection();
        prop_assert!(session.graph().is_empty());
        prop_assert!(session.undo());
        prop_assert_eq!(session.save().document, before);
    }
}
