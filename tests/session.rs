//! Editing operations exposed by the session.
mod common;
use common::*;
use netmodel::prelude::*;
use pretty_assertions::assert_eq;

fn port_ids(session: &EditorSession, node_id: &str) -> Vec<String> {
    session
        .graph()
        .node(node_id)
        .expect("node exists")
        .ports
        .iter()
        .map(|p| p.id.clone())
        .collect()
}

fn ids(ports: &[Port]) -> Vec<&str> {
    ports.iter().map(|p| p.id.as_str()).collect()
}

#[cfg(test)]
mod clipboard_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paste_assigns_fresh_ids_and_offsets() {
        let mut session = open_network();
        session.select("wg-2");
        session.select("flare-1");
        assert_eq!(session.copy(), 3);

        let first = session.paste().expect("first paste");
        let graph = session.graph();
        let nodes: Vec<&VisualNode> = first.iter().filter_map(|id| graph.node(id)).collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].position, Position::new(20.0, 220.0));
        assert_eq!(nodes[1].position, Position::new(270.0, 170.0));

        let edge = first.iter().find_map(|id| graph.edge(id)).expect("pasted edge");
        assert_eq!(edge.source.node_id(), Some(nodes[0].id.as_str()));
        assert_eq!(edge.target.node_id(), Some(nodes[1].id.as_str()));
        assert_eq!(edge.source.port_id(), Some("out_gas"));

        let selected: Vec<&str> = graph.selection().collect();
        assert_eq!(selected.len(), 3);
        assert!(first.iter().all(|id| graph.is_selected(id)));

        let second = session.paste().expect("second paste");
        let node = session.graph().node(&second[0]).expect("pasted again");
        assert_eq!(node.position, Position::new(40.0, 240.0));
        assert!(second.iter().all(|id| !first.contains(id)));
        assert!(session.save().is_clean());
    }

    #[test]
    fn test_cut_removes_and_keeps_clipboard() {
        let mut session = open_network();
        session.select("flare-1");
        assert_eq!(session.cut(), 1);
        assert!(!session.graph().contains("flare-1"));
        assert!(!session.graph().contains("g-2"));
        assert_eq!(session.clipboard().len(), 1);

        let pasted = session.paste().expect("pasted");
        assert_eq!(pasted.len(), 1);
    }

    #[test]
    fn test_paste_into_another_document() {
        let mut session = open_network();
        session.select("atm-1");
        session.copy();
        session.replace_document(empty_network()).expect("replaced");
        assert!(!session.has_undo());

        let pasted = session.paste().expect("pasted");
        let node = session.graph().node(&pasted[0]).expect("pasted node");
        assert_eq!(node.node_type, NodeType::Atmosphere);
    }

    #[test]
    fn test_paste_with_empty_clipboard_does_nothing() {
        let mut session = open_network();
        assert_eq!(session.paste(), Ok(vec![]));
        assert!(!session.has_undo());
    }
}

#[cfg(test)]
mod port_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use netmodel::ports::derive_ports;

    fn calculation_session() -> EditorSession {
        let mut network = empty_network();
        network.nodes.push(
            Node::new("calc-1", NodeType::CustomCalculation).with_params(calculation_params()),
        );
        network.nodes.push(Node::new("wg-1", NodeType::WellGroup));
        network.edges.push(Edge::new("feed", StreamRole::Gas, ("wg-1", "gas"), ("calc-1", "calc-in")));
        EditorSession::builder(network).build().expect("loads")
    }

    fn dialog(params: serde_json::Value) -> Option<DialogResult> {
        Some(DialogResult {
            name: "Shrinkage".to_string(),
            description: String::new(),
            params,
        })
    }

    #[test]
    fn test_derived_ports_are_deterministic() {
        let node = Node::new("calc-1", NodeType::CustomCalculation).with_params(calculation_params());
        let first = derive_ports(&node, None).expect("derives");
        let second = derive_ports(&node, None).expect("derives");
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec!["in_calc-in", "out_calc-out"]);
    }

    #[test]
    fn test_assigning_an_output_adds_exactly_one_port() {
        let mut session = calculation_session();
        let before = port_ids(&session, "calc-1");

        let mut params = calculation_params();
        params["outputs"]
            .as_array_mut()
            .expect("outputs list")
            .push(serde_json::json!({"id": "calc-vent", "name": "Vent", "streamRole": "gas", "assigned": true}));
        session.apply_node_dialog("calc-1", dialog(params)).expect("applies");

        let after = port_ids(&session, "calc-1");
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().map(String::as_str), Some("out_calc-vent"));
        assert!(session.graph().contains("feed"));
    }

    #[test]
    fn test_row_stream_change_updates_kept_port_and_drops_its_edges() {
        let mut session = calculation_session();
        let mut params = calculation_params();
        params["inputs"][0]["streamRole"] = serde_json::json!("oil");
        session.apply_node_dialog("calc-1", dialog(params)).expect("applies");

        assert_eq!(port_ids(&session, "calc-1"), vec!["in_calc-in", "out_calc-out"]);
        let port = session.graph().port("calc-1", "in_calc-in").expect("kept port");
        assert_eq!(port.stream_role, StreamRole::Oil);
        assert!(!session.graph().contains("feed"));
        assert_eq!(session.graph().history().undo_len(), 1);

        let report = session.save();
        assert!(report.is_clean());
        let reloaded = EditorSession::builder(report.document).build().expect("reloads");
        assert!(reloaded.save().is_clean());

        session
            .connect(Endpoint::port("wg-1", "out_oil"), Endpoint::port("calc-1", "in_calc-in"))
            .expect("oil now fits the port");

        let mut session = calculation_session();
        let mut params = calculation_params();
        params["inputs"][0]["streamRole"] = serde_json::json!("oil");
        session.apply_node_dialog("calc-1", dialog(params)).expect("applies");
        assert!(session.undo());
        let port = session.graph().port("calc-1", "in_calc-in").expect("port restored");
        assert_eq!(port.stream_role, StreamRole::Gas);
        assert!(session.graph().contains("feed"));
    }

    #[test]
    fn test_refresh_ports_reports_changed_ports() {
        let mut session = calculation_session();
        let mut params = calculation_params();
        params["outputs"][0]["name"] = serde_json::json!("Residue");
        session
            .graph_mut()
            .update_node("calc-1", MutationKind::Structural, |n| n.params = params);

        let diff = session.refresh_ports("calc-1").expect("refreshed");
        assert!(diff.added.is_empty() && diff.removed.is_empty());
        assert_eq!(ids(&diff.changed), vec!["out_calc-out"]);
        let port = session.graph().port("calc-1", "out_calc-out").expect("port");
        assert_eq!(port.label, "Residue");
        assert!(session.graph().contains("feed"));
    }

    #[test]
    fn test_change_node_type_rederives_ports() {
        let mut session = open_network();
        session
            .connect(Endpoint::port("flare-1", "out_gas"), Endpoint::port("atm-1", "in_gas"))
            .expect("flare vents to atmosphere");
        let undo_before = session.graph().history().undo_len();

        let diff = session
            .change_node_type("flare-1", NodeType::EconOutput, serde_json::json!({}))
            .expect("type change");
        assert_eq!(ids(&diff.added), vec!["in_oil", "in_water"]);
        assert_eq!(ids(&diff.removed), vec!["out_gas"]);
        assert_eq!(port_ids(&session, "flare-1"), vec!["in_gas", "in_oil", "in_water"]);
        assert_eq!(session.graph().node("flare-1").expect("node").name, "Econ Output");
        assert!(session.graph().contains("g-2"));
        assert_eq!(session.graph().edges_of("atm-1").count(), 1);
        assert_eq!(session.graph().history().undo_len(), undo_before + 1);

        assert!(session.undo());
        assert_eq!(port_ids(&session, "flare-1"), vec!["in_gas", "out_gas"]);
        assert_eq!(session.graph().edges_of("atm-1").count(), 2);
    }

    #[test]
    fn test_facility_type_changes_are_refused() {
        let mut session = open_network();
        let result = session.change_node_type("fac-1", NodeType::Flare, serde_json::json!({}));
        assert_eq!(
            result,
            Err(SessionError::UnsupportedTypeChange {
                node_id: "fac-1".to_string(),
                from: NodeType::Facility,
                to: NodeType::Flare,
            })
        );
    }

    #[test]
    fn test_refresh_after_facility_edit() {
        let mut session = open_network();
        let mut station = compressor_station();
        station.inputs.clear();
        session.register_facility(station);

        let diff = session.refresh_ports("fac-1").expect("refreshed");
        assert_eq!(ids(&diff.removed), vec!["in_inlet"]);
        assert_eq!(ids(&diff.added), vec!["linkIn_link"]);
        assert_eq!(port_ids(&session, "fac-1"), vec!["out_flare-out", "linkIn_link"]);
        assert!(!session.graph().contains("g-1"));
        assert!(session.graph().contains("g-3"));

        let unchanged = session.refresh_ports("fac-1").expect("second refresh");
        assert!(unchanged.is_empty());
        assert_eq!(unchanged.kept, vec!["out_flare-out", "linkIn_link"]);
    }
}

#[cfg(test)]
mod editing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edge_dialog_updates_label() {
        let mut session = open_network();
        session
            .apply_edge_dialog(
                "g-2",
                Some(EdgeDialogResult {
                    name: "To flare".to_string(),
                    params: Some(AllocationSeries::flat(12.5)),
                }),
            )
            .expect("applied");
        let edge = session.graph().edge("g-2").expect("edge");
        assert_eq!(edge.label.as_deref(), Some("12.5%"));
        assert_eq!(edge.name, "To flare");

        let saved = session.save().document;
        let record = saved.edges().iter().find(|e| e.id == "g-2").expect("saved");
        assert_eq!(record.params, Some(AllocationSeries::flat(12.5)));
    }

    #[test]
    fn test_link_edges_take_no_params() {
        let mut session = open_network();
        let result = session.apply_edge_dialog(
            "l-1",
            Some(EdgeDialogResult {
                name: String::new(),
                params: Some(AllocationSeries::default()),
            }),
        );
        assert!(matches!(result, Err(SessionError::InvalidParams { .. })));
    }

    #[test]
    fn test_unknown_cells_are_reported() {
        let mut session = open_network();
        assert_eq!(
            session.move_node("nope", Position::default()),
            Err(SessionError::UnknownCell("nope".to_string()))
        );
        assert!(!session.select("nope"));
    }

    #[test]
    fn test_keyboard_shortcuts_drive_the_session() {
        let mut session = open_network();
        let select_all = Shortcut::from_keys("Ctrl+A").expect("bound");
        let delete = Shortcut::from_keys("Delete").expect("bound");
        let undo = Shortcut::from_keys("Cmd+Z").expect("bound");

        session.handle_shortcut(select_all).expect("select all");
        session.handle_shortcut(delete).expect("delete");
        assert!(session.graph().is_empty());

        session.handle_shortcut(undo).expect("undo");
        assert_eq!(session.graph().len(), 14);
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut session = open_network();
        assert!((session.zoom_in() - 1.2).abs() < 1e-9);
        for _ in 0..20 {
            session.zoom_out();
        }
        assert_eq!(session.zoom(), 0.2);
        assert_eq!(session.zoom_reset(), 1.0);
    }

    #[test]
    fn test_edits_are_saved() {
        let mut session = open_network();
        let tank = session
            .drop_node(Node::new("tank-9", NodeType::OilTank).at(600.0, 200.0))
            .expect("dropped");
        session
            .connect(Endpoint::port("wg-1", "out_oil"), Endpoint::port(&tank, "in_oil"))
            .expect("oil into tank");

        let report = session.save();
        assert!(report.is_clean());
        let saved = report.document;
        assert_eq!(saved.nodes().len(), sample_network().nodes.len() + 1);
        let edge = saved.edges().last().expect("new edge");
        assert_eq!(edge.from_handle.as_deref(), Some("oil"));
        assert_eq!(edge.to_node_id, "tank-9");
        assert_eq!(edge.params, Some(AllocationSeries::default()));
    }

    #[test]
    fn test_auto_layout_places_columns_by_rank() {
        let mut session = open_network();
        session.auto_layout();
        let graph = session.graph();
        let x = |id: &str| graph.node(id).expect("node").position.x;
        assert_eq!(x("drill-1"), 40.0);
        assert_eq!(x("wg-1"), 240.0);
        assert_eq!(x("fac-1"), 440.0);
        assert_eq!(x("atm-1"), 640.0);
        assert!(session.save().is_clean());
    }

    #[test]
    fn test_auto_layout_parks_free_ends_beside_their_node() {
        let mut session = open_facility(compressor_station());
        session.auto_layout();
        let graph = session.graph();
        let comp = graph.node("comp-1").expect("compressor").position;
        let inlet = graph.edge("inlet").expect("inlet");
        assert_eq!(inlet.source, Endpoint::Point(Position::new(comp.x - 100.0, comp.y + 30.0)));
    }
}
