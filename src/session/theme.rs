use crate::edges::EdgeKind;
use crate::model::{NodeType, StreamRole};
use crate::visual::history::MutationKind;
use crate::visual::{EdgeStyle, NodeStyle, VisualCell, VisualGraph};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn node_style(&self, node_type: NodeType) -> NodeStyle {
        let stroke = match (self, node_type) {
            (Theme::Light, NodeType::WellGroup) => "#2f7d32",
            (Theme::Dark, NodeType::WellGroup) => "#81c784",
            (Theme::Light, NodeType::Facility) => "#4a6fa5",
            (Theme::Dark, NodeType::Facility) => "#90caf9",
            (Theme::Light, NodeType::CustomCalculation) => "#7a5195",
            (Theme::Dark, NodeType::CustomCalculation) => "#ce93d8",
            (Theme::Light, _) => "#5f6b7a",
            (Theme::Dark, _) => "#b0bec5",
        };
        let (fill, text) = match self {
            Theme::Light => ("#ffffff", "#1f2933"),
            Theme::Dark => ("#1f2933", "#e4e7eb"),
        };
        NodeStyle {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            text: text.to_string(),
        }
    }

    pub fn edge_style(&self, kind: EdgeKind, stream_role: StreamRole) -> EdgeStyle {
        let stroke = match (self, stream_role) {
            (Theme::Light, StreamRole::Oil) => "#2e7d32",
            (Theme::Dark, StreamRole::Oil) => "#66bb6a",
            (Theme::Light, StreamRole::Gas) => "#c62828",
            (Theme::Dark, StreamRole::Gas) => "#ef5350",
            (Theme::Light, StreamRole::Water) => "#1565c0",
            (Theme::Dark, StreamRole::Water) => "#42a5f5",
            (Theme::Light, StreamRole::Link) => "#757575",
            (Theme::Dark, StreamRole::Link) => "#bdbdbd",
            (Theme::Light, StreamRole::Development) => "#6a1b9a",
            (Theme::Dark, StreamRole::Development) => "#ba68c8",
        };
        EdgeStyle {
            stroke: stroke.to_string(),
            dashed: kind == EdgeKind::Link,
        }
    }
}

/// Re-colors every live cell for `theme`.
///
/// Runs inside a batch and only issues cosmetic mutations, so the history is untouched.
pub fn apply_theme(graph: &mut VisualGraph, theme: Theme) {
    let ids: Vec<String> = graph.cells().iter().map(|c| c.id().to_string()).collect();
    graph.init_batch();
    for id in ids {
        match graph.cell(&id) {
            Some(VisualCell::Node(node)) => {
                let style = theme.node_style(node.node_type);
                graph.update_node(&id, MutationKind::Cosmetic, |n| n.style = style);
            }
            Some(VisualCell::Edge(edge)) => {
                let style = theme.edge_style(edge.kind, edge.stream_role);
                graph.update_edge(&id, MutationKind::Cosmetic, |e| e.style = style);
            }
            None => {}
        }
    }
    graph.store_batch();
}
