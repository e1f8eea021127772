use crate::model::Position;
use crate::visual::{Endpoint, VisualCell, VisualGraph};
use ahash::AHashSet;

/// Cells captured by copy or cut, pasted back with fresh ids.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    cells: Vec<VisualCell>,
    pastes: usize,
}

impl Clipboard {
    /// Captures the selected nodes and every edge whose attached ends all lie on
    /// selected nodes. Edges hanging off unselected nodes are left behind.
    pub fn capture(graph: &VisualGraph) -> Self {
        let nodes: AHashSet<&str> = graph
            .nodes()
            .filter(|n| graph.is_selected(&n.id))
            .map(|n| n.id.as_str())
            .collect();
        let inside = |end: &Endpoint| match end.node_id() {
            Some(node_id) => nodes.contains(node_id),
            None => true,
        };
        let cells = graph
            .cells()
            .iter()
            .filter(|cell| match cell {
                VisualCell::Node(node) => nodes.contains(node.id.as_str()),
                VisualCell::Edge(edge) => {
                    let attached = edge.source.node_id().is_some() || edge.target.node_id().is_some();
                    let selected_loose = !attached && graph.is_selected(&edge.id);
                    (attached && inside(&edge.source) && inside(&edge.target)) || selected_loose
                }
            })
            .cloned()
            .collect();
        Self { cells, pastes: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[VisualCell] {
        &self.cells
    }

    /// Offset for the next paste; each paste lands one step further away.
    pub(super) fn next_offset(&mut self, step: Position) -> Position {
        self.pastes += 1;
        step.scaled(self.pastes as f64)
    }
}
