//! The live visual graph edited on the canvas.
//!
//! This models the surface the diagramming toolkit exposes to the core: elements with
//! ports, links whose ends are either a node port or a free point, a selection set and
//! a command history. Rendering is someone else's job.

pub mod history;

use crate::edges::EdgeKind;
use crate::error::SyncError;
use crate::model::{AllocationSeries, DocumentKind, NodeType, Position, StreamRole};
use crate::ports::Port;
use history::{CommandHistory, Mutation, MutationKind};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    pub stroke: String,
    pub dashed: bool,
}

/// Which end of an edge is being talked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    Source,
    Target,
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointSide::Source => f.write_str("source"),
            EndpointSide::Target => f.write_str("target"),
        }
    }
}

/// One end of a visual edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Attached to a node; `port_id` is `None` when dropped on the body instead of a magnet.
    Node {
        node_id: String,
        port_id: Option<String>,
    },
    /// A free point on the drawing surface.
    Point(Position),
}

impl Endpoint {
    pub fn port(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Endpoint::Node {
            node_id: node_id.into(),
            port_id: Some(port_id.into()),
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match self {
            Endpoint::Node { node_id, .. } => Some(node_id),
            Endpoint::Point(_) => None,
        }
    }

    pub fn port_id(&self) -> Option<&str> {
        match self {
            Endpoint::Node { port_id, .. } => port_id.as_deref(),
            Endpoint::Point(_) => None,
        }
    }

    pub fn point(&self) -> Option<Position> {
        match self {
            Endpoint::Point(p) => Some(*p),
            Endpoint::Node { .. } => None,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Endpoint::Point(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: String,
    pub node_type: NodeType,
    pub name: String,
    pub description: String,
    pub params: serde_json::Value,
    pub position: Position,
    pub size: Size,
    pub ports: Vec<Port>,
    pub facility_id: Option<String>,
    /// Cached name of the referenced facility, shown under the node. Never persisted.
    pub facility_name: Option<String>,
    pub style: NodeStyle,
}

impl VisualNode {
    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualEdge {
    pub id: String,
    pub kind: EdgeKind,
    pub stream_role: StreamRole,
    pub source: Endpoint,
    pub target: Endpoint,
    pub vertices: Vec<Position>,
    pub name: String,
    pub params: Option<AllocationSeries>,
    pub to_facility_object_id: Option<String>,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

impl VisualEdge {
    pub fn endpoint(&self, side: EndpointSide) -> &Endpoint {
        match side {
            EndpointSide::Source => &self.source,
            EndpointSide::Target => &self.target,
        }
    }

    /// True when either end is attached to `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source.node_id() == Some(node_id) || self.target.node_id() == Some(node_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualCell {
    Node(VisualNode),
    Edge(VisualEdge),
}

impl VisualCell {
    pub fn id(&self) -> &str {
        match self {
            VisualCell::Node(node) => &node.id,
            VisualCell::Edge(edge) => &edge.id,
        }
    }

    pub fn as_node(&self) -> Option<&VisualNode> {
        match self {
            VisualCell::Node(node) => Some(node),
            VisualCell::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&VisualEdge> {
        match self {
            VisualCell::Edge(edge) => Some(edge),
            VisualCell::Node(_) => None,
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, VisualCell::Edge(_))
    }
}

/// Identity of the document a visual graph was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    pub kind: DocumentKind,
}

/// The in-memory graph owned by one editing session.
///
/// All changes go through methods that take a [`MutationKind`], so the history only
/// ever sees what the caller declared structural.
#[derive(Debug)]
pub struct VisualGraph {
    meta: DocumentMeta,
    cells: Vec<VisualCell>,
    selection: BTreeSet<String>,
    history: CommandHistory,
}

impl VisualGraph {
    pub fn new(meta: DocumentMeta) -> Self {
        Self {
            meta,
            cells: Vec::new(),
            selection: BTreeSet::new(),
            history: CommandHistory::new(),
        }
    }

    /// Builds a graph from already-converted cells without touching the history.
    pub fn with_cells(meta: DocumentMeta, cells: Vec<VisualCell>) -> Result<Self, SyncError> {
        let mut seen = BTreeSet::new();
        for cell in &cells {
            if !seen.insert(cell.id()) {
                return Err(SyncError::DuplicateId(cell.id().to_string()));
            }
        }
        Ok(Self {
            cells,
            ..Self::new(meta)
        })
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    pub fn kind(&self) -> DocumentKind {
        self.meta.kind
    }

    pub fn cells(&self) -> &[VisualCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.cells.iter().filter_map(VisualCell::as_node)
    }

    pub fn edges(&self) -> impl Iterator<Item = &VisualEdge> {
        self.cells.iter().filter_map(VisualCell::as_edge)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.cells.iter().position(|c| c.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn cell(&self, id: &str) -> Option<&VisualCell> {
        self.cells.iter().find(|c| c.id() == id)
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.cell(id).and_then(VisualCell::as_node)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.cell(id).and_then(VisualCell::as_edge)
    }

    pub fn port(&self, node_id: &str, port_id: &str) -> Option<&Port> {
        self.node(node_id).and_then(|n| n.port(port_id))
    }

    /// Edges with either end attached to `node_id`.
    pub fn edges_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a VisualEdge> + 'a {
        self.edges().filter(move |e| e.touches(node_id))
    }

    /// Edges with either end attached to the given port.
    pub fn edges_at_port<'a>(
        &'a self,
        node_id: &'a str,
        port_id: &'a str,
    ) -> impl Iterator<Item = &'a VisualEdge> + 'a {
        self.edges().filter(move |e| {
            [&e.source, &e.target]
                .into_iter()
                .any(|end| end.node_id() == Some(node_id) && end.port_id() == Some(port_id))
        })
    }

    fn commit(&mut self, mutation: Mutation, kind: MutationKind) {
        self.apply_raw(&mutation);
        self.history.record(mutation, kind);
    }

    fn apply_raw(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::Insert { index, cell } => {
                let index = (*index).min(self.cells.len());
                self.cells.insert(index, cell.clone());
            }
            Mutation::Remove { cell, .. } => {
                if let Some(index) = self.index_of(cell.id()) {
                    self.cells.remove(index);
                }
                self.selection.remove(cell.id());
            }
            Mutation::Replace { before, after } => {
                if let Some(index) = self.index_of(before.id()) {
                    self.cells[index] = after.clone();
                }
            }
        }
    }

    /// Appends a cell. Edges must be added after the nodes they reference.
    pub fn add_cell(&mut self, cell: VisualCell, kind: MutationKind) -> Result<(), SyncError> {
        if self.contains(cell.id()) {
            return Err(SyncError::DuplicateId(cell.id().to_string()));
        }
        let index = self.cells.len();
        self.commit(Mutation::Insert { index, cell }, kind);
        Ok(())
    }

    pub fn remove_cell(&mut self, id: &str, kind: MutationKind) -> Option<VisualCell> {
        let index = self.index_of(id)?;
        let cell = self.cells[index].clone();
        self.commit(
            Mutation::Remove {
                index,
                cell: cell.clone(),
            },
            kind,
        );
        Some(cell)
    }

    /// Replaces the cell with the same id, returning the previous value.
    pub fn replace_cell(&mut self, cell: VisualCell, kind: MutationKind) -> Option<VisualCell> {
        let index = self.index_of(cell.id())?;
        let before = self.cells[index].clone();
        if before == cell {
            return Some(before);
        }
        self.commit(
            Mutation::Replace {
                before: before.clone(),
                after: cell,
            },
            kind,
        );
        Some(before)
    }

    /// Edits a node in place. Returns `false` when no such node exists.
    pub fn update_node(
        &mut self,
        id: &str,
        kind: MutationKind,
        edit: impl FnOnce(&mut VisualNode),
    ) -> bool {
        let Some(mut node) = self.node(id).cloned() else {
            return false;
        };
        edit(&mut node);
        self.replace_cell(VisualCell::Node(node), kind);
        true
    }

    /// Edits an edge in place. Returns `false` when no such edge exists.
    pub fn update_edge(
        &mut self,
        id: &str,
        kind: MutationKind,
        edit: impl FnOnce(&mut VisualEdge),
    ) -> bool {
        let Some(mut edge) = self.edge(id).cloned() else {
            return false;
        };
        edit(&mut edge);
        self.replace_cell(VisualCell::Edge(edge), kind);
        true
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn init_batch(&mut self) {
        self.history.init_batch();
    }

    pub fn store_batch(&mut self) {
        self.history.store_batch();
    }

    pub fn is_batching(&self) -> bool {
        self.history.is_batching()
    }

    pub fn has_undo(&self) -> bool {
        self.history.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.history.has_redo()
    }

    /// Reverts the latest history entry as one unit.
    pub fn undo(&mut self) -> bool {
        if self.history.is_batching() {
            log::warn!("undo requested while a batch is open; ignoring");
            return false;
        }
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        for mutation in entry.mutations.iter().rev() {
            self.apply_raw(&mutation.inverse());
        }
        self.history.push_redo(entry);
        true
    }

    /// Re-applies the latest undone entry.
    pub fn redo(&mut self) -> bool {
        if self.history.is_batching() {
            log::warn!("redo requested while a batch is open; ignoring");
            return false;
        }
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        for mutation in &entry.mutations {
            self.apply_raw(mutation);
        }
        self.history.push_undo(entry);
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn selection(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(String::as_str)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.insert(id.to_string());
        true
    }

    pub fn deselect(&mut self, id: &str) {
        self.selection.remove(id);
    }

    pub fn select_all(&mut self) {
        self.selection = self.cells.iter().map(|c| c.id().to_string()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortGroup, port_id};

    fn meta() -> DocumentMeta {
        DocumentMeta {
            id: "doc".into(),
            name: "Doc".into(),
            kind: DocumentKind::Network,
        }
    }

    fn node(id: &str) -> VisualCell {
        VisualCell::Node(VisualNode {
            id: id.into(),
            node_type: NodeType::Flare,
            name: id.into(),
            description: String::new(),
            params: serde_json::json!({}),
            position: Position::default(),
            size: Size::default(),
            ports: vec![
                Port::new(PortGroup::In, "gas", StreamRole::Gas, "Gas"),
                Port::new(PortGroup::Out, "gas", StreamRole::Gas, "Gas"),
            ],
            facility_id: None,
            facility_name: None,
            style: NodeStyle::default(),
        })
    }

    fn edge(id: &str, from: &str, to: &str) -> VisualCell {
        VisualCell::Edge(VisualEdge {
            id: id.into(),
            kind: EdgeKind::Standard,
            stream_role: StreamRole::Gas,
            source: Endpoint::port(from, port_id(PortGroup::Out, "gas")),
            target: Endpoint::port(to, port_id(PortGroup::In, "gas")),
            vertices: vec![],
            name: String::new(),
            params: None,
            to_facility_object_id: None,
            label: None,
            style: EdgeStyle::default(),
        })
    }

    #[test]
    fn batch_of_three_is_one_entry() {
        let mut graph = VisualGraph::new(meta());
        graph.init_batch();
        graph.add_cell(node("a"), MutationKind::Structural).unwrap();
        graph.add_cell(node("b"), MutationKind::Structural).unwrap();
        graph.add_cell(edge("e", "a", "b"), MutationKind::Structural).unwrap();
        graph.store_batch();

        assert_eq!(graph.history().undo_len(), 1);
        assert!(graph.undo());
        assert!(graph.is_empty());
        assert!(graph.redo());
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.cells()[2].id(), "e");
    }

    #[test]
    fn nested_batches_commit_once() {
        let mut graph = VisualGraph::new(meta());
        graph.init_batch();
        graph.add_cell(node("a"), MutationKind::Structural).unwrap();
        graph.init_batch();
        graph.add_cell(node("b"), MutationKind::Structural).unwrap();
        graph.store_batch();
        assert_eq!(graph.history().undo_len(), 0);
        graph.store_batch();
        assert_eq!(graph.history().undo_len(), 1);
    }

    #[test]
    fn cosmetic_changes_are_not_recorded() {
        let mut graph = VisualGraph::new(meta());
        graph.add_cell(node("a"), MutationKind::Structural).unwrap();
        graph.update_node("a", MutationKind::Cosmetic, |n| n.style.fill = "#fff".into());
        assert_eq!(graph.history().undo_len(), 1);
        assert_eq!(graph.node("a").unwrap().style.fill, "#fff");
    }

    #[test]
    fn undo_restores_removed_cell_at_its_index() {
        let mut graph = VisualGraph::new(meta());
        for id in ["a", "b", "c"] {
            graph.add_cell(node(id), MutationKind::Structural).unwrap();
        }
        graph.select("b");
        graph.remove_cell("b", MutationKind::Structural);
        assert!(!graph.is_selected("b"));
        graph.undo();
        let ids: Vec<_> = graph.cells().iter().map(VisualCell::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn new_record_clears_redo() {
        let mut graph = VisualGraph::new(meta());
        graph.add_cell(node("a"), MutationKind::Structural).unwrap();
        graph.undo();
        assert!(graph.has_redo());
        graph.add_cell(node("b"), MutationKind::Structural).unwrap();
        assert!(!graph.has_redo());
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut graph = VisualGraph::new(meta());
        graph.add_cell(node("a"), MutationKind::Structural).unwrap();
        assert_eq!(
            graph.add_cell(node("a"), MutationKind::Structural),
            Err(SyncError::DuplicateId("a".into()))
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without a matching init_batch")]
    fn unbalanced_store_asserts_in_debug() {
        let mut graph = VisualGraph::new(meta());
        graph.store_batch();
    }
}
