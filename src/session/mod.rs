//! The editing session: one open document, its visual graph and the operations the
//! editor surface calls.
//!
//! Every multi-step operation runs inside a history batch so one user action undoes as
//! one unit. Styling and zoom are cosmetic and never reach the history.

mod clipboard;
mod layout;
mod shortcuts;
mod theme;

pub use clipboard::Clipboard;
pub use layout::{LayoutPlan, plan_layout, rank_nodes};
pub use shortcuts::{KEY_BINDINGS, Shortcut};
pub use theme::{Theme, apply_theme};

use crate::config::SessionConfig;
use crate::edges::{EdgeKind, behavior_for};
use crate::error::{ConnectionRejection, SessionError, SyncError};
use crate::model::{AllocationSeries, Document, DocumentKind, FacilityDocument, Node, NodeType, Position, StreamRole};
use crate::ports::{Port, PortDiff, diff_ports};
use crate::sync::{SaveReport, load_visual_graph, node_behavior, visual_to_domain};
use crate::validation::{ConnectionRules, ParamsValidator, ValidatorRegistry};
use crate::visual::history::MutationKind;
use crate::visual::{Endpoint, EndpointSide, Size, VisualCell, VisualEdge, VisualGraph, VisualNode};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// What a node dialog hands back on confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogResult {
    pub name: String,
    pub description: String,
    pub params: serde_json::Value,
}

/// What an edge dialog hands back on confirm. Only standard edges carry params.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDialogResult {
    pub name: String,
    pub params: Option<AllocationSeries>,
}

/// Builder for [`EditorSession`].
pub struct SessionBuilder {
    document: Document,
    facilities: AHashMap<String, FacilityDocument>,
    config: SessionConfig,
    validators: ValidatorRegistry,
    theme: Theme,
}

impl SessionBuilder {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            facilities: AHashMap::new(),
            config: SessionConfig::default(),
            validators: ValidatorRegistry::default(),
            theme: Theme::default(),
        }
    }

    /// Facility documents referenced by facility nodes, keyed by their id.
    pub fn with_facilities(mut self, facilities: impl IntoIterator<Item = FacilityDocument>) -> Self {
        self.facilities
            .extend(facilities.into_iter().map(|f| (f.id.clone(), f)));
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn ParamsValidator>) -> Self {
        self.validators.register(validator);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> Result<EditorSession, SyncError> {
        let graph = load_visual_graph(&self.document, &self.facilities)?;
        let mut session = EditorSession {
            graph,
            facilities: self.facilities,
            rules: ConnectionRules::new(self.config.capacity_limits.clone()),
            validators: self.validators,
            config: self.config,
            theme: self.theme,
            zoom: 1.0,
            clipboard: Clipboard::default(),
            next_id: 0,
        };
        session.decorate();
        Ok(session)
    }
}

/// One open document being edited.
pub struct EditorSession {
    graph: VisualGraph,
    facilities: AHashMap<String, FacilityDocument>,
    rules: ConnectionRules,
    validators: ValidatorRegistry,
    config: SessionConfig,
    theme: Theme,
    zoom: f64,
    clipboard: Clipboard,
    next_id: u64,
}

impl EditorSession {
    pub fn builder(document: impl Into<Document>) -> SessionBuilder {
        SessionBuilder::new(document.into())
    }

    pub fn graph(&self) -> &VisualGraph {
        &self.graph
    }

    /// Direct access for toolkit events the session has no dedicated operation for.
    pub fn graph_mut(&mut self) -> &mut VisualGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rules(&self) -> &ConnectionRules {
        &self.rules
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn facility(&self, id: &str) -> Option<&FacilityDocument> {
        self.facilities.get(id)
    }

    /// Swaps in another document. History and selection start empty; the clipboard
    /// survives so cells can be pasted across documents.
    pub fn replace_document(&mut self, document: impl Into<Document>) -> Result<(), SyncError> {
        self.graph = load_visual_graph(&document.into(), &self.facilities)?;
        self.decorate();
        Ok(())
    }

    /// Adds or updates a facility definition. Facility nodes referencing it keep their
    /// ports until [`refresh_ports`](Self::refresh_ports) is called.
    pub fn register_facility(&mut self, facility: FacilityDocument) {
        self.facilities.insert(facility.id.clone(), facility);
    }

    /// Applies configured sizes and theme colors without touching the history.
    fn decorate(&mut self) {
        let size = Size {
            width: self.config.node_width,
            height: self.config.node_height,
        };
        let ids: Vec<String> = self.graph.nodes().map(|n| n.id.clone()).collect();
        for id in ids {
            self.graph
                .update_node(&id, MutationKind::Cosmetic, |n| n.size = size);
        }
        apply_theme(&mut self.graph, self.theme);
    }

    /// Runs `op` inside one history batch, closing the batch even when `op` fails.
    fn batched<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        self.graph.init_batch();
        let result = op(self);
        self.graph.store_batch();
        result
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{}-{}", prefix, self.next_id);
            if !self.graph.contains(&id) {
                return id;
            }
        }
    }

    fn validate_params(&self, id: &str, node_type: NodeType, params: &serde_json::Value) -> Result<(), SessionError> {
        self.validators
            .validate(node_type, params)
            .map_err(|message| SessionError::InvalidParams {
                id: id.to_string(),
                message,
            })
    }

    fn styled_node(&self, mut node: VisualNode) -> VisualNode {
        node.size = Size {
            width: self.config.node_width,
            height: self.config.node_height,
        };
        node.style = self.theme.node_style(node.node_type);
        node
    }

    /// Adds a node dropped from the palette. An empty id is replaced by a generated one.
    pub fn drop_node(&mut self, mut node: Node) -> Result<String, SessionError> {
        if node.id.is_empty() {
            node.id = self.fresh_id(node.node_type.as_str());
        }
        self.validate_params(&node.id, node.node_type, &node.params)?;
        let visual = node_behavior(node.node_type).to_visual(&node, &self.facilities)?;
        let visual = self.styled_node(visual);
        let id = visual.id.clone();
        self.graph
            .add_cell(VisualCell::Node(visual), MutationKind::Structural)?;
        log::debug!("dropped {} node '{}'", node.node_type, id);
        Ok(id)
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), SessionError> {
        if self
            .graph
            .update_node(node_id, MutationKind::Structural, |n| n.position = position)
        {
            Ok(())
        } else {
            Err(SessionError::UnknownCell(node_id.to_string()))
        }
    }

    fn attached_port(&self, endpoint: &Endpoint, side: EndpointSide) -> Result<&Port, SessionError> {
        let rejected = SessionError::ConnectionRejected;
        let Endpoint::Node { node_id, port_id } = endpoint else {
            return Err(rejected(ConnectionRejection::Unattached(side)));
        };
        let port_id = port_id
            .as_deref()
            .ok_or_else(|| rejected(ConnectionRejection::Unattached(side)))?;
        self.graph.port(node_id, port_id).ok_or_else(|| {
            rejected(ConnectionRejection::UnknownPort {
                node_id: node_id.clone(),
                port_id: port_id.to_string(),
            })
        })
    }

    /// Builds the edge a drag from `source` to `target` would create, without
    /// validating or adding it. A free source makes an input edge, a free target an
    /// output edge; otherwise the kind follows the source port's stream.
    pub fn candidate_edge(&mut self, source: Endpoint, target: Endpoint) -> Result<VisualEdge, SessionError> {
        let (kind, stream_role) = if source.is_free() {
            let port = self.attached_port(&target, EndpointSide::Target)?;
            (EdgeKind::Input, port.stream_role)
        } else {
            let port = self.attached_port(&source, EndpointSide::Source)?;
            let kind = if target.is_free() {
                EdgeKind::Output
            } else {
                EdgeKind::for_stream(port.stream_role)
            };
            (kind, port.stream_role)
        };
        let mut edge = VisualEdge {
            id: self.fresh_id("edge"),
            kind,
            stream_role,
            source,
            target,
            vertices: Vec::new(),
            name: String::new(),
            params: (kind == EdgeKind::Standard).then(AllocationSeries::default),
            to_facility_object_id: None,
            label: None,
            style: self.theme.edge_style(kind, stream_role),
        };
        self.refresh_edge_derived(&mut edge);
        Ok(edge)
    }

    /// Recomputes what an edge derives from its endpoints: the label, the style and,
    /// for link edges, the facility id of a facility target.
    fn refresh_edge_derived(&self, edge: &mut VisualEdge) {
        edge.label = behavior_for(edge.kind).label(edge);
        edge.style = self.theme.edge_style(edge.kind, edge.stream_role);
        if edge.kind == EdgeKind::Link {
            edge.to_facility_object_id = edge
                .target
                .node_id()
                .and_then(|id| self.graph.node(id))
                .filter(|n| n.node_type == NodeType::Facility)
                .and_then(|n| n.facility_id.clone());
        }
    }

    /// The boolean the canvas samples while dragging.
    pub fn can_connect(&self, candidate: &VisualEdge) -> bool {
        self.rules.can_connect(candidate, &self.graph)
    }

    /// Validates and adds a new edge. Returns its id.
    pub fn connect(&mut self, source: Endpoint, target: Endpoint) -> Result<String, SessionError> {
        let edge = self.candidate_edge(source, target)?;
        self.rules
            .check(&edge, &self.graph)
            .map_err(SessionError::ConnectionRejected)?;
        let id = edge.id.clone();
        self.graph
            .add_cell(VisualCell::Edge(edge), MutationKind::Structural)?;
        Ok(id)
    }

    /// Adds a boundary edge with both ends free, as dragged out of the palette inside a
    /// facility. It stays unattached until [`reconnect`](Self::reconnect) pins one end.
    pub fn add_boundary_edge(
        &mut self,
        kind: EdgeKind,
        stream_role: StreamRole,
        from: Position,
        to: Position,
    ) -> Result<String, SessionError> {
        if !kind.is_boundary() || self.graph.kind() != DocumentKind::Facility {
            return Err(SessionError::ConnectionRejected(
                ConnectionRejection::BoundaryOutsideFacility,
            ));
        }
        let id = self.fresh_id(if kind == EdgeKind::Input { "input" } else { "output" });
        let edge = VisualEdge {
            id: id.clone(),
            kind,
            stream_role,
            source: Endpoint::Point(from),
            target: Endpoint::Point(to),
            vertices: Vec::new(),
            name: String::new(),
            params: None,
            to_facility_object_id: None,
            label: None,
            style: self.theme.edge_style(kind, stream_role),
        };
        self.graph
            .add_cell(VisualCell::Edge(edge), MutationKind::Structural)?;
        Ok(id)
    }

    /// Moves the ends of an existing edge. The edge keeps its id and kind; boundary
    /// edges adopt the stream of the port they attach to. A rejected reconnect leaves
    /// the edge where it was.
    pub fn reconnect(&mut self, edge_id: &str, source: Endpoint, target: Endpoint) -> Result<(), SessionError> {
        let mut edge = self
            .graph
            .edge(edge_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCell(edge_id.to_string()))?;
        edge.source = source;
        edge.target = target;
        if edge.kind.is_boundary() {
            let side = match edge.kind {
                EdgeKind::Input => EndpointSide::Target,
                _ => EndpointSide::Source,
            };
            edge.stream_role = self.attached_port(edge.endpoint(side), side)?.stream_role;
        }
        self.rules
            .check(&edge, &self.graph)
            .map_err(SessionError::ConnectionRejected)?;
        self.refresh_edge_derived(&mut edge);
        self.graph
            .replace_cell(VisualCell::Edge(edge), MutationKind::Structural);
        Ok(())
    }

    /// Applies a confirmed node dialog. `None` means the dialog was cancelled.
    /// Returns whether anything was applied.
    pub fn apply_node_dialog(&mut self, node_id: &str, result: Option<DialogResult>) -> Result<bool, SessionError> {
        let Some(result) = result else {
            return Ok(false);
        };
        let node_type = self
            .graph
            .node(node_id)
            .map(|n| n.node_type)
            .ok_or_else(|| SessionError::UnknownCell(node_id.to_string()))?;
        self.validate_params(node_id, node_type, &result.params)?;
        self.batched(|session| {
            session
                .graph
                .update_node(node_id, MutationKind::Structural, |n| {
                    n.name = result.name;
                    n.description = result.description;
                    n.params = result.params;
                });
            if node_type == NodeType::CustomCalculation {
                session.refresh_ports(node_id)?;
            }
            Ok(true)
        })
    }

    pub fn apply_edge_dialog(&mut self, edge_id: &str, result: Option<EdgeDialogResult>) -> Result<bool, SessionError> {
        let Some(result) = result else {
            return Ok(false);
        };
        let mut edge = self
            .graph
            .edge(edge_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCell(edge_id.to_string()))?;
        if edge.kind != EdgeKind::Standard && result.params.is_some() {
            return Err(SessionError::InvalidParams {
                id: edge_id.to_string(),
                message: format!("{} edges carry no allocation params", edge.kind),
            });
        }
        edge.name = result.name;
        edge.params = result.params;
        self.refresh_edge_derived(&mut edge);
        self.graph
            .replace_cell(VisualCell::Edge(edge), MutationKind::Structural);
        Ok(true)
    }

    /// Re-derives a node's ports. Kept ports keep their id and position but take the
    /// fresh stream role and label; new ones are appended. Edges attached to removed
    /// ports, or to ports whose stream role changed, are removed in the same batch.
    pub fn refresh_ports(&mut self, node_id: &str) -> Result<PortDiff, SessionError> {
        let node = self
            .graph
            .node(node_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCell(node_id.to_string()))?;
        let behavior = node_behavior(node.node_type);
        let fresh = behavior.derive_ports(&behavior.to_record(&node), &self.facilities)?;
        let diff = diff_ports(&node.ports, &fresh);
        if diff.is_empty() {
            return Ok(diff);
        }
        log::debug!(
            "node '{}': {} ports added, {} removed, {} changed",
            node_id,
            diff.added.len(),
            diff.removed.len(),
            diff.changed.len()
        );
        self.batched(|session| {
            let stale: Vec<String> = diff
                .removed
                .iter()
                .chain(diff.restreamed(&node.ports))
                .flat_map(|port| session.graph.edges_at_port(node_id, &port.id))
                .map(|e| e.id.clone())
                .unique()
                .collect();
            for id in stale {
                session.graph.remove_cell(&id, MutationKind::Structural);
            }
            let ports = diff.apply(&node.ports);
            session
                .graph
                .update_node(node_id, MutationKind::Structural, |n| n.ports = ports);
            Ok(())
        })?;
        Ok(diff)
    }

    /// Changes a node's type and params, re-deriving its ports. Facility nodes cannot
    /// change type, nor can other nodes become facilities.
    pub fn change_node_type(
        &mut self,
        node_id: &str,
        node_type: NodeType,
        params: serde_json::Value,
    ) -> Result<PortDiff, SessionError> {
        let from = self
            .graph
            .node(node_id)
            .map(|n| n.node_type)
            .ok_or_else(|| SessionError::UnknownCell(node_id.to_string()))?;
        if from != node_type && (from == NodeType::Facility || node_type == NodeType::Facility) {
            return Err(SessionError::UnsupportedTypeChange {
                node_id: node_id.to_string(),
                from,
                to: node_type,
            });
        }
        self.validate_params(node_id, node_type, &params)?;
        let style = self.theme.node_style(node_type);
        self.batched(|session| {
            session
                .graph
                .update_node(node_id, MutationKind::Structural, |n| {
                    if n.name == n.node_type.display_name() {
                        n.name = node_type.display_name().to_string();
                    }
                    n.node_type = node_type;
                    n.params = params;
                });
            session
                .graph
                .update_node(node_id, MutationKind::Cosmetic, |n| n.style = style);
            session.refresh_ports(node_id)
        })
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.graph.select(id)
    }

    pub fn select_all(&mut self) {
        self.graph.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.graph.clear_selection();
    }

    /// Copies the selection to the clipboard. Returns the number of cells captured.
    pub fn copy(&mut self) -> usize {
        self.clipboard = Clipboard::capture(&self.graph);
        self.clipboard.len()
    }

    pub fn cut(&mut self) -> usize {
        let copied = self.copy();
        self.delete_selection();
        copied
    }

    /// Pastes the clipboard with fresh ids, offset from the originals, and selects the
    /// pasted cells. Returns the new ids.
    pub fn paste(&mut self) -> Result<Vec<String>, SessionError> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        let offset = self.clipboard.next_offset(self.config.paste_offset);
        let cells = self.clipboard.cells().to_vec();

        let mut renamed: AHashMap<String, String> = AHashMap::new();
        let mut pasted = Vec::with_capacity(cells.len());
        for cell in &cells {
            let prefix = match cell {
                VisualCell::Node(node) => node.node_type.as_str(),
                VisualCell::Edge(_) => "edge",
            };
            let id = self.fresh_id(prefix);
            renamed.insert(cell.id().to_string(), id);
        }
        let remap = |end: &Endpoint| match end {
            Endpoint::Node { node_id, port_id } => Endpoint::Node {
                node_id: renamed.get(node_id).cloned().unwrap_or_else(|| node_id.clone()),
                port_id: port_id.clone(),
            },
            Endpoint::Point(p) => Endpoint::Point(p.offset(offset)),
        };
        for cell in cells {
            let cell = match cell {
                VisualCell::Node(mut node) => {
                    node.id = renamed[&node.id].clone();
                    node.position = node.position.offset(offset);
                    VisualCell::Node(node)
                }
                VisualCell::Edge(mut edge) => {
                    edge.id = renamed[&edge.id].clone();
                    edge.source = remap(&edge.source);
                    edge.target = remap(&edge.target);
                    edge.vertices = edge.vertices.iter().map(|v| v.offset(offset)).collect();
                    VisualCell::Edge(edge)
                }
            };
            pasted.push(cell);
        }

        self.batched(|session| {
            let mut ids = Vec::with_capacity(pasted.len());
            for cell in pasted {
                ids.push(cell.id().to_string());
                session.graph.add_cell(cell, MutationKind::Structural)?;
            }
            session.graph.clear_selection();
            for id in &ids {
                session.graph.select(id);
            }
            Ok(ids)
        })
    }

    /// Removes the selected cells and every edge attached to a removed node.
    /// Returns the number of cells removed.
    pub fn delete_selection(&mut self) -> usize {
        let selected: AHashSet<String> = self.graph.selection().map(str::to_string).collect();
        if selected.is_empty() {
            return 0;
        }
        let edges: Vec<String> = self
            .graph
            .edges()
            .filter(|e| {
                selected.contains(&e.id)
                    || [&e.source, &e.target]
                        .into_iter()
                        .any(|end| end.node_id().is_some_and(|id| selected.contains(id)))
            })
            .map(|e| e.id.clone())
            .collect();
        let nodes: Vec<String> = self
            .graph
            .nodes()
            .filter(|n| selected.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();

        self.graph.init_batch();
        let mut removed = 0;
        for id in edges.iter().chain(&nodes) {
            if self.graph.remove_cell(id, MutationKind::Structural).is_some() {
                removed += 1;
            }
        }
        self.graph.store_batch();
        removed
    }

    /// Lays the graph out in columns by longest-path rank. Returns the number of nodes
    /// that moved.
    pub fn auto_layout(&mut self) -> usize {
        let plan = plan_layout(&self.graph, &self.config.layout);
        self.graph.init_batch();
        let mut moved = 0;
        for (id, position) in plan.nodes {
            let unchanged = self
                .graph
                .node(&id)
                .is_some_and(|n| n.position.approx_eq(&position, f64::EPSILON));
            if !unchanged {
                self.graph
                    .update_node(&id, MutationKind::Structural, |n| n.position = position);
                moved += 1;
            }
        }
        for (id, side, point) in plan.free_ends {
            self.graph.update_edge(&id, MutationKind::Structural, |e| {
                e.vertices.clear();
                match side {
                    EndpointSide::Source => e.source = Endpoint::Point(point),
                    EndpointSide::Target => e.target = Endpoint::Point(point),
                }
            });
        }
        self.graph.store_batch();
        moved
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        apply_theme(&mut self.graph, theme);
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.config.zoom.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.config.zoom.step)
    }

    pub fn zoom_reset(&mut self) -> f64 {
        self.set_zoom(1.0)
    }

    fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = zoom.clamp(self.config.zoom.min, self.config.zoom.max);
        self.zoom
    }

    /// Dispatches a keyboard shortcut to the matching operation.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Result<(), SessionError> {
        match shortcut {
            Shortcut::Copy => {
                self.copy();
            }
            Shortcut::Cut => {
                self.cut();
            }
            Shortcut::Paste => {
                self.paste()?;
            }
            Shortcut::Delete => {
                self.delete_selection();
            }
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::SelectAll => self.select_all(),
            Shortcut::ZoomIn => {
                self.zoom_in();
            }
            Shortcut::ZoomOut => {
                self.zoom_out();
            }
            Shortcut::ZoomReset => {
                self.zoom_reset();
            }
        }
        Ok(())
    }

    /// Reverts the latest history entry. Restored cells carry the styling they had
    /// when recorded, so the current theme and node size are re-applied.
    pub fn undo(&mut self) -> bool {
        let undone = self.graph.undo();
        if undone {
            self.decorate();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.graph.redo();
        if redone {
            self.decorate();
        }
        redone
    }

    pub fn has_undo(&self) -> bool {
        self.graph.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.graph.has_redo()
    }

    /// Serializes the graph. Check [`SaveReport::warning`] before persisting.
    pub fn save(&self) -> SaveReport {
        let report = visual_to_domain(&self.graph);
        if let Some(warning) = report.warning() {
            log::warn!("{} ({} edges)", warning, report.dropped.len());
        }
        report
    }
}
