//! Two-way conversion between persisted documents and the visual graph.
//!
//! `domain_to_visual` runs when a document is opened; `visual_to_domain` runs on save.
//! For any well-formed document the second is the exact inverse of the first.

mod lookup;
mod nodes;

pub use lookup::{FacilityLookup, NoFacilities};
pub use nodes::{CustomCalculationNode, DeviceNode, FacilityNode, NodeBehavior, node_behavior};

use crate::edges::{EdgeKind, EdgeRecord, behavior_for, edge_type_for, hydrate};
use crate::error::{IncompleteEdgeError, SyncError};
use crate::model::{Document, DocumentKind, FacilityDocument, NetworkDocument, Node, NodeType};
use crate::visual::{
    DocumentMeta, Endpoint, EndpointSide, VisualCell, VisualEdge, VisualGraph, VisualNode,
};
use ahash::{AHashMap, AHashSet};

/// Warning shown once per save when any edge had to be dropped.
pub const UNATTACHED_EDGES_WARNING: &str = "Unattached edges will be removed upon saving.";

/// Converts a document into visual cells: nodes first, then the edges that reference
/// their ports, then (for facilities) inputs and outputs.
///
/// Fails when a facility node references a facility missing from `facilities`, when
/// ids collide, or when an edge names a node the document does not contain.
pub fn domain_to_visual(
    document: &Document,
    facilities: &dyn FacilityLookup,
) -> Result<Vec<VisualCell>, SyncError> {
    let mut nodes: Vec<VisualNode> = Vec::with_capacity(document.nodes().len());
    for node in document.nodes() {
        nodes.push(node_behavior(node.node_type).to_visual(node, facilities)?);
    }

    let node_ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges: Vec<VisualEdge> = Vec::new();
    for edge in document.edges() {
        for node_id in [&edge.from_node_id, &edge.to_node_id] {
            ensure_node(&node_ids, &edge.id, node_id)?;
        }
        let record = EdgeRecord::Interior(edge.clone());
        edges.push(edge_type_for(edge.stream_role).from_record(&record)?);
    }
    let boundary = document
        .inputs()
        .iter()
        .map(|b| EdgeRecord::Input(b.clone()))
        .chain(document.outputs().iter().map(|b| EdgeRecord::Output(b.clone())));
    for record in boundary {
        if let EdgeRecord::Input(b) | EdgeRecord::Output(b) = &record {
            match &b.node_id {
                Some(node_id) => ensure_node(&node_ids, &b.id, node_id)?,
                None => log::warn!("boundary edge '{}' is not attached to a node", b.id),
            }
        }
        edges.push(hydrate(&record)?);
    }

    check_unique_ids(&nodes, &edges)?;
    warn_unresolved_ports(&nodes, &edges);

    log::debug!(
        "loaded {} '{}' with {} nodes and {} edges",
        document.kind(),
        document.id(),
        nodes.len(),
        edges.len()
    );

    Ok(nodes
        .into_iter()
        .map(VisualCell::Node)
        .chain(edges.into_iter().map(VisualCell::Edge))
        .collect())
}

fn ensure_node(node_ids: &AHashSet<&str>, edge_id: &str, node_id: &str) -> Result<(), SyncError> {
    if node_ids.contains(node_id) {
        Ok(())
    } else {
        Err(SyncError::UnknownEdgeEndpoint {
            edge_id: edge_id.to_string(),
            node_id: node_id.to_string(),
        })
    }
}

fn check_unique_ids(nodes: &[VisualNode], edges: &[VisualEdge]) -> Result<(), SyncError> {
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(nodes.len() + edges.len());
    let ids = nodes
        .iter()
        .map(|n| n.id.as_str())
        .chain(edges.iter().map(|e| e.id.as_str()));
    for id in ids {
        if !seen.insert(id) {
            return Err(SyncError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Edges whose handle no longer matches a port still load; they are dropped on save.
fn warn_unresolved_ports(nodes: &[VisualNode], edges: &[VisualEdge]) {
    let by_id: AHashMap<&str, &VisualNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    for edge in edges {
        for end in [&edge.source, &edge.target] {
            if let Endpoint::Node {
                node_id,
                port_id: Some(port_id),
            } = end
            {
                let known = by_id
                    .get(node_id.as_str())
                    .is_some_and(|n| n.port(port_id).is_some());
                if !known {
                    log::warn!(
                        "edge '{}' references missing port '{}' on node '{}'",
                        edge.id,
                        port_id,
                        node_id
                    );
                }
            }
        }
    }
}

/// Loads a document into a fresh visual graph with an empty history.
pub fn load_visual_graph(
    document: &Document,
    facilities: &dyn FacilityLookup,
) -> Result<VisualGraph, SyncError> {
    let cells = domain_to_visual(document, facilities)?;
    let meta = DocumentMeta {
        id: document.id().to_string(),
        name: document.name().to_string(),
        kind: document.kind(),
    };
    VisualGraph::with_cells(meta, cells)
}

/// The document produced by a save, plus every edge that could not be kept.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub document: Document,
    pub dropped: Vec<IncompleteEdgeError>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    /// One aggregated warning, however many edges were dropped.
    pub fn warning(&self) -> Option<&'static str> {
        (!self.is_clean()).then_some(UNATTACHED_EDGES_WARNING)
    }

    pub fn dropped_ids(&self) -> impl Iterator<Item = &str> {
        self.dropped.iter().map(IncompleteEdgeError::edge_id)
    }

    /// The document to persist: always when clean, otherwise only if the user confirmed.
    pub fn confirm(self, confirmed: bool) -> Option<Document> {
        (self.is_clean() || confirmed).then_some(self.document)
    }
}

/// Serializes one visual edge, re-checking that both attached ports still exist and
/// carry the edge's stream role. Link edges ending on a facility node pick up that
/// node's facility id.
pub fn edge_record(graph: &VisualGraph, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
    if edge.kind.is_boundary() && graph.kind() != DocumentKind::Facility {
        return Err(IncompleteEdgeError::BoundaryOutsideFacility {
            edge_id: edge.id.clone(),
        });
    }
    let mut record = behavior_for(edge.kind).to_record(edge)?;
    for side in [EndpointSide::Source, EndpointSide::Target] {
        let Endpoint::Node {
            node_id,
            port_id: Some(port_id),
        } = edge.endpoint(side)
        else {
            continue;
        };
        let node = graph
            .node(node_id)
            .ok_or_else(|| IncompleteEdgeError::MissingEndpoint {
                edge_id: edge.id.clone(),
                side,
            })?;
        let port = node.port(port_id).ok_or_else(|| IncompleteEdgeError::MissingPort {
            edge_id: edge.id.clone(),
            side,
        })?;
        if port.stream_role != edge.stream_role {
            return Err(IncompleteEdgeError::StreamMismatch {
                edge_id: edge.id.clone(),
                side,
                expected: port.stream_role,
                found: edge.stream_role,
            });
        }
    }
    if let EdgeRecord::Interior(interior) = &mut record {
        if edge.kind == EdgeKind::Link {
            let target = graph.node(&interior.to_node_id);
            if let Some(target) = target.filter(|n| n.node_type == NodeType::Facility) {
                interior.to_facility_object_id = target.facility_id.clone();
            }
        }
    }
    Ok(record)
}

/// Converts the visual graph back into a document of the shape it was loaded from.
///
/// Edges that cannot be round-tripped are left out and reported in
/// [`SaveReport::dropped`]; the save itself never fails.
pub fn visual_to_domain(graph: &VisualGraph) -> SaveReport {
    let nodes: Vec<Node> = graph
        .nodes()
        .map(|node| node_behavior(node.node_type).to_record(node))
        .collect();

    let mut edges = Vec::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut dropped = Vec::new();
    for edge in graph.edges() {
        match edge_record(graph, edge) {
            Ok(EdgeRecord::Interior(record)) => edges.push(record),
            Ok(EdgeRecord::Input(record)) => inputs.push(record),
            Ok(EdgeRecord::Output(record)) => outputs.push(record),
            Err(err) => {
                log::warn!("dropping edge on save: {}", err);
                dropped.push(err);
            }
        }
    }

    let meta = graph.meta();
    let document = match meta.kind {
        DocumentKind::Network => Document::Network(NetworkDocument {
            id: meta.id.clone(),
            name: meta.name.clone(),
            nodes,
            edges,
        }),
        DocumentKind::Facility => Document::Facility(FacilityDocument {
            id: meta.id.clone(),
            name: meta.name.clone(),
            nodes,
            edges,
            inputs,
            outputs,
        }),
    };
    SaveReport { document, dropped }
}
