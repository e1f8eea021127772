use super::{EdgeBehavior, EdgeKind, EdgeRecord, resolve_end};
use crate::error::{IncompleteEdgeError, SyncError};
use crate::model::BoundaryEdge;
use crate::ports::{PortGroup, port_id};
use crate::visual::{EdgeStyle, Endpoint, EndpointSide, VisualEdge};

fn hydrate_boundary(edge: &BoundaryEdge, kind: EdgeKind) -> VisualEdge {
    let free = Endpoint::Point(edge.point);
    let group = match kind {
        EdgeKind::Input => PortGroup::In,
        _ => PortGroup::Out,
    };
    let attached = match &edge.node_id {
        Some(node_id) => Endpoint::Node {
            node_id: node_id.clone(),
            port_id: edge.handle.as_deref().map(|handle| port_id(group, handle)),
        },
        None => Endpoint::Point(edge.point),
    };
    let (source, target) = match kind {
        EdgeKind::Input => (free, attached),
        _ => (attached, free),
    };
    VisualEdge {
        id: edge.id.clone(),
        kind,
        stream_role: edge.stream_role,
        source,
        target,
        vertices: edge.vertices.clone(),
        name: edge.name.clone(),
        params: None,
        to_facility_object_id: None,
        label: None,
        style: EdgeStyle::default(),
    }
}

/// A boundary edge is only persisted once its node end is fully resolved.
fn serialize_boundary(
    edge: &VisualEdge,
    free_side: EndpointSide,
    attached_side: EndpointSide,
) -> Result<BoundaryEdge, IncompleteEdgeError> {
    let point = edge
        .endpoint(free_side)
        .point()
        .ok_or_else(|| IncompleteEdgeError::AttachedFreeEnd {
            edge_id: edge.id.clone(),
            side: free_side,
        })?;
    let (node_id, handle) = resolve_end(edge, attached_side)?;
    Ok(BoundaryEdge {
        id: edge.id.clone(),
        stream_role: edge.stream_role,
        node_id: Some(node_id),
        handle: Some(handle),
        point,
        vertices: edge.vertices.clone(),
        name: edge.name.clone(),
    })
}

/// Facility input: enters the drawing from its edge and ends on an `in` port.
pub struct InputEdge;

impl EdgeBehavior for InputEdge {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Input
    }

    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
        match record {
            EdgeRecord::Input(edge) => Ok(hydrate_boundary(edge, EdgeKind::Input)),
            other => Err(SyncError::EdgeKindMismatch {
                edge_id: other.id().to_string(),
                expected: EdgeKind::Input,
            }),
        }
    }

    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
        serialize_boundary(edge, EndpointSide::Source, EndpointSide::Target).map(EdgeRecord::Input)
    }
}

/// Facility output: starts on an `out` port and leaves the drawing.
pub struct OutputEdge;

impl EdgeBehavior for OutputEdge {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Output
    }

    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
        match record {
            EdgeRecord::Output(edge) => Ok(hydrate_boundary(edge, EdgeKind::Output)),
            other => Err(SyncError::EdgeKindMismatch {
                edge_id: other.id().to_string(),
                expected: EdgeKind::Output,
            }),
        }
    }

    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
        serialize_boundary(edge, EndpointSide::Target, EndpointSide::Source).map(EdgeRecord::Output)
    }
}
