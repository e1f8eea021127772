//! Edge type registry.
//!
//! Each edge kind owns the conversion between its persisted record and its visual
//! form. Dispatch is by discriminant: [`edge_type_for`] picks the behavior for an
//! interior stream role, [`behavior_for`] for any [`EdgeKind`].

mod boundary;
mod relationship;
mod standard;

pub use boundary::{InputEdge, OutputEdge};
pub use relationship::{DevelopmentEdge, LinkEdge};
pub use standard::StandardEdge;

use crate::error::{IncompleteEdgeError, SyncError};
use crate::model::{BoundaryEdge, Edge, StreamRole};
use crate::ports::{PortGroup, port_id, split_port_id};
use crate::visual::{EdgeStyle, Endpoint, EndpointSide, VisualEdge};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Oil, gas or water allocation between two nodes.
    Standard,
    /// Facility wiring; drawn dashed.
    Link,
    /// Associates a development activity with a well group.
    Development,
    /// Facility input: free point to node port.
    Input,
    /// Facility output: node port to free point.
    Output,
}

impl EdgeKind {
    /// The interior edge kind carrying `role`.
    pub fn for_stream(role: StreamRole) -> EdgeKind {
        match role {
            StreamRole::Oil | StreamRole::Gas | StreamRole::Water => EdgeKind::Standard,
            StreamRole::Link => EdgeKind::Link,
            StreamRole::Development => EdgeKind::Development,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, EdgeKind::Input | EdgeKind::Output)
    }

    /// Port group the source end attaches to; `None` when the source is a free point.
    pub fn source_group(&self) -> Option<PortGroup> {
        match self {
            EdgeKind::Standard | EdgeKind::Output => Some(PortGroup::Out),
            EdgeKind::Link => Some(PortGroup::LinkOut),
            EdgeKind::Development => Some(PortGroup::DevOut),
            EdgeKind::Input => None,
        }
    }

    /// Port group the target end attaches to; `None` when the target is a free point.
    pub fn target_group(&self) -> Option<PortGroup> {
        match self {
            EdgeKind::Standard | EdgeKind::Input => Some(PortGroup::In),
            EdgeKind::Link => Some(PortGroup::LinkIn),
            EdgeKind::Development => Some(PortGroup::DevIn),
            EdgeKind::Output => None,
        }
    }

    pub fn group(&self, side: EndpointSide) -> Option<PortGroup> {
        match side {
            EndpointSide::Source => self.source_group(),
            EndpointSide::Target => self.target_group(),
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeKind::Standard => "standard",
            EdgeKind::Link => "link",
            EdgeKind::Development => "development",
            EdgeKind::Input => "input",
            EdgeKind::Output => "output",
        };
        f.write_str(name)
    }
}

/// A persisted edge of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeRecord {
    Interior(Edge),
    Input(BoundaryEdge),
    Output(BoundaryEdge),
}

impl EdgeRecord {
    pub fn id(&self) -> &str {
        match self {
            EdgeRecord::Interior(edge) => &edge.id,
            EdgeRecord::Input(edge) | EdgeRecord::Output(edge) => &edge.id,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            EdgeRecord::Interior(edge) => EdgeKind::for_stream(edge.stream_role),
            EdgeRecord::Input(_) => EdgeKind::Input,
            EdgeRecord::Output(_) => EdgeKind::Output,
        }
    }
}

/// Conversion contract shared by every edge kind.
pub trait EdgeBehavior: Send + Sync {
    fn kind(&self) -> EdgeKind;

    /// Hydrates a visual edge, turning persisted handles into full port ids.
    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError>;

    /// Exact inverse of [`from_record`](Self::from_record).
    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError>;

    /// Text drawn on the edge, if the kind shows one.
    fn label(&self, _edge: &VisualEdge) -> Option<String> {
        None
    }
}

/// Behavior for the interior edge carrying `role`.
pub fn edge_type_for(role: StreamRole) -> &'static dyn EdgeBehavior {
    behavior_for(EdgeKind::for_stream(role))
}

pub fn behavior_for(kind: EdgeKind) -> &'static dyn EdgeBehavior {
    match kind {
        EdgeKind::Standard => &StandardEdge,
        EdgeKind::Link => &LinkEdge,
        EdgeKind::Development => &DevelopmentEdge,
        EdgeKind::Input => &InputEdge,
        EdgeKind::Output => &OutputEdge,
    }
}

/// Hydrates any record through its own behavior.
pub fn hydrate(record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
    behavior_for(record.kind()).from_record(record)
}

fn attached(node_id: &str, handle: Option<&str>, group: Option<PortGroup>) -> Endpoint {
    Endpoint::Node {
        node_id: node_id.to_string(),
        port_id: match (handle, group) {
            (Some(handle), Some(group)) => Some(port_id(group, handle)),
            _ => None,
        },
    }
}

/// Shared hydration for standard, link and development edges.
fn hydrate_interior(edge: &Edge, kind: EdgeKind) -> VisualEdge {
    VisualEdge {
        id: edge.id.clone(),
        kind,
        stream_role: edge.stream_role,
        source: attached(&edge.from_node_id, edge.from_handle.as_deref(), kind.source_group()),
        target: attached(&edge.to_node_id, edge.to_handle.as_deref(), kind.target_group()),
        vertices: edge.vertices.clone(),
        name: edge.name.clone(),
        params: None,
        to_facility_object_id: None,
        label: None,
        style: EdgeStyle::default(),
    }
}

fn expect_interior<'a>(record: &'a EdgeRecord, kind: EdgeKind) -> Result<&'a Edge, SyncError> {
    match record {
        EdgeRecord::Interior(edge) if EdgeKind::for_stream(edge.stream_role) == kind => Ok(edge),
        other => Err(SyncError::EdgeKindMismatch {
            edge_id: other.id().to_string(),
            expected: kind,
        }),
    }
}

/// Resolves one attached end of `edge` to `(node_id, handle)`.
fn resolve_end(
    edge: &VisualEdge,
    side: EndpointSide,
) -> Result<(String, String), IncompleteEdgeError> {
    let (node_id, port_id) = match edge.endpoint(side) {
        Endpoint::Node { node_id, port_id } => (node_id, port_id),
        Endpoint::Point(_) => {
            return Err(IncompleteEdgeError::MissingEndpoint {
                edge_id: edge.id.clone(),
                side,
            });
        }
    };
    let port_id = port_id.as_deref().ok_or_else(|| IncompleteEdgeError::MissingPort {
        edge_id: edge.id.clone(),
        side,
    })?;
    match split_port_id(port_id) {
        Some((group, handle)) if Some(group) == edge.kind.group(side) => {
            Ok((node_id.clone(), handle.to_string()))
        }
        _ => Err(IncompleteEdgeError::MalformedHandle {
            edge_id: edge.id.clone(),
            side,
            port_id: port_id.to_string(),
        }),
    }
}

/// Shared serialization for standard, link and development edges.
fn serialize_interior(edge: &VisualEdge) -> Result<Edge, IncompleteEdgeError> {
    let (from_node_id, from_handle) = resolve_end(edge, EndpointSide::Source)?;
    let (to_node_id, to_handle) = resolve_end(edge, EndpointSide::Target)?;
    Ok(Edge {
        id: edge.id.clone(),
        stream_role: edge.stream_role,
        from_node_id,
        from_handle: Some(from_handle),
        to_node_id,
        to_handle: Some(to_handle),
        vertices: edge.vertices.clone(),
        name: edge.name.clone(),
        params: None,
        to_facility_object_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllocationSeries;

    #[test]
    fn stream_roles_map_to_kinds() {
        assert_eq!(edge_type_for(StreamRole::Oil).kind(), EdgeKind::Standard);
        assert_eq!(edge_type_for(StreamRole::Water).kind(), EdgeKind::Standard);
        assert_eq!(edge_type_for(StreamRole::Link).kind(), EdgeKind::Link);
        assert_eq!(
            edge_type_for(StreamRole::Development).kind(),
            EdgeKind::Development
        );
    }

    #[test]
    fn standard_edge_handles_become_port_ids() {
        let mut edge = Edge::new("e1", StreamRole::Oil, ("wg", "oil"), ("tank", "oil"));
        edge.params = Some(AllocationSeries::flat(40.0));
        let record = EdgeRecord::Interior(edge.clone());
        let visual = hydrate(&record).unwrap();
        assert_eq!(visual.source.port_id(), Some("out_oil"));
        assert_eq!(visual.target.port_id(), Some("in_oil"));
        assert_eq!(visual.label.as_deref(), Some("40%"));
        assert_eq!(StandardEdge.to_record(&visual).unwrap(), record);
    }

    #[test]
    fn missing_port_is_incomplete() {
        let record = EdgeRecord::Interior(Edge {
            to_handle: None,
            ..Edge::new("e1", StreamRole::Gas, ("a", "gas"), ("b", "gas"))
        });
        let visual = hydrate(&record).unwrap();
        assert_eq!(
            StandardEdge.to_record(&visual),
            Err(IncompleteEdgeError::MissingPort {
                edge_id: "e1".into(),
                side: EndpointSide::Target
            })
        );
    }

    #[test]
    fn wrong_behavior_refuses_record() {
        let record = EdgeRecord::Interior(Edge::new(
            "e1",
            StreamRole::Link,
            ("a", "link"),
            ("b", "link"),
        ));
        assert!(matches!(
            StandardEdge.from_record(&record),
            Err(SyncError::EdgeKindMismatch { .. })
        ));
    }
}
