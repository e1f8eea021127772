use crate::edges::EdgeKind;
use crate::error::ConnectionRejection;
use crate::model::{DocumentKind, NodeType, StreamRole};
use crate::ports::{Port, PortDirection, PortGroup};
use crate::visual::{Endpoint, EndpointSide, VisualEdge, VisualGraph, VisualNode};
use serde::{Deserialize, Serialize};

/// Maximum number of edges of one stream that may end on one port group of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityLimit {
    pub node_type: NodeType,
    pub group: PortGroup,
    pub stream_role: StreamRole,
    pub max: usize,
}

pub fn default_capacity_limits() -> Vec<CapacityLimit> {
    vec![CapacityLimit {
        node_type: NodeType::WellGroup,
        group: PortGroup::DevIn,
        stream_role: StreamRole::Development,
        max: 20,
    }]
}

/// The connection validator.
///
/// [`check`](Self::check) explains a rejection; [`can_connect`](Self::can_connect) is
/// the boolean the canvas samples while an edge is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRules {
    limits: Vec<CapacityLimit>,
}

impl Default for ConnectionRules {
    fn default() -> Self {
        Self::new(default_capacity_limits())
    }
}

struct Attached<'a> {
    node: &'a VisualNode,
    port: &'a Port,
}

impl ConnectionRules {
    pub fn new(limits: Vec<CapacityLimit>) -> Self {
        Self { limits }
    }

    /// Adds a limit, replacing any existing limit for the same triple.
    pub fn with_limit(mut self, limit: CapacityLimit) -> Self {
        self.limits.retain(|l| {
            (l.node_type, l.group, l.stream_role) != (limit.node_type, limit.group, limit.stream_role)
        });
        self.limits.push(limit);
        self
    }

    pub fn limits(&self) -> &[CapacityLimit] {
        &self.limits
    }

    pub fn limit_for(&self, node_type: NodeType, group: PortGroup, stream_role: StreamRole) -> Option<usize> {
        self.limits
            .iter()
            .find(|l| l.node_type == node_type && l.group == group && l.stream_role == stream_role)
            .map(|l| l.max)
    }

    pub fn can_connect(&self, candidate: &VisualEdge, graph: &VisualGraph) -> bool {
        match self.check(candidate, graph) {
            Ok(()) => true,
            Err(reason) => {
                log::trace!("connection '{}' rejected: {}", candidate.id, reason);
                false
            }
        }
    }

    /// Validates `candidate` against the current graph. The candidate itself may
    /// already be part of the graph (re-validation after a reconnect).
    pub fn check(&self, candidate: &VisualEdge, graph: &VisualGraph) -> Result<(), ConnectionRejection> {
        if candidate.kind.is_boundary() {
            return self.check_boundary(candidate, graph);
        }

        let source = resolve(graph, &candidate.source, EndpointSide::Source)?;
        let target = resolve(graph, &candidate.target, EndpointSide::Target)?;

        if source.port.stream_role != target.port.stream_role {
            return Err(ConnectionRejection::StreamMismatch {
                source_role: source.port.stream_role,
                target_role: target.port.stream_role,
            });
        }
        if candidate.stream_role != source.port.stream_role {
            return Err(ConnectionRejection::StreamMismatch {
                source_role: candidate.stream_role,
                target_role: source.port.stream_role,
            });
        }
        if source.node.id == target.node.id {
            return Err(ConnectionRejection::SelfLoop);
        }
        if target.port.group.direction() == PortDirection::Output {
            return Err(ConnectionRejection::TargetIsOutput);
        }
        if source.port.group.direction() == PortDirection::Input {
            return Err(ConnectionRejection::SourceIsInput);
        }
        if let Some(existing) = graph.edges().find(|e| {
            e.id != candidate.id && e.source == candidate.source && e.target == candidate.target
        }) {
            return Err(ConnectionRejection::Duplicate(existing.id.clone()));
        }
        self.check_capacity(candidate, &target, graph)
    }

    fn check_boundary(&self, candidate: &VisualEdge, graph: &VisualGraph) -> Result<(), ConnectionRejection> {
        if graph.kind() != DocumentKind::Facility {
            return Err(ConnectionRejection::BoundaryOutsideFacility);
        }
        let (free_side, attached_side, expected) = match candidate.kind {
            EdgeKind::Input => (EndpointSide::Source, EndpointSide::Target, PortGroup::In),
            _ => (EndpointSide::Target, EndpointSide::Source, PortGroup::Out),
        };
        if !candidate.endpoint(free_side).is_free() {
            return Err(ConnectionRejection::BoundaryEndAttached(free_side));
        }
        let attached = resolve(graph, candidate.endpoint(attached_side), attached_side)?;
        if attached.port.group != expected {
            return Err(ConnectionRejection::BoundaryGroup {
                kind: candidate.kind,
                expected,
                found: attached.port.group,
            });
        }
        if attached_side == EndpointSide::Target {
            self.check_capacity(candidate, &attached, graph)?;
        }
        Ok(())
    }

    fn check_capacity(
        &self,
        candidate: &VisualEdge,
        target: &Attached<'_>,
        graph: &VisualGraph,
    ) -> Result<(), ConnectionRejection> {
        let Some(max) = self.limit_for(target.node.node_type, target.port.group, candidate.stream_role) else {
            return Ok(());
        };
        let in_degree = graph
            .edges()
            .filter(|e| e.id != candidate.id && e.stream_role == candidate.stream_role)
            .filter(|e| e.target.node_id() == Some(target.node.id.as_str()))
            .filter(|e| {
                e.target
                    .port_id()
                    .and_then(|p| target.node.port(p))
                    .is_some_and(|p| p.group == target.port.group)
            })
            .count();
        if in_degree >= max {
            return Err(ConnectionRejection::CapacityExceeded {
                node_type: target.node.node_type,
                port_id: target.port.id.clone(),
                stream_role: candidate.stream_role,
                max,
            });
        }
        Ok(())
    }
}

fn resolve<'a>(
    graph: &'a VisualGraph,
    endpoint: &Endpoint,
    side: EndpointSide,
) -> Result<Attached<'a>, ConnectionRejection> {
    let (Some(node_id), Some(port_id)) = (endpoint.node_id(), endpoint.port_id()) else {
        return Err(ConnectionRejection::Unattached(side));
    };
    let unknown = || ConnectionRejection::UnknownPort {
        node_id: node_id.to_string(),
        port_id: port_id.to_string(),
    };
    let node = graph.node(node_id).ok_or_else(unknown)?;
    let port = node.port(port_id).ok_or_else(unknown)?;
    Ok(Attached { node, port })
}

/// Validates with the default rule set.
pub fn can_connect(candidate: &VisualEdge, graph: &VisualGraph) -> bool {
    ConnectionRules::default().can_connect(candidate, graph)
}
