use crate::edges::EdgeKind;
use crate::model::{NodeType, StreamRole};
use crate::ports::PortGroup;
use crate::visual::EndpointSide;
use thiserror::Error;

/// Errors raised while converting a document into visual cells.
///
/// These indicate a corrupt document rather than a user mistake and are propagated
/// to whoever asked for the conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Facility node '{node_id}' references facility '{facility_id}', which was not supplied")]
    MissingFacility {
        node_id: String,
        facility_id: String,
    },

    #[error("Facility node '{node_id}' has no facility reference")]
    MissingFacilityReference { node_id: String },

    #[error("Node '{node_id}' has invalid params: {message}")]
    InvalidParams { node_id: String, message: String },

    #[error("Edge '{edge_id}' references node '{node_id}', which is not part of the document")]
    UnknownEdgeEndpoint { edge_id: String, node_id: String },

    #[error("Edge '{edge_id}' cannot be hydrated as a {expected} edge")]
    EdgeKindMismatch { edge_id: String, expected: EdgeKind },

    #[error("Duplicate cell id '{0}'")]
    DuplicateId(String),
}

/// Reasons an edge cannot be serialized losslessly. Such edges are dropped on save.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IncompleteEdgeError {
    #[error("Edge '{edge_id}' has no {side} node")]
    MissingEndpoint { edge_id: String, side: EndpointSide },

    #[error("Edge '{edge_id}' has no {side} port")]
    MissingPort { edge_id: String, side: EndpointSide },

    #[error("Edge '{edge_id}' carries {found} but its {side} port expects {expected}")]
    StreamMismatch {
        edge_id: String,
        side: EndpointSide,
        expected: StreamRole,
        found: StreamRole,
    },

    #[error("Edge '{edge_id}' is a boundary edge outside a facility document")]
    BoundaryOutsideFacility { edge_id: String },

    #[error("Boundary edge '{edge_id}' must leave its {side} end free")]
    AttachedFreeEnd { edge_id: String, side: EndpointSide },

    #[error("Edge '{edge_id}' has a malformed {side} port id '{port_id}'")]
    MalformedHandle {
        edge_id: String,
        side: EndpointSide,
        port_id: String,
    },
}

impl IncompleteEdgeError {
    pub fn edge_id(&self) -> &str {
        match self {
            IncompleteEdgeError::MissingEndpoint { edge_id, .. }
            | IncompleteEdgeError::MissingPort { edge_id, .. }
            | IncompleteEdgeError::StreamMismatch { edge_id, .. }
            | IncompleteEdgeError::BoundaryOutsideFacility { edge_id }
            | IncompleteEdgeError::AttachedFreeEnd { edge_id, .. }
            | IncompleteEdgeError::MalformedHandle { edge_id, .. } => edge_id,
        }
    }
}

/// Why a proposed connection was refused. The canvas only ever sees a `bool`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionRejection {
    #[error("Boundary edges are only allowed inside facility documents")]
    BoundaryOutsideFacility,

    #[error("The {0} end must be attached to a node port")]
    Unattached(EndpointSide),

    #[error("The {0} end of a boundary edge must stay free")]
    BoundaryEndAttached(EndpointSide),

    #[error("Port '{port_id}' does not exist on node '{node_id}'")]
    UnknownPort { node_id: String, port_id: String },

    #[error("A {kind} edge must attach to a '{expected}' port, found '{found}'")]
    BoundaryGroup {
        kind: EdgeKind,
        expected: PortGroup,
        found: PortGroup,
    },

    #[error("Stream mismatch: {source_role} cannot connect to {target_role}")]
    StreamMismatch {
        source_role: StreamRole,
        target_role: StreamRole,
    },

    #[error("A node cannot connect to itself")]
    SelfLoop,

    #[error("The target port is an output")]
    TargetIsOutput,

    #[error("Connections cannot originate from an input port")]
    SourceIsInput,

    #[error("Edge '{0}' already connects these ports")]
    Duplicate(String),

    #[error("Port '{port_id}' on {node_type} node accepts at most {max} {stream_role} edges")]
    CapacityExceeded {
        node_type: NodeType,
        port_id: String,
        stream_role: StreamRole,
        max: usize,
    },
}

/// Errors surfaced by editing-session operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No cell with id '{0}' in the graph")]
    UnknownCell(String),

    #[error("Invalid params for '{id}': {message}")]
    InvalidParams { id: String, message: String },

    #[error("Cannot change node '{node_id}' from {from} to {to}")]
    UnsupportedTypeChange {
        node_id: String,
        from: NodeType,
        to: NodeType,
    },

    #[error("Connection rejected: {0}")]
    ConnectionRejected(ConnectionRejection),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Errors reading or parsing a session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reading or writing persisted documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document JSON: {0}")]
    Json(#[from] serde_json::Error),
}
