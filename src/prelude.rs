//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to open a document, edit it through a
//! session and save it again.

// Documents
pub use crate::model::{
    AllocationSeries, BoundaryEdge, Document, DocumentKind, Edge, FacilityDocument,
    NetworkDocument, Node, NodeType, Position, StreamRole,
};

// Ports and edges
pub use crate::edges::EdgeKind;
pub use crate::ports::{Port, PortGroup};

// Visual graph
pub use crate::visual::history::MutationKind;
pub use crate::visual::{Endpoint, EndpointSide, VisualCell, VisualEdge, VisualGraph, VisualNode};

// Sync and validation
pub use crate::sync::{FacilityLookup, SaveReport, domain_to_visual, visual_to_domain};
pub use crate::validation::{ConnectionRules, ParamsValidator, ValidatorRegistry};

// Session
pub use crate::config::SessionConfig;
pub use crate::session::{DialogResult, EdgeDialogResult, EditorSession, Shortcut, Theme};

// Error types
pub use crate::error::{ConnectionRejection, IncompleteEdgeError, SessionError, SyncError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
