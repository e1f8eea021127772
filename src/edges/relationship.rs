use super::{
    EdgeBehavior, EdgeKind, EdgeRecord, expect_interior, hydrate_interior, serialize_interior,
};
use crate::error::{IncompleteEdgeError, SyncError};
use crate::visual::VisualEdge;

/// Facility wiring. Carries the target facility's id when it points at a facility node.
pub struct LinkEdge;

impl EdgeBehavior for LinkEdge {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Link
    }

    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
        let edge = expect_interior(record, EdgeKind::Link)?;
        let mut visual = hydrate_interior(edge, EdgeKind::Link);
        visual.to_facility_object_id = edge.to_facility_object_id.clone();
        Ok(visual)
    }

    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
        let mut record = serialize_interior(edge)?;
        record.to_facility_object_id = edge.to_facility_object_id.clone();
        Ok(EdgeRecord::Interior(record))
    }
}

/// Well-group association of drilling, completion and flowback activities.
pub struct DevelopmentEdge;

impl EdgeBehavior for DevelopmentEdge {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Development
    }

    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
        let edge = expect_interior(record, EdgeKind::Development)?;
        Ok(hydrate_interior(edge, EdgeKind::Development))
    }

    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
        serialize_interior(edge).map(EdgeRecord::Interior)
    }
}
