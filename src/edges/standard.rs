use super::{
    EdgeBehavior, EdgeKind, EdgeRecord, expect_interior, hydrate_interior, serialize_interior,
};
use crate::error::{IncompleteEdgeError, SyncError};
use crate::visual::VisualEdge;

/// Oil, gas and water edges. Both ends are required; params hold the allocation series.
pub struct StandardEdge;

impl EdgeBehavior for StandardEdge {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Standard
    }

    fn from_record(&self, record: &EdgeRecord) -> Result<VisualEdge, SyncError> {
        let edge = expect_interior(record, EdgeKind::Standard)?;
        let mut visual = hydrate_interior(edge, EdgeKind::Standard);
        visual.params = edge.params.clone();
        visual.label = self.label(&visual);
        Ok(visual)
    }

    fn to_record(&self, edge: &VisualEdge) -> Result<EdgeRecord, IncompleteEdgeError> {
        let mut record = serialize_interior(edge)?;
        record.params = edge.params.clone();
        Ok(EdgeRecord::Interior(record))
    }

    fn label(&self, edge: &VisualEdge) -> Option<String> {
        Some(edge.params.as_ref().map(|p| p.label()).unwrap_or_default())
    }
}
