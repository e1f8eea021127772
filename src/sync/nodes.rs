use super::FacilityLookup;
use crate::error::SyncError;
use crate::model::{FacilityDocument, Node, NodeType};
use crate::ports::{self, Port};
use crate::visual::{NodeStyle, Size, VisualNode};

/// Per-node-type conversion between the domain record and the visual node.
pub trait NodeBehavior: Send + Sync {
    fn derive_ports(
        &self,
        node: &Node,
        facilities: &dyn FacilityLookup,
    ) -> Result<Vec<Port>, SyncError>;

    fn to_visual(&self, node: &Node, facilities: &dyn FacilityLookup) -> Result<VisualNode, SyncError> {
        let ports = self.derive_ports(node, facilities)?;
        Ok(visual_node(node, ports))
    }

    /// Rebuilds the domain record. Visual-only state never leaks into it.
    fn to_record(&self, node: &VisualNode) -> Node {
        Node {
            id: node.id.clone(),
            node_type: node.node_type,
            name: node.name.clone(),
            description: node.description.clone(),
            params: node.params.clone(),
            position: node.position,
            facility_id: node.facility_id.clone(),
        }
    }
}

fn visual_node(node: &Node, ports: Vec<Port>) -> VisualNode {
    VisualNode {
        id: node.id.clone(),
        node_type: node.node_type,
        name: node.name.clone(),
        description: node.description.clone(),
        params: node.params.clone(),
        position: node.position,
        size: Size::default(),
        ports,
        facility_id: node.facility_id.clone(),
        facility_name: None,
        style: NodeStyle::default(),
    }
}

/// Well groups and every device type: ports come from the preset table.
pub struct DeviceNode;

impl NodeBehavior for DeviceNode {
    fn derive_ports(&self, node: &Node, _: &dyn FacilityLookup) -> Result<Vec<Port>, SyncError> {
        ports::derive_ports(node, None)
    }
}

/// Ports mirror the referenced facility's inputs and outputs.
pub struct FacilityNode;

impl FacilityNode {
    fn resolve<'a>(
        &self,
        node: &Node,
        facilities: &'a dyn FacilityLookup,
    ) -> Result<&'a FacilityDocument, SyncError> {
        let facility_id = node
            .facility_id
            .as_deref()
            .ok_or_else(|| SyncError::MissingFacilityReference {
                node_id: node.id.clone(),
            })?;
        facilities
            .facility(facility_id)
            .ok_or_else(|| SyncError::MissingFacility {
                node_id: node.id.clone(),
                facility_id: facility_id.to_string(),
            })
    }
}

impl NodeBehavior for FacilityNode {
    fn derive_ports(
        &self,
        node: &Node,
        facilities: &dyn FacilityLookup,
    ) -> Result<Vec<Port>, SyncError> {
        let facility = self.resolve(node, facilities)?;
        ports::derive_ports(node, Some(facility))
    }

    fn to_visual(&self, node: &Node, facilities: &dyn FacilityLookup) -> Result<VisualNode, SyncError> {
        let facility = self.resolve(node, facilities)?;
        let mut visual = visual_node(node, ports::facility_ports(facility));
        visual.facility_name = Some(facility.name.clone());
        Ok(visual)
    }
}

/// Ports follow the assigned rows of the node's own params.
pub struct CustomCalculationNode;

impl NodeBehavior for CustomCalculationNode {
    fn derive_ports(&self, node: &Node, _: &dyn FacilityLookup) -> Result<Vec<Port>, SyncError> {
        ports::derive_ports(node, None)
    }
}

pub fn node_behavior(node_type: NodeType) -> &'static dyn NodeBehavior {
    match node_type {
        NodeType::Facility => &FacilityNode,
        NodeType::CustomCalculation => &CustomCalculationNode,
        _ => &DeviceNode,
    }
}
