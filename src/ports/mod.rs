//! Port derivation.
//!
//! Ports are never persisted. They are recomputed from a node's type and params (or,
//! for facility nodes, from the referenced facility's boundary edges) whenever the
//! node enters the visual graph. A port id is always `"<group>_<handle>"`, so the
//! same node derives the same ids every time and a re-derivation can be diffed.

mod presets;

use crate::error::SyncError;
use crate::model::{CustomCalculationParams, FacilityDocument, Node, NodeType, StreamRole};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of the synthetic link port added to otherwise unwireable nodes.
pub const LINK_HANDLE: &str = "link";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortGroup {
    In,
    Out,
    LinkIn,
    LinkOut,
    DevIn,
    DevOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortGroup {
    pub const ALL: [PortGroup; 6] = [
        PortGroup::In,
        PortGroup::Out,
        PortGroup::LinkIn,
        PortGroup::LinkOut,
        PortGroup::DevIn,
        PortGroup::DevOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PortGroup::In => "in",
            PortGroup::Out => "out",
            PortGroup::LinkIn => "linkIn",
            PortGroup::LinkOut => "linkOut",
            PortGroup::DevIn => "devIn",
            PortGroup::DevOut => "devOut",
        }
    }

    pub fn parse(group: &str) -> Option<PortGroup> {
        PortGroup::ALL.iter().copied().find(|g| g.as_str() == group)
    }

    pub fn direction(&self) -> PortDirection {
        match self {
            PortGroup::In | PortGroup::LinkIn | PortGroup::DevIn => PortDirection::Input,
            PortGroup::Out | PortGroup::LinkOut | PortGroup::DevOut => PortDirection::Output,
        }
    }
}

impl fmt::Display for PortGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection point exposed by a visual node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub group: PortGroup,
    pub stream_role: StreamRole,
    pub label: String,
}

impl Port {
    pub fn new(group: PortGroup, handle: &str, stream_role: StreamRole, label: impl Into<String>) -> Self {
        Self {
            id: port_id(group, handle),
            group,
            stream_role,
            label: label.into(),
        }
    }

    /// The domain handle this port was derived from.
    pub fn handle(&self) -> &str {
        split_port_id(&self.id).map(|(_, handle)| handle).unwrap_or(&self.id)
    }
}

/// Builds the port id for a domain handle: `"<group>_<handle>"`.
pub fn port_id(group: PortGroup, handle: &str) -> String {
    format!("{}_{}", group.as_str(), handle)
}

/// Splits a port id back into its group and domain handle.
///
/// Group names never contain `_`, so the first separator is the boundary even when
/// the handle itself contains underscores.
pub fn split_port_id(port_id: &str) -> Option<(PortGroup, &str)> {
    let (group, handle) = port_id.split_once('_')?;
    let group = PortGroup::parse(group)?;
    if handle.is_empty() {
        return None;
    }
    Some((group, handle))
}

/// Derives the ports of `node`.
///
/// `facility` must be the document referenced by a facility node's `facility_id`;
/// it is ignored for every other node type.
pub fn derive_ports(node: &Node, facility: Option<&FacilityDocument>) -> Result<Vec<Port>, SyncError> {
    match node.node_type {
        NodeType::Facility => {
            let facility = facility.ok_or_else(|| match &node.facility_id {
                Some(facility_id) => SyncError::MissingFacility {
                    node_id: node.id.clone(),
                    facility_id: facility_id.clone(),
                },
                None => SyncError::MissingFacilityReference {
                    node_id: node.id.clone(),
                },
            })?;
            Ok(facility_ports(facility))
        }
        NodeType::CustomCalculation => {
            let params = CustomCalculationParams::from_params(&node.params).map_err(|e| {
                SyncError::InvalidParams {
                    node_id: node.id.clone(),
                    message: e.to_string(),
                }
            })?;
            Ok(custom_calculation_ports(&params))
        }
        other => Ok(preset(other)),
    }
}

fn preset(node_type: NodeType) -> Vec<Port> {
    presets::preset_ports(node_type)
        .unwrap_or_default()
        .iter()
        .map(|(group, role)| Port::new(*group, role.as_str(), *role, role.label()))
        .collect()
}

fn boundary_label(name: &str, role: StreamRole) -> String {
    if name.is_empty() {
        role.label().to_string()
    } else {
        name.to_string()
    }
}

/// One port per facility input and output, plus a link port when there are no inputs.
pub fn facility_ports(facility: &FacilityDocument) -> Vec<Port> {
    let mut ports: Vec<Port> = facility
        .inputs
        .iter()
        .map(|input| {
            Port::new(
                PortGroup::In,
                &input.id,
                input.stream_role,
                boundary_label(&input.name, input.stream_role),
            )
        })
        .collect();
    if facility.inputs.is_empty() {
        ports.push(Port::new(PortGroup::LinkIn, LINK_HANDLE, StreamRole::Link, "Link"));
    }
    ports.extend(facility.outputs.iter().map(|output| {
        Port::new(
            PortGroup::Out,
            &output.id,
            output.stream_role,
            boundary_label(&output.name, output.stream_role),
        )
    }));
    ports
}

/// One port per assigned row, plus a link port when no input is assigned.
pub fn custom_calculation_ports(params: &CustomCalculationParams) -> Vec<Port> {
    let mut ports: Vec<Port> = params
        .assigned_inputs()
        .map(|row| Port::new(PortGroup::In, &row.id, row.stream_role, row.name.clone()))
        .collect();
    if ports.is_empty() && !params.suppress_link_port {
        ports.push(Port::new(PortGroup::LinkIn, LINK_HANDLE, StreamRole::Link, "Link"));
    }
    ports.extend(
        params
            .assigned_outputs()
            .map(|row| Port::new(PortGroup::Out, &row.id, row.stream_role, row.name.clone())),
    );
    ports
}

/// Result of comparing a node's current ports with a fresh derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortDiff {
    pub added: Vec<Port>,
    pub removed: Vec<Port>,
    /// Ids present in both derivations.
    pub kept: Vec<String>,
    /// Fresh versions of kept ports whose stream role or label changed.
    pub changed: Vec<Port>,
}

impl PortDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Changed ports whose stream role differs from the one in `current`. Edges
    /// attached to them no longer match their port.
    pub fn restreamed<'a>(&'a self, current: &'a [Port]) -> impl Iterator<Item = &'a Port> + 'a {
        self.changed.iter().filter(move |fresh| {
            current
                .iter()
                .any(|p| p.id == fresh.id && p.stream_role != fresh.stream_role)
        })
    }

    /// Applies the diff to `current`: kept ports stay in place with their fresh
    /// stream role and label, removed ports are dropped and added ports appended in
    /// derivation order.
    pub fn apply(&self, current: &[Port]) -> Vec<Port> {
        let removed: AHashSet<&str> = self.removed.iter().map(|p| p.id.as_str()).collect();
        current
            .iter()
            .filter(|p| !removed.contains(p.id.as_str()))
            .map(|p| {
                self.changed
                    .iter()
                    .find(|fresh| fresh.id == p.id)
                    .unwrap_or(p)
                    .clone()
            })
            .chain(self.added.iter().cloned())
            .collect()
    }
}

/// Diffs two port sets by id.
pub fn diff_ports(old: &[Port], new: &[Port]) -> PortDiff {
    let old_by_id: AHashMap<&str, &Port> = old.iter().map(|p| (p.id.as_str(), p)).collect();
    let new_ids: AHashSet<&str> = new.iter().map(|p| p.id.as_str()).collect();
    PortDiff {
        added: new
            .iter()
            .filter(|p| !old_by_id.contains_key(p.id.as_str()))
            .cloned()
            .collect(),
        removed: old
            .iter()
            .filter(|p| !new_ids.contains(p.id.as_str()))
            .cloned()
            .collect(),
        kept: old
            .iter()
            .filter(|p| new_ids.contains(p.id.as_str()))
            .map(|p| p.id.clone())
            .collect(),
        changed: new
            .iter()
            .filter(|p| old_by_id.get(p.id.as_str()).is_some_and(|before| *before != *p))
            .cloned()
            .collect(),
    }
}
