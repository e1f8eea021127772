use super::{AllocationSeries, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The commodity or relationship an edge (and every port it touches) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamRole {
    Oil,
    Gas,
    Water,
    Link,
    Development,
}

impl StreamRole {
    pub const ALL: [StreamRole; 5] = [
        StreamRole::Oil,
        StreamRole::Gas,
        StreamRole::Water,
        StreamRole::Link,
        StreamRole::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamRole::Oil => "oil",
            StreamRole::Gas => "gas",
            StreamRole::Water => "water",
            StreamRole::Link => "link",
            StreamRole::Development => "development",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreamRole::Oil => "Oil",
            StreamRole::Gas => "Gas",
            StreamRole::Water => "Water",
            StreamRole::Link => "Link",
            StreamRole::Development => "Development",
        }
    }

    /// Oil, gas and water are allocated commodities; link and development are relationships.
    pub fn is_commodity(&self) -> bool {
        matches!(self, StreamRole::Oil | StreamRole::Gas | StreamRole::Water)
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interior edge: both ends attach to nodes of the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub stream_role: StreamRole,
    pub from_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_handle: Option<String>,
    pub to_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_handle: Option<String>,
    #[serde(default)]
    pub vertices: Vec<Position>,
    #[serde(default)]
    pub name: String,
    /// Allocation table; only standard (oil/gas/water) edges carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<AllocationSeries>,
    /// Set on link edges whose target is a facility node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_facility_object_id: Option<String>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        stream_role: StreamRole,
        from: (&str, &str),
        to: (&str, &str),
    ) -> Self {
        Self {
            id: id.into(),
            stream_role,
            from_node_id: from.0.to_string(),
            from_handle: Some(from.1.to_string()),
            to_node_id: to.0.to_string(),
            to_handle: Some(to.1.to_string()),
            vertices: Vec::new(),
            name: String::new(),
            params: stream_role.is_commodity().then(AllocationSeries::default),
            to_facility_object_id: None,
        }
    }
}

/// An edge of a facility document with one end open to the outside.
///
/// For facility inputs the free `point` is the source and the node port the target;
/// for outputs the node port is the source and the free `point` the target. A record
/// without `node_id`/`handle` still loads, unattached, and is dropped on the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryEdge {
    pub id: String,
    pub stream_role: StreamRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default)]
    pub point: Position,
    #[serde(default)]
    pub vertices: Vec<Position>,
    #[serde(default)]
    pub name: String,
}

impl BoundaryEdge {
    pub fn new(
        id: impl Into<String>,
        stream_role: StreamRole,
        node_id: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            stream_role,
            node_id: Some(node_id.into()),
            handle: Some(handle.into()),
            point: Position::default(),
            vertices: Vec::new(),
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
