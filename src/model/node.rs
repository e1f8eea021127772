use super::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of vertex kinds a network model may contain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    WellGroup,
    Atmosphere,
    EconOutput,
    OilTank,
    Flare,
    LiquidsUnloading,
    AssociatedGas,
    Combustion,
    PneumaticDevice,
    PneumaticPump,
    CentrifugalCompressor,
    ReciprocatingCompressor,
    Drilling,
    Completion,
    Flowback,
    Capture,
    CustomCalculation,
    Facility,
}

impl NodeType {
    pub const ALL: [NodeType; 18] = [
        NodeType::WellGroup,
        NodeType::Atmosphere,
        NodeType::EconOutput,
        NodeType::OilTank,
        NodeType::Flare,
        NodeType::LiquidsUnloading,
        NodeType::AssociatedGas,
        NodeType::Combustion,
        NodeType::PneumaticDevice,
        NodeType::PneumaticPump,
        NodeType::CentrifugalCompressor,
        NodeType::ReciprocatingCompressor,
        NodeType::Drilling,
        NodeType::Completion,
        NodeType::Flowback,
        NodeType::Capture,
        NodeType::CustomCalculation,
        NodeType::Facility,
    ];

    /// The persisted identifier, e.g. `"oil-tank"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::WellGroup => "well-group",
            NodeType::Atmosphere => "atmosphere",
            NodeType::EconOutput => "econ-output",
            NodeType::OilTank => "oil-tank",
            NodeType::Flare => "flare",
            NodeType::LiquidsUnloading => "liquids-unloading",
            NodeType::AssociatedGas => "associated-gas",
            NodeType::Combustion => "combustion",
            NodeType::PneumaticDevice => "pneumatic-device",
            NodeType::PneumaticPump => "pneumatic-pump",
            NodeType::CentrifugalCompressor => "centrifugal-compressor",
            NodeType::ReciprocatingCompressor => "reciprocating-compressor",
            NodeType::Drilling => "drilling",
            NodeType::Completion => "completion",
            NodeType::Flowback => "flowback",
            NodeType::Capture => "capture",
            NodeType::CustomCalculation => "custom-calculation",
            NodeType::Facility => "facility",
        }
    }

    /// Human-readable name used as the default node name on the palette.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::WellGroup => "Well Group",
            NodeType::Atmosphere => "Atmosphere",
            NodeType::EconOutput => "Econ Output",
            NodeType::OilTank => "Oil Tank",
            NodeType::Flare => "Flare",
            NodeType::LiquidsUnloading => "Liquids Unloading",
            NodeType::AssociatedGas => "Associated Gas",
            NodeType::Combustion => "Combustion",
            NodeType::PneumaticDevice => "Pneumatic Device",
            NodeType::PneumaticPump => "Pneumatic Pump",
            NodeType::CentrifugalCompressor => "Centrifugal Compressor",
            NodeType::ReciprocatingCompressor => "Reciprocating Compressor",
            NodeType::Drilling => "Drilling",
            NodeType::Completion => "Completion",
            NodeType::Flowback => "Flowback",
            NodeType::Capture => "Capture",
            NodeType::CustomCalculation => "Custom Calculation",
            NodeType::Facility => "Facility",
        }
    }

    pub fn from_str_name(name: &str) -> Option<NodeType> {
        NodeType::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A typed vertex of a network or facility document.
///
/// `params` is opaque to the core except where a node type's ports depend on it
/// (custom calculations). Its shape is owned by the per-type validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    #[serde(default)]
    pub position: Position,
    /// Only set on facility nodes; references an external facility document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            name: node_type.display_name().to_string(),
            description: String::new(),
            params: empty_params(),
            position: Position::default(),
            facility_id: None,
        }
    }

    /// Creates a facility node referencing the facility document `facility_id`.
    pub fn facility(id: impl Into<String>, facility_id: impl Into<String>) -> Self {
        Self {
            facility_id: Some(facility_id.into()),
            ..Self::new(id, NodeType::Facility)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }
}
