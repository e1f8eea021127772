use super::PortGroup;
use crate::model::{NodeType, StreamRole};

use PortGroup::{DevIn, DevOut, In, LinkIn, LinkOut, Out};
use StreamRole::{Development, Gas, Link, Oil, Water};

const WELL_GROUP: &[(PortGroup, StreamRole)] = &[
    (Out, Oil),
    (Out, Gas),
    (Out, Water),
    (LinkOut, Link),
    (DevIn, Development),
];
const ATMOSPHERE: &[(PortGroup, StreamRole)] = &[(In, Gas)];
const ECON_OUTPUT: &[(PortGroup, StreamRole)] = &[(In, Oil), (In, Gas), (In, Water)];
const OIL_TANK: &[(PortGroup, StreamRole)] = &[(In, Oil), (Out, Oil), (Out, Gas)];
const GAS_THROUGH: &[(PortGroup, StreamRole)] = &[(In, Gas), (Out, Gas)];
const LINKED_EMITTER: &[(PortGroup, StreamRole)] = &[(LinkIn, Link), (Out, Gas)];
const COMBUSTION: &[(PortGroup, StreamRole)] = &[(In, Gas), (LinkIn, Link), (Out, Gas)];
const COMPRESSOR: &[(PortGroup, StreamRole)] = &[(In, Gas), (Out, Gas), (LinkIn, Link)];
const DEVELOPMENT: &[(PortGroup, StreamRole)] = &[(DevOut, Development), (Out, Gas)];

/// Fixed port layout for node types whose ports do not depend on params.
///
/// Returns `None` for facility and custom calculation nodes.
pub(super) fn preset_ports(node_type: NodeType) -> Option<&'static [(PortGroup, StreamRole)]> {
    let preset = match node_type {
        NodeType::WellGroup => WELL_GROUP,
        NodeType::Atmosphere => ATMOSPHERE,
        NodeType::EconOutput => ECON_OUTPUT,
        NodeType::OilTank => OIL_TANK,
        NodeType::Flare | NodeType::Capture => GAS_THROUGH,
        NodeType::LiquidsUnloading
        | NodeType::AssociatedGas
        | NodeType::PneumaticDevice
        | NodeType::PneumaticPump => LINKED_EMITTER,
        NodeType::Combustion => COMBUSTION,
        NodeType::CentrifugalCompressor | NodeType::ReciprocatingCompressor => COMPRESSOR,
        NodeType::Drilling | NodeType::Completion | NodeType::Flowback => DEVELOPMENT,
        NodeType::CustomCalculation | NodeType::Facility => return None,
    };
    Some(preset)
}
