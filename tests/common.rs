//! Common fixtures: a small network and the facility documents it references.
use netmodel::prelude::*;

pub const STATION_ID: &str = "station-1";
pub const BATTERY_ID: &str = "battery-1";

/// A compressor feeding a flare. One gas input on the compressor, one gas output
/// leaving the flare.
#[allow(dead_code)]
pub fn compressor_station() -> FacilityDocument {
    let mut inlet = BoundaryEdge::new("inlet", StreamRole::Gas, "comp-1", "gas").with_name("Inlet gas");
    inlet.point = Position::new(0.0, 130.0);
    let mut vent = BoundaryEdge::new("flare-out", StreamRole::Gas, "flare-1", "gas");
    vent.point = Position::new(600.0, 130.0);
    FacilityDocument {
        id: STATION_ID.to_string(),
        name: "Compressor Station".to_string(),
        nodes: vec![
            Node::new("comp-1", NodeType::CentrifugalCompressor).at(200.0, 100.0),
            Node::new("flare-1", NodeType::Flare).at(400.0, 100.0),
        ],
        edges: vec![Edge::new(
            "e-1",
            StreamRole::Gas,
            ("comp-1", "gas"),
            ("flare-1", "gas"),
        )],
        inputs: vec![inlet],
        outputs: vec![vent],
    }
}

/// An oil tank with no inputs, so facility nodes referencing it expose a link port.
#[allow(dead_code)]
pub fn tank_battery() -> FacilityDocument {
    FacilityDocument {
        id: BATTERY_ID.to_string(),
        name: "Tank Battery".to_string(),
        nodes: vec![Node::new("tank-1", NodeType::OilTank).at(100.0, 100.0)],
        edges: vec![],
        inputs: vec![],
        outputs: vec![
            BoundaryEdge::new("oil-out", StreamRole::Oil, "tank-1", "oil").with_name("Sales oil"),
            BoundaryEdge::new("vent", StreamRole::Gas, "tank-1", "gas"),
        ],
    }
}

#[allow(dead_code)]
pub fn facilities() -> Vec<FacilityDocument> {
    vec![compressor_station(), tank_battery()]
}

/// Two well groups feeding a facility, a flare and an econ output, with a link edge
/// into the tank battery and a development edge from a drilling node.
#[allow(dead_code)]
pub fn sample_network() -> NetworkDocument {
    let mut link = Edge::new("l-1", StreamRole::Link, ("wg-1", "link"), ("fac-2", "link"));
    link.to_facility_object_id = Some(BATTERY_ID.to_string());
    let mut allocated = Edge::new("g-1", StreamRole::Gas, ("wg-1", "gas"), ("fac-1", "inlet"));
    allocated.params = Some(AllocationSeries::flat(40.0));
    allocated.vertices = vec![Position::new(120.0, 40.0)];

    NetworkDocument {
        id: "net-1".to_string(),
        name: "North Field".to_string(),
        nodes: vec![
            Node::new("wg-1", NodeType::WellGroup).with_name("Pad A").at(0.0, 0.0),
            Node::new("wg-2", NodeType::WellGroup).with_name("Pad B").at(0.0, 200.0),
            Node::facility("fac-1", STATION_ID).with_name("Station").at(250.0, 0.0),
            Node::facility("fac-2", BATTERY_ID).with_name("Battery").at(250.0, 300.0),
            Node::new("flare-1", NodeType::Flare).at(250.0, 150.0),
            Node::new("econ-1", NodeType::EconOutput).at(500.0, 200.0),
            Node::new("atm-1", NodeType::Atmosphere).at(500.0, 0.0),
            Node::new("drill-1", NodeType::Drilling).at(-250.0, 0.0),
        ],
        edges: vec![
            allocated,
            Edge::new("g-2", StreamRole::Gas, ("wg-2", "gas"), ("flare-1", "gas")),
            Edge::new("o-1", StreamRole::Oil, ("wg-2", "oil"), ("econ-1", "oil")),
            Edge::new("g-3", StreamRole::Gas, ("fac-1", "flare-out"), ("atm-1", "gas")),
            link,
            Edge::new(
                "d-1",
                StreamRole::Development,
                ("drill-1", "development"),
                ("wg-1", "development"),
            ),
        ],
    }
}

/// A custom calculation with one assigned gas input and one assigned gas output.
#[allow(dead_code)]
pub fn calculation_params() -> serde_json::Value {
    serde_json::json!({
        "inputs": [
            {"id": "calc-in", "name": "Feed", "streamRole": "gas", "assigned": true},
            {"id": "spare", "name": "Spare", "streamRole": "oil", "assigned": false}
        ],
        "outputs": [
            {"id": "calc-out", "name": "Result", "streamRole": "gas", "assigned": true}
        ],
        "formula": "feed * 0.98"
    })
}

#[allow(dead_code)]
pub fn open_network() -> EditorSession {
    EditorSession::builder(sample_network())
        .with_facilities(facilities())
        .build()
        .expect("sample network should load")
}

#[allow(dead_code)]
pub fn open_facility(facility: FacilityDocument) -> EditorSession {
    EditorSession::builder(facility)
        .build()
        .expect("facility should load")
}

#[allow(dead_code)]
pub fn empty_network() -> NetworkDocument {
    NetworkDocument {
        id: "empty".to_string(),
        name: "Empty".to_string(),
        nodes: vec![],
        edges: vec![],
    }
}
