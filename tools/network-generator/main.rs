use clap::Parser;
use netmodel::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

/// Generates random, well-formed network and facility documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to write the generated documents to
    #[arg(short, long, default_value = "generated")]
    output: String,

    /// Number of well groups in the network
    #[arg(long, default_value_t = 5)]
    wells: usize,

    /// Number of facility documents to generate and place
    #[arg(long, default_value_t = 2)]
    facilities: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let out_dir = Path::new(&cli.output);
    fs::create_dir_all(out_dir)?;

    let facilities: Vec<FacilityDocument> = (0..cli.facilities)
        .map(|i| generate_facility(i, &mut rng))
        .collect::<std::result::Result<_, _>>()?;
    for facility in &facilities {
        let path = out_dir.join(format!("{}.json", facility.id));
        fs::write(&path, Document::from(facility.clone()).to_json_pretty()?)?;
        println!("-> Wrote facility '{}' to '{}'", facility.name, path.display());
    }

    let network = generate_network(cli.wells, &facilities, &mut rng)?;
    let path = out_dir.join("network.json");
    fs::write(&path, network.to_json_pretty()?)?;
    println!(
        "-> Wrote network with {} nodes and {} edges to '{}'",
        network.nodes().len(),
        network.edges().len(),
        path.display()
    );
    Ok(())
}

fn first_port(session: &EditorSession, node_id: &str, group: PortGroup, role: StreamRole) -> Option<String> {
    session
        .graph()
        .node(node_id)?
        .ports
        .iter()
        .find(|p| p.group == group && p.stream_role == role)
        .map(|p| p.id.clone())
}

/// A compressor feeding a flare, with one gas input and one gas output.
fn generate_facility(index: usize, rng: &mut StdRng) -> std::result::Result<FacilityDocument, SessionError> {
    let id = format!("facility-{}", index + 1);
    let empty = FacilityDocument {
        id: id.clone(),
        name: format!("Station {}", index + 1),
        nodes: vec![],
        edges: vec![],
        inputs: vec![],
        outputs: vec![],
    };
    let mut session = EditorSession::builder(empty).build()?;
    let compressor_type = if rng.random_bool(0.5) {
        NodeType::CentrifugalCompressor
    } else {
        NodeType::ReciprocatingCompressor
    };
    let compressor = session.drop_node(Node::new("", compressor_type).at(200.0, 100.0))?;
    let flare = session.drop_node(Node::new("", NodeType::Flare).at(400.0, 100.0))?;
    session.connect(
        Endpoint::port(&compressor, "out_gas"),
        Endpoint::port(&flare, "in_gas"),
    )?;

    let input = session.add_boundary_edge(
        EdgeKind::Input,
        StreamRole::Gas,
        Position::new(0.0, 130.0),
        Position::new(100.0, 130.0),
    )?;
    session.reconnect(
        &input,
        Endpoint::Point(Position::new(0.0, 130.0)),
        Endpoint::port(&compressor, "in_gas"),
    )?;
    let output = session.add_boundary_edge(
        EdgeKind::Output,
        StreamRole::Gas,
        Position::new(500.0, 130.0),
        Position::new(600.0, 130.0),
    )?;
    session.reconnect(
        &output,
        Endpoint::port(&flare, "out_gas"),
        Endpoint::Point(Position::new(600.0, 130.0)),
    )?;

    match session.save().document {
        Document::Facility(facility) => Ok(facility),
        Document::Network(_) => unreachable!("a facility session saves a facility"),
    }
}

fn generate_network(
    wells: usize,
    facilities: &[FacilityDocument],
    rng: &mut StdRng,
) -> std::result::Result<Document, SessionError> {
    let empty = NetworkDocument {
        id: "network-1".into(),
        name: "Generated Network".into(),
        nodes: vec![],
        edges: vec![],
    };
    let mut session = EditorSession::builder(empty)
        .with_facilities(facilities.iter().cloned())
        .build()?;

    let mut sinks = vec![session.drop_node(Node::new("", NodeType::Flare))?];
    sinks.push(session.drop_node(Node::new("", NodeType::Atmosphere))?);
    for facility in facilities {
        sinks.push(session.drop_node(Node::facility("", facility.id.clone()).with_name(&facility.name))?);
    }
    let drilling = session.drop_node(Node::new("", NodeType::Drilling))?;
    let device = session.drop_node(Node::new("", NodeType::PneumaticDevice))?;

    for _ in 0..wells {
        let well = session.drop_node(Node::new("", NodeType::WellGroup))?;
        let sink = &sinks[rng.random_range(0..sinks.len())];
        if let (Some(from), Some(to)) = (
            first_port(&session, &well, PortGroup::Out, StreamRole::Gas),
            first_port(&session, sink, PortGroup::In, StreamRole::Gas),
        ) {
            session.connect(Endpoint::port(&well, from), Endpoint::port(sink, to))?;
        }
        if rng.random_bool(0.5) {
            session.connect(
                Endpoint::port(&drilling, "devOut_development"),
                Endpoint::port(&well, "devIn_development"),
            )?;
        }
        if rng.random_bool(0.3) {
            session.connect(
                Endpoint::port(&well, "linkOut_link"),
                Endpoint::port(&device, "linkIn_link"),
            )?;
        }
    }
    session.auto_layout();
    Ok(session.save().document)
}
