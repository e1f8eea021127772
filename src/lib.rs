//! # netmodel - Graph Sync and Connection Engine for Network Model Editors
//!
//! **netmodel** keeps two representations of an emissions network in lockstep: the
//! persisted *document* (nodes, edges and, for facilities, boundary inputs and outputs)
//! and the *visual graph* an editor canvas works on (cells with typed ports, endpoints
//! that are either a port or a free point, a selection and an undo history).
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse a [`model::Document`] from JSON and hand it, together with the
//!     facility documents its facility nodes reference, to [`session::EditorSession::builder`].
//! 2.  **Edit**: Drop nodes, connect ports, open dialogs, copy and paste. Every proposed
//!     connection goes through [`validation::ConnectionRules`]; every user action is one
//!     undoable history entry.
//! 3.  **Save**: [`session::EditorSession::save`] returns a [`sync::SaveReport`]. Edges that
//!     cannot be persisted are listed there and summarized as a single warning.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netmodel::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let network = Document::from_file(DocumentKind::Network, "network.json")?;
//!     let facility = FacilityDocument::load("compressor-station.json")?;
//!
//!     let mut session = EditorSession::builder(network)
//!         .with_facilities([facility])
//!         .build()?;
//!
//!     let flare = session.drop_node(Node::new("", NodeType::Flare).at(400.0, 120.0))?;
//!     session.connect(
//!         Endpoint::port("wg-1", "out_gas"),
//!         Endpoint::port(&flare, "in_gas"),
//!     )?;
//!
//!     let report = session.save();
//!     if let Some(warning) = report.warning() {
//!         println!("{warning}");
//!     }
//!     if let Some(document) = report.confirm(true) {
//!         std::fs::write("network.json", document.to_json_pretty()?)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod edges;
pub mod error;
pub mod model;
pub mod ports;
pub mod prelude;
pub mod session;
pub mod sync;
pub mod validation;
pub mod visual;
