use super::{BoundaryEdge, Edge, Node};
use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A top-level network model. May reference facility documents through facility nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A closed sub-graph whose external surface is exactly its `inputs` and `outputs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub inputs: Vec<BoundaryEdge>,
    #[serde(default)]
    pub outputs: Vec<BoundaryEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Network,
    Facility,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Network => f.write_str("network"),
            DocumentKind::Facility => f.write_str("facility"),
        }
    }
}

/// Either document shape, as handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Network(NetworkDocument),
    Facility(FacilityDocument),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Network(_) => DocumentKind::Network,
            Document::Facility(_) => DocumentKind::Facility,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Document::Network(doc) => &doc.id,
            Document::Facility(doc) => &doc.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Document::Network(doc) => &doc.name,
            Document::Facility(doc) => &doc.name,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        match self {
            Document::Network(doc) => &doc.nodes,
            Document::Facility(doc) => &doc.nodes,
        }
    }

    pub fn edges(&self) -> &[Edge] {
        match self {
            Document::Network(doc) => &doc.edges,
            Document::Facility(doc) => &doc.edges,
        }
    }

    /// Facility inputs; always empty for network documents.
    pub fn inputs(&self) -> &[BoundaryEdge] {
        match self {
            Document::Network(_) => &[],
            Document::Facility(doc) => &doc.inputs,
        }
    }

    /// Facility outputs; always empty for network documents.
    pub fn outputs(&self) -> &[BoundaryEdge] {
        match self {
            Document::Network(_) => &[],
            Document::Facility(doc) => &doc.outputs,
        }
    }

    pub fn as_network(&self) -> Option<&NetworkDocument> {
        match self {
            Document::Network(doc) => Some(doc),
            Document::Facility(_) => None,
        }
    }

    pub fn as_facility(&self) -> Option<&FacilityDocument> {
        match self {
            Document::Facility(doc) => Some(doc),
            Document::Network(_) => None,
        }
    }

    /// Parses a document of the given shape from JSON.
    pub fn from_json(kind: DocumentKind, json: &str) -> Result<Self, DocumentError> {
        let document = match kind {
            DocumentKind::Network => Document::Network(serde_json::from_str(json)?),
            DocumentKind::Facility => Document::Facility(serde_json::from_str(json)?),
        };
        Ok(document)
    }

    /// Loads a document of the given shape from a JSON file.
    pub fn from_file(kind: DocumentKind, path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(kind, &content)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        let json = match self {
            Document::Network(doc) => serde_json::to_string_pretty(doc)?,
            Document::Facility(doc) => serde_json::to_string_pretty(doc)?,
        };
        Ok(json)
    }
}

impl From<NetworkDocument> for Document {
    fn from(doc: NetworkDocument) -> Self {
        Document::Network(doc)
    }
}

impl From<FacilityDocument> for Document {
    fn from(doc: FacilityDocument) -> Self {
        Document::Facility(doc)
    }
}

impl FacilityDocument {
    /// Loads a facility document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
