use crate::model::FacilityDocument;
use ahash::AHashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Resolves the facility documents referenced by facility nodes.
///
/// The persistence layer fetches referenced facilities before a network is opened;
/// this is the already-settled result handed to the synchronizer.
pub trait FacilityLookup {
    fn facility(&self, id: &str) -> Option<&FacilityDocument>;
}

impl<S: BuildHasher> FacilityLookup for HashMap<String, FacilityDocument, S> {
    fn facility(&self, id: &str) -> Option<&FacilityDocument> {
        self.get(id)
    }
}

impl FacilityLookup for AHashMap<String, FacilityDocument> {
    fn facility(&self, id: &str) -> Option<&FacilityDocument> {
        self.get(id)
    }
}

impl FacilityLookup for [FacilityDocument] {
    fn facility(&self, id: &str) -> Option<&FacilityDocument> {
        self.iter().find(|f| f.id == id)
    }
}

impl FacilityLookup for Vec<FacilityDocument> {
    fn facility(&self, id: &str) -> Option<&FacilityDocument> {
        self.as_slice().facility(id)
    }
}

/// Lookup for documents that reference no facilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFacilities;

impl FacilityLookup for NoFacilities {
    fn facility(&self, _id: &str) -> Option<&FacilityDocument> {
        None
    }
}
