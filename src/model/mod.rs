//! Domain graph model: the persisted shape of network and facility documents.
//!
//! These types are plain data. They carry no ports and no visual state; ports are
//! derived from a node's type and params every time it enters the visual graph.

mod document;
mod edge;
mod node;
mod params;

pub use document::*;
pub use edge::*;
pub use node::*;
pub use params::*;

use serde::{Deserialize, Serialize};

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, by: Position) -> Position {
        Position::new(self.x + by.x, self.y + by.y)
    }

    pub fn scaled(&self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }

    /// Compares two positions component-wise within `tolerance`.
    pub fn approx_eq(&self, other: &Position, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}
