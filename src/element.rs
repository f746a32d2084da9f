//! Handles for the drawing-canvas collaborators.
//!
//! Pins and wires are owned by the part and wire drawing subsystems; the
//! connectivity engine refers to them by opaque handle and never manages
//! their lifetime. The only geometry it consumes is a wire's start point
//! and length vector.

use serde::{Deserialize, Serialize};

use crate::geometry::Coords;

/// Handle to a component pin. Identity is handle identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinId(pub u32);

/// Handle to a drawn wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireId(pub u32);

/// A wire segment as the connectivity engine sees it: an identity plus its
/// start point and length vector. The far endpoint is `start + length`.
///
/// Holding a `WireSpan` is the capability a wire needs to participate in
/// connectivity; anything that can produce one is attachable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireSpan {
    pub id: WireId,
    pub start: Coords,
    pub length: Coords,
}

impl WireSpan {
    pub fn new(id: WireId, start: Coords, length: Coords) -> Self {
        Self { id, start, length }
    }

    /// Build a span from its two endpoints.
    pub fn between(id: WireId, start: Coords, end: Coords) -> Self {
        Self {
            id,
            start,
            length: Coords::new(end.x - start.x, end.y - start.y),
        }
    }

    pub fn end(&self) -> Coords {
        self.start.translate(&self.length)
    }

    pub fn endpoints(&self) -> (Coords, Coords) {
        (self.start, self.end())
    }

    /// Whether either endpoint coincides with the given point.
    pub fn touches(&self, point: &Coords) -> bool {
        self.start.coincident(point) || self.end().coincident(point)
    }
}
