//! Coordinate geometry and the positional tolerance contract.
//!
//! Two drawing coordinates are the same connectivity point iff both axis
//! differences are below [`TOLERANCE`]. That tolerant comparison is used in
//! two places: the endpoint checks inside the junction-dot heuristic, and
//! the registry's coordinate lookup. [`GridKey`] provides a hash key that is
//! consistent with the comparison: coordinates within tolerance land in the
//! same or an adjacent grid cell, so lookups probe the cell neighborhood and
//! confirm with [`Coords::coincident`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Positional tolerance in schematic length units. Coordinates closer than
/// this on both axes are coalesced into a single node.
pub const TOLERANCE: f64 = 1e-3;

/// A 2-D schematic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

impl Coords {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Tolerant equality: both axis differences strictly below [`TOLERANCE`].
    pub fn coincident(&self, other: &Coords) -> bool {
        (self.x - other.x).abs() < TOLERANCE && (self.y - other.y).abs() < TOLERANCE
    }

    /// This coordinate shifted by a delta vector.
    pub fn translate(&self, delta: &Coords) -> Coords {
        Coords::new(self.x + delta.x, self.y + delta.y)
    }

    /// Euclidean distance to another coordinate.
    pub fn distance_to(&self, other: &Coords) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The tolerance-grid cell this coordinate falls into.
    pub fn grid_key(&self) -> GridKey {
        GridKey {
            x: (self.x / TOLERANCE).round() as i64,
            y: (self.y / TOLERANCE).round() as i64,
        }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Hash key bucketing coordinates on the tolerance grid: each axis is
/// independently divided by [`TOLERANCE`] and rounded to the nearest step.
///
/// Truncating coordinates to whole drawing units before folding them into a
/// hash would collapse most of a schematic into one bucket; rounding on the
/// tolerance grid keeps the key discriminative. A pair of coordinates within
/// tolerance of each other can still straddle a cell boundary, which is why
/// tolerant lookups probe the [`GridKey::neighborhood`] rather than a single
/// cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridKey {
    pub x: i64,
    pub y: i64,
}

impl GridKey {
    /// The 3×3 block of cells centered on this one. Any coordinate within
    /// [`TOLERANCE`] of a point in this cell keys into one of these.
    pub fn neighborhood(self) -> impl Iterator<Item = GridKey> {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dx| GridKey {
                x: self.x + dx,
                y: self.y + dy,
            })
        })
    }
}
