//! NetPoint - electrical connectivity engine for schematic capture.
//!
//! Given the raw geometry of drawn wires and component pins, this crate
//! determines which drawing elements are electrically the same circuit
//! node and whether that node must be rendered with a visible junction
//! dot. Coordinates are coalesced under a fixed positional tolerance, the
//! connectivity graph is maintained incrementally as the user edits, and
//! dot-visibility transitions are reported exactly once per transition.
//!
//! Rendering, part libraries, schematic persistence, netlist text
//! generation, and simulation are all external consumers of the node
//! graph this crate produces.
//!
//! # Quick Start
//!
//! ```
//! use netpoint::prelude::*;
//!
//! let mut registry = NodeRegistry::new();
//!
//! // Two collinear segments meeting end to end: a plain pass-through.
//! registry.add_wire(WireSpan::between(
//!     WireId(1),
//!     Coords::new(10.0, 10.0),
//!     Coords::new(20.0, 10.0),
//! ));
//! registry.add_wire(WireSpan::between(
//!     WireId(2),
//!     Coords::new(20.0, 10.0),
//!     Coords::new(30.0, 10.0),
//! ));
//! assert!(registry.dot_positions().is_empty());
//!
//! // A component pin lands on the joint: now it is a real junction.
//! registry.attach_pin_at(Coords::new(20.0, 10.0), PinId(1));
//! assert_eq!(registry.dot_positions().len(), 1);
//! ```

pub mod element;
pub mod geometry;
pub mod node;
pub mod registry;

// Re-export main types
pub use element::{PinId, WireId, WireSpan};
pub use geometry::{Coords, GridKey, TOLERANCE};
pub use node::{AttachResult, DetachResult, EventHook, Node, NodeEvent};
pub use registry::{DetachAt, NodeRegistry, RegistryStats};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AttachResult, Coords, DetachAt, DetachResult, Node, NodeEvent, NodeRegistry, PinId,
        RegistryStats, WireId, WireSpan,
    };
}
