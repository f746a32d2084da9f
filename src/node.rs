//! The node entity: a single electrical connection point.
//!
//! A node is identified by its (tolerant) 2-D position and accumulates the
//! pins and wires attached there as the user draws. It answers the one
//! genuinely subtle question in schematic connectivity: does this point
//! need a visible junction dot, or is it a plain pass-through? Attach and
//! detach are idempotent and report typed no-op outcomes instead of
//! failing; dot-visibility transitions raise [`NodeEvent`]s exactly once
//! per boolean transition.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::element::{PinId, WireId, WireSpan};
use crate::geometry::Coords;

/// Outcome of attaching a pin or wire. Attaching a member that is already
/// present is a reported no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachResult {
    Added,
    AlreadyPresent,
}

impl AttachResult {
    pub fn changed(self) -> bool {
        matches!(self, AttachResult::Added)
    }
}

/// Outcome of detaching a pin or wire. `Empty` means the respective set
/// held nothing to begin with; `NotPresent` means the set was non-empty
/// but did not hold the given member. Both leave the node untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachResult {
    Removed,
    NotPresent,
    Empty,
}

impl DetachResult {
    pub fn changed(self) -> bool {
        matches!(self, DetachResult::Removed)
    }
}

/// Connectivity events observable on a node.
///
/// Delivery is synchronous and in-process: dot events fire exactly once per
/// boolean transition of [`Node::needs_dot`], never redundantly.
/// `VoltageChanged` is raised by the simulation-result layer through
/// [`Node::voltage_changed`]; the node only provides the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeEvent {
    DotAdded(Coords),
    DotRemoved(Coords),
    VoltageChanged,
}

/// Observer hook for [`NodeEvent`]s. The engine is single-threaded; hooks
/// run inline on the editing thread.
pub type EventHook = Rc<dyn Fn(&NodeEvent)>;

/// A single electrical connection point in a schematic.
pub struct Node {
    position: Coords,
    sequence: u32,
    pins: HashSet<PinId>,
    wires: HashMap<WireId, WireSpan>,
    visited: bool,
    hooks: Vec<EventHook>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("position", &self.position)
            .field("sequence", &self.sequence)
            .field("pins", &self.pins)
            .field("wires", &self.wires)
            .field("visited", &self.visited)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Node {
    /// Create a node at a position with a stable diagnostic sequence
    /// number. The position is the node's spatial identity and never
    /// changes afterwards.
    pub fn new(position: Coords, sequence: u32) -> Self {
        Self {
            position,
            sequence,
            pins: HashSet::new(),
            wires: HashMap::new(),
            visited: false,
            hooks: Vec::new(),
        }
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// True iff no pins and no wires are attached. An empty node carries no
    /// electrical meaning; the owning registry is expected to discard it.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty() && self.wires.is_empty()
    }

    /// Scratch flag for external traversals. Not part of node identity;
    /// the traversal driver must sweep it back to `false` itself.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.pins.iter().copied()
    }

    pub fn wires(&self) -> impl Iterator<Item = &WireSpan> {
        self.wires.values()
    }

    /// Register an observer for this node's events.
    pub fn subscribe(&mut self, hook: EventHook) {
        self.hooks.push(hook);
    }

    /// Raise `VoltageChanged`. Called by the simulation-result layer when
    /// a new operating point is available for this node.
    pub fn voltage_changed(&self) {
        self.emit(&NodeEvent::VoltageChanged);
    }

    fn emit(&self, event: &NodeEvent) {
        for hook in &self.hooks {
            hook(event);
        }
    }

    /// Attach a component pin. Idempotent: a pin already on the node is
    /// reported as `AlreadyPresent` and nothing changes.
    pub fn attach_pin(&mut self, pin: PinId) -> AttachResult {
        if self.pins.contains(&pin) {
            tracing::debug!("attach_pin: {:?} already on node {}", pin, self.sequence);
            return AttachResult::AlreadyPresent;
        }
        let had_dot = self.needs_dot();
        self.pins.insert(pin);
        if !had_dot && self.needs_dot() {
            self.emit(&NodeEvent::DotAdded(self.position));
        }
        AttachResult::Added
    }

    /// Detach a component pin. `Empty` if no pins are attached at all,
    /// `NotPresent` if this one is not; both leave the node unchanged.
    pub fn detach_pin(&mut self, pin: PinId) -> DetachResult {
        if self.pins.is_empty() {
            return DetachResult::Empty;
        }
        if !self.pins.contains(&pin) {
            tracing::debug!("detach_pin: {:?} not on node {}", pin, self.sequence);
            return DetachResult::NotPresent;
        }
        let had_dot = self.needs_dot();
        self.pins.remove(&pin);
        if had_dot && !self.needs_dot() {
            self.emit(&NodeEvent::DotRemoved(self.position));
        }
        DetachResult::Removed
    }

    /// Attach a wire span. Membership is keyed on the wire's identity; the
    /// span's geometry is captured for the dot heuristic.
    pub fn attach_wire(&mut self, wire: WireSpan) -> AttachResult {
        if self.wires.contains_key(&wire.id) {
            tracing::debug!("attach_wire: {:?} already on node {}", wire.id, self.sequence);
            return AttachResult::AlreadyPresent;
        }
        let had_dot = self.needs_dot();
        self.wires.insert(wire.id, wire);
        if !had_dot && self.needs_dot() {
            self.emit(&NodeEvent::DotAdded(self.position));
        }
        AttachResult::Added
    }

    /// Detach a wire by identity. Mirrors [`Node::detach_pin`].
    pub fn detach_wire(&mut self, wire: WireId) -> DetachResult {
        if self.wires.is_empty() {
            return DetachResult::Empty;
        }
        if !self.wires.contains_key(&wire) {
            tracing::debug!("detach_wire: {:?} not on node {}", wire, self.sequence);
            return DetachResult::NotPresent;
        }
        let had_dot = self.needs_dot();
        self.wires.remove(&wire);
        if had_dot && !self.needs_dot() {
            self.emit(&NodeEvent::DotRemoved(self.position));
        }
        DetachResult::Removed
    }

    /// Whether the connectivity state at this point requires a visible
    /// junction dot:
    ///
    /// 1. A component terminal sitting on a wire always gets a dot.
    /// 2. More than one pin at a bare point, or more than two wires
    ///    meeting, is always a junction.
    /// 3. Exactly two wires form a pass-through or a corner when they share
    ///    an endpoint under the positional tolerance; only a tee or an
    ///    offset crossing (no shared endpoint) gets a dot.
    /// 4. Anything sparser never does.
    pub fn needs_dot(&self) -> bool {
        tracing::trace!(
            "node {}: {} pins, {} wires",
            self.sequence,
            self.pins.len(),
            self.wires.len()
        );
        if !self.pins.is_empty() && !self.wires.is_empty() {
            return true;
        }
        if self.pins.len() > 1 || self.wires.len() > 2 {
            return true;
        }
        if self.wires.len() == 2 {
            let mut spans = self.wires.values();
            if let (Some(a), Some(b)) = (spans.next(), spans.next()) {
                let (a_start, a_end) = a.endpoints();
                let (b_start, b_end) = b.endpoints();
                let shared = a_start.coincident(&b_start)
                    || a_start.coincident(&b_end)
                    || a_end.coincident(&b_end)
                    || a_end.coincident(&b_start);
                return !shared;
            }
        }
        false
    }
}
