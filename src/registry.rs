//! Coordinate-keyed registry of connectivity nodes.
//!
//! The registry maps drawing coordinates to [`Node`]s with tolerant lookup
//! and owns node lifetime: a node is created the first time connectivity is
//! needed at a coordinate and dropped as soon as the last pin or wire
//! detaches. Lookups hash on the tolerance grid ([`GridKey`]) and probe the
//! 3×3 cell neighborhood, so the tolerant-equality contract holds even for
//! coordinates that straddle a grid-cell boundary.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::element::{PinId, WireId, WireSpan};
use crate::geometry::{Coords, GridKey};
use crate::node::{AttachResult, DetachResult, EventHook, Node};

/// Outcome of a detach routed through the registry by coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachAt {
    Done(DetachResult),
    /// No node exists at the given coordinate.
    NoNode,
}

impl DetachAt {
    pub fn changed(self) -> bool {
        matches!(self, DetachAt::Done(result) if result.changed())
    }
}

/// Counts over the current connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub node_count: usize,
    pub pin_count: usize,
    /// Wire attachments summed over nodes; one wire normally contributes
    /// two (one per endpoint), plus one per registered pass-through.
    pub wire_attachment_count: usize,
    pub dot_count: usize,
}

/// Owner of all [`Node`]s in a schematic, keyed by tolerant coordinate.
pub struct NodeRegistry {
    nodes: HashMap<GridKey, Node>,
    next_sequence: u32,
    hook: Option<EventHook>,
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.nodes)
            .field("next_sequence", &self.next_sequence)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_sequence: 1,
            hook: None,
        }
    }

    /// Install an event hook that is subscribed on every node, existing and
    /// future. This is the forwarding point for the rendering and
    /// simulation layers.
    ///
    /// Hooks accumulate: installing a second hook subscribes it alongside
    /// the first on every node, and the first keeps firing. Install one
    /// forwarding hook per registry and fan out behind it.
    pub fn set_event_hook(&mut self, hook: EventHook) {
        for node in self.nodes.values_mut() {
            node.subscribe(Rc::clone(&hook));
        }
        self.hook = Some(hook);
    }

    fn find_key(&self, pos: &Coords) -> Option<GridKey> {
        pos.grid_key().neighborhood().find(|key| {
            self.nodes
                .get(key)
                .is_some_and(|node| node.position().coincident(pos))
        })
    }

    /// Tolerant lookup of the node at a coordinate.
    pub fn get(&self, pos: &Coords) -> Option<&Node> {
        self.find_key(pos).and_then(|key| self.nodes.get(&key))
    }

    pub fn get_mut(&mut self, pos: &Coords) -> Option<&mut Node> {
        let key = self.find_key(pos)?;
        self.nodes.get_mut(&key)
    }

    /// Look up the node at a coordinate, creating it if none exists within
    /// tolerance. New nodes get the next sequence number and the registry
    /// hook.
    pub fn get_or_create(&mut self, pos: Coords) -> &mut Node {
        let key = self.find_key(&pos).unwrap_or_else(|| pos.grid_key());
        let next_sequence = &mut self.next_sequence;
        let hook = &self.hook;
        self.nodes.entry(key).or_insert_with(|| {
            let sequence = *next_sequence;
            *next_sequence += 1;
            tracing::debug!("node {} created at {}", sequence, pos);
            let mut node = Node::new(pos, sequence);
            if let Some(hook) = hook {
                node.subscribe(Rc::clone(hook));
            }
            node
        })
    }

    /// Attach a pin at a coordinate, creating the node if needed.
    pub fn attach_pin_at(&mut self, pos: Coords, pin: PinId) -> AttachResult {
        self.get_or_create(pos).attach_pin(pin)
    }

    /// Attach a wire at a coordinate, creating the node if needed. The
    /// coordinate is normally one of the wire's endpoints but may also be a
    /// pass-through point the drawing layer has identified mid-span.
    pub fn attach_wire_at(&mut self, pos: Coords, wire: WireSpan) -> AttachResult {
        if !wire.touches(&pos) {
            tracing::trace!("wire {:?} registered as pass-through at {}", wire.id, pos);
        }
        self.get_or_create(pos).attach_wire(wire)
    }

    /// Detach a pin from the node at a coordinate. A node left empty is
    /// dropped immediately.
    pub fn detach_pin_at(&mut self, pos: &Coords, pin: PinId) -> DetachAt {
        let Some(key) = self.find_key(pos) else {
            return DetachAt::NoNode;
        };
        let Some(node) = self.nodes.get_mut(&key) else {
            return DetachAt::NoNode;
        };
        let result = node.detach_pin(pin);
        self.prune(key);
        DetachAt::Done(result)
    }

    /// Detach a wire from the node at a coordinate. Mirrors
    /// [`NodeRegistry::detach_pin_at`].
    pub fn detach_wire_at(&mut self, pos: &Coords, wire: WireId) -> DetachAt {
        let Some(key) = self.find_key(pos) else {
            return DetachAt::NoNode;
        };
        let Some(node) = self.nodes.get_mut(&key) else {
            return DetachAt::NoNode;
        };
        let result = node.detach_wire(wire);
        self.prune(key);
        DetachAt::Done(result)
    }

    fn prune(&mut self, key: GridKey) {
        if self.nodes.get(&key).is_some_and(Node::is_empty) {
            if let Some(node) = self.nodes.remove(&key) {
                tracing::debug!("node {} at {} dropped", node.sequence(), node.position());
            }
        }
    }

    /// Register a newly drawn wire at both of its endpoints.
    pub fn add_wire(&mut self, wire: WireSpan) -> (AttachResult, AttachResult) {
        let (start, end) = wire.endpoints();
        (
            self.attach_wire_at(start, wire),
            self.attach_wire_at(end, wire),
        )
    }

    /// Remove an erased wire from both of its endpoints.
    pub fn remove_wire(&mut self, wire: &WireSpan) -> (DetachAt, DetachAt) {
        let (start, end) = wire.endpoints();
        (
            self.detach_wire_at(&start, wire.id),
            self.detach_wire_at(&end, wire.id),
        )
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Positions that currently require a junction dot. Consumed by the
    /// rendering layer.
    pub fn dot_positions(&self) -> Vec<Coords> {
        self.nodes
            .values()
            .filter(|node| node.needs_dot())
            .map(Node::position)
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            node_count: self.nodes.len(),
            pin_count: self.nodes.values().map(Node::pin_count).sum(),
            wire_attachment_count: self.nodes.values().map(Node::wire_count).sum(),
            dot_count: self.nodes.values().filter(|n| n.needs_dot()).count(),
        }
    }

    /// Reset every node's visited flag. External traversals must call this
    /// once before or after their run so the scratch state never dangles.
    pub fn clear_visited(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_visited(false);
        }
    }

    /// Positions of all nodes electrically reachable from a coordinate,
    /// walking across nodes that share a wire. Uses the visited flags
    /// internally and sweeps them clear before returning.
    pub fn connected_from(&mut self, start: &Coords) -> Vec<Coords> {
        let Some(start_key) = self.find_key(start) else {
            return Vec::new();
        };

        let mut nodes_by_wire: HashMap<WireId, Vec<GridKey>> = HashMap::new();
        for (key, node) in &self.nodes {
            for span in node.wires() {
                nodes_by_wire.entry(span.id).or_default().push(*key);
            }
        }

        let mut reached = Vec::new();
        let mut queue = VecDeque::new();
        if let Some(node) = self.nodes.get_mut(&start_key) {
            node.set_visited(true);
            queue.push_back(start_key);
        }
        while let Some(key) = queue.pop_front() {
            let Some(node) = self.nodes.get(&key) else {
                continue;
            };
            reached.push(node.position());
            let wire_ids: Vec<WireId> = node.wires().map(|span| span.id).collect();
            for id in wire_ids {
                let Some(neighbors) = nodes_by_wire.get(&id) else {
                    continue;
                };
                for &next in neighbors {
                    if let Some(node) = self.nodes.get_mut(&next) {
                        if !node.is_visited() {
                            node.set_visited(true);
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        self.clear_visited();
        reached
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
