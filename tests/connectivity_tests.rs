//! End-to-end drawing scenarios against the connectivity engine.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use netpoint::prelude::*;

fn wire(id: u32, start: (f64, f64), end: (f64, f64)) -> WireSpan {
    WireSpan::between(
        WireId(id),
        Coords::new(start.0, start.1),
        Coords::new(end.0, end.1),
    )
}

fn registry_with_log() -> (NodeRegistry, Rc<RefCell<Vec<NodeEvent>>>) {
    let mut registry = NodeRegistry::new();
    let log: Rc<RefCell<Vec<NodeEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    registry.set_event_hook(Rc::new(move |event: &NodeEvent| {
        sink.borrow_mut().push(event.clone())
    }));
    (registry, log)
}

#[test]
fn drawing_a_tee_produces_one_dot() {
    let (mut registry, log) = registry_with_log();

    // Horizontal run drawn as two segments, then a vertical branch onto
    // the joint.
    registry.add_wire(wire(1, (10.0, 10.0), (20.0, 10.0)));
    registry.add_wire(wire(2, (20.0, 10.0), (30.0, 10.0)));
    assert!(registry.dot_positions().is_empty());
    assert!(log.borrow().is_empty());

    registry.add_wire(wire(3, (20.0, 10.0), (20.0, 20.0)));

    let dots = registry.dot_positions();
    assert_eq!(dots.len(), 1);
    assert!(dots[0].coincident(&Coords::new(20.0, 10.0)));
    assert_eq!(
        log.borrow().as_slice(),
        [NodeEvent::DotAdded(Coords::new(20.0, 10.0))]
    );
}

#[test]
fn placing_and_removing_a_part_toggles_the_dot_once_each_way() {
    let (mut registry, log) = registry_with_log();
    let terminal = Coords::new(20.0, 10.0);

    let w1 = wire(1, (10.0, 10.0), (30.0, 10.0));
    registry.add_wire(w1);
    // The part terminal lands mid-wire; the drawing layer registers the
    // pass-through point before placing the pin.
    registry.attach_wire_at(terminal, w1);
    registry.attach_pin_at(terminal, PinId(1));
    registry.attach_pin_at(Coords::new(20.0001, 9.9999), PinId(1));

    // The second placement coalesced onto the same node and was a no-op.
    assert_eq!(registry.stats().pin_count, 1);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0], NodeEvent::DotAdded(terminal));

    assert!(registry.detach_pin_at(&terminal, PinId(1)).changed());
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(log.borrow()[1], NodeEvent::DotRemoved(terminal));

    // The pass-through keeps the node alive alongside both endpoints.
    assert_eq!(registry.len(), 3);
}

#[test]
fn erasing_everything_empties_the_registry() {
    let (mut registry, log) = registry_with_log();

    let w1 = wire(1, (10.0, 10.0), (20.0, 10.0));
    let w2 = wire(2, (20.0, 10.0), (20.0, 20.0));
    registry.add_wire(w1);
    registry.add_wire(w2);
    registry.attach_pin_at(Coords::new(10.0, 10.0), PinId(1));

    registry.detach_pin_at(&Coords::new(10.0, 10.0), PinId(1));
    registry.remove_wire(&w2);
    registry.remove_wire(&w1);

    assert!(registry.is_empty());
    assert_eq!(registry.stats().node_count, 0);

    // Every DotAdded was matched by a DotRemoved by the time the sheet is
    // blank.
    let added = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, NodeEvent::DotAdded(_)))
        .count();
    let removed = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, NodeEvent::DotRemoved(_)))
        .count();
    assert_eq!(added, removed);
}

#[test]
fn corner_then_branch_then_part() {
    let mut registry = NodeRegistry::new();
    let corner = Coords::new(20.0, 10.0);

    // An L-corner needs no dot.
    registry.add_wire(wire(1, (10.0, 10.0), (20.0, 10.0)));
    registry.add_wire(wire(2, (20.0, 10.0), (20.0, 20.0)));
    assert!(registry.dot_positions().is_empty());

    // A third wire into the corner makes it a junction.
    registry.add_wire(wire(3, (20.0, 10.0), (30.0, 10.0)));
    assert_eq!(registry.dot_positions().len(), 1);

    // Removing it restores the bare corner.
    registry.detach_wire_at(&corner, WireId(3));
    assert!(registry.dot_positions().is_empty());

    // A part terminal on the corner needs a dot regardless of wire count.
    registry.attach_pin_at(corner, PinId(1));
    assert_eq!(registry.dot_positions().len(), 1);
}

#[test]
fn connectivity_traversal_finds_the_whole_net() {
    let mut registry = NodeRegistry::new();

    // A rail with a stub, and a separate second net.
    registry.add_wire(wire(1, (0.0, 0.0), (10.0, 0.0)));
    registry.add_wire(wire(2, (10.0, 0.0), (20.0, 0.0)));
    registry.add_wire(wire(3, (10.0, 0.0), (10.0, 5.0)));
    registry.add_wire(wire(4, (0.0, 20.0), (10.0, 20.0)));

    let net = registry.connected_from(&Coords::new(20.0, 0.0));
    assert_eq!(net.len(), 4);

    let other = registry.connected_from(&Coords::new(0.0, 20.0));
    assert_eq!(other.len(), 2);

    // Both traversals swept their scratch state.
    assert!(registry.nodes().all(|node| !node.is_visited()));
}

#[test]
fn node_positions_are_the_first_drawn_coordinates() {
    let mut registry = NodeRegistry::new();
    registry.attach_pin_at(Coords::new(5.0003, 5.0), PinId(1));
    registry.attach_pin_at(Coords::new(5.0, 5.0003), PinId(2));

    let node = registry.get(&Coords::new(5.0, 5.0)).expect("node exists");
    assert_eq!(node.pin_count(), 2);
    // Position keeps the first coordinate seen at this point.
    assert_relative_eq!(node.position().x, 5.0003);
    assert_relative_eq!(node.position().y, 5.0);
    assert!(node.position().distance_to(&Coords::new(5.0, 5.0)) < netpoint::TOLERANCE);
}

#[test]
fn stats_snapshot_serializes() {
    let mut registry = NodeRegistry::new();
    registry.add_wire(wire(1, (10.0, 10.0), (20.0, 10.0)));
    registry.attach_pin_at(Coords::new(20.0, 10.0), PinId(1));

    let json = serde_json::to_string(&registry.stats()).expect("stats serialize");
    assert!(json.contains("\"node_count\":2"));
    assert!(json.contains("\"dot_count\":1"));
}
