use osm_areas::{
    Area, Assembler, ItemType, Location, Member, NodeRef, OutputBuffer, Problem, Relation,
    RingNode, Tag, Way,
};

fn located_way(id: i64, nodes: &[(i64, i32, i32)]) -> Way {
    let mut way = Way::new(id);
    for (node_id, x, y) in nodes {
        way.nodes
            .push(NodeRef::with_location(*node_id, Location::new(*x, *y)));
    }
    way
}

fn multipolygon_relation(id: i64, way_ids: &[i64]) -> Relation {
    let mut relation = Relation::new(id);
    relation.tags.push(Tag::new("type", "multipolygon"));
    relation.tags.push(Tag::new("natural", "water"));
    for way_id in way_ids {
        relation
            .members
            .push(Member::new(ItemType::Way, *way_id, "outer"));
    }
    relation
}

fn assemble(relation: &Relation, ways: &[&Way]) -> (Area, Vec<Problem>) {
    let mut assembler = Assembler::new();
    assembler.remember_problems(true);
    let mut output = OutputBuffer::new();
    assembler.assemble(relation, ways, &mut output);
    let mut areas = output.read();
    assert_eq!(areas.len(), 1, "exactly one area record per relation");
    (areas.pop().unwrap(), assembler.problems().to_vec())
}

/// Ring equality up to cyclic rotation and direction reversal.
fn same_ring(expected: &[i64], actual: &[RingNode]) -> bool {
    let mut ids: Vec<i64> = actual.iter().map(|n| n.id).collect();
    assert!(ids.len() > 1 && ids.first() == ids.last(), "ring not closed");
    ids.pop();
    let mut want = expected.to_vec();
    if want.len() > 1 && want.first() == want.last() {
        want.pop();
    }
    if ids.len() != want.len() {
        return false;
    }
    let n = ids.len();
    let reversed: Vec<i64> = ids.iter().rev().cloned().collect();
    for candidate in &[ids, reversed] {
        for rotation in 0..n {
            if (0..n).all(|i| candidate[(i + rotation) % n] == want[i]) {
                return true;
            }
        }
    }
    false
}

fn outer_square() -> Way {
    located_way(10, &[(1, 0, 0), (2, 10, 0), (3, 10, 10), (4, 0, 10), (1, 0, 0)])
}

#[test]
fn single_closed_way_becomes_one_outer_ring() {
    let relation = multipolygon_relation(7, &[10]);
    let way = outer_square();
    let (area, problems) = assemble(&relation, &[&way]);

    assert_eq!(area.id, 15);
    assert_eq!(area.relation_id(), 7);
    assert!(area.is_valid());
    assert_eq!(area.parts.len(), 1);
    assert!(area.parts[0].inners.is_empty());
    assert!(same_ring(&[1, 2, 3, 4, 1], &area.parts[0].outer));
    assert!(problems.is_empty());
}

#[test]
fn two_disjoint_closed_ways_become_two_outer_rings() {
    let relation = multipolygon_relation(8, &[10, 11]);
    let first = outer_square();
    let second = located_way(
        11,
        &[(5, 200, 0), (6, 300, 0), (7, 300, 100), (8, 200, 100), (5, 200, 0)],
    );
    let (area, problems) = assemble(&relation, &[&first, &second]);

    assert!(area.is_valid());
    assert_eq!(area.parts.len(), 2);
    assert!(area.parts.iter().all(|part| part.inners.is_empty()));
    let mut outers: Vec<&Vec<RingNode>> = area.parts.iter().map(|p| &p.outer).collect();
    outers.sort_by_key(|nodes| nodes[0].id);
    assert!(same_ring(&[1, 2, 3, 4, 1], outers[0]));
    assert!(same_ring(&[5, 6, 7, 8, 5], outers[1]));
    assert!(problems.is_empty());
}

#[test]
fn inner_square_is_attached_to_its_outer() {
    let relation = multipolygon_relation(9, &[10, 11]);
    let outer = outer_square();
    let inner = located_way(11, &[(5, 2, 2), (6, 6, 2), (7, 6, 6), (8, 2, 6), (5, 2, 2)]);
    let (area, problems) = assemble(&relation, &[&outer, &inner]);

    assert!(area.is_valid());
    assert_eq!(area.parts.len(), 1);
    assert!(same_ring(&[1, 2, 3, 4, 1], &area.parts[0].outer));
    assert_eq!(area.parts[0].inners.len(), 1);
    assert!(same_ring(&[5, 6, 7, 8, 5], &area.parts[0].inners[0]));
    assert!(problems.is_empty());
}

#[test]
fn member_order_does_not_change_the_rings() {
    let outer = outer_square();
    let inner = located_way(11, &[(5, 2, 2), (6, 6, 2), (7, 6, 6), (8, 2, 6), (5, 2, 2)]);

    let (forward, _) = assemble(&multipolygon_relation(9, &[10, 11]), &[&outer, &inner]);
    let (backward, _) = assemble(&multipolygon_relation(9, &[11, 10]), &[&inner, &outer]);

    assert_eq!(forward.parts, backward.parts);
}

#[test]
fn shared_edge_between_two_ways_cancels() {
    // two triangles glued along the diagonal of a square
    let relation = multipolygon_relation(11, &[10, 11]);
    let lower = located_way(10, &[(1, 0, 0), (2, 10, 0), (3, 10, 10), (1, 0, 0)]);
    let upper = located_way(11, &[(1, 0, 0), (3, 10, 10), (4, 0, 10), (1, 0, 0)]);
    let (area, problems) = assemble(&relation, &[&lower, &upper]);

    assert!(area.is_valid());
    assert_eq!(area.parts.len(), 1);
    assert!(area.parts[0].inners.is_empty());
    assert!(same_ring(&[1, 2, 3, 4, 1], &area.parts[0].outer));
    assert!(problems.is_empty());
}

#[test]
fn fully_cancelling_edges_leave_a_ringless_area() {
    let relation = multipolygon_relation(12, &[10, 11]);
    let way = outer_square();
    let twin = located_way(11, &[(1, 0, 0), (2, 10, 0), (3, 10, 10), (4, 0, 10), (1, 0, 0)]);
    let (area, problems) = assemble(&relation, &[&way, &twin]);

    assert!(!area.is_valid());
    assert!(area.parts.is_empty());
    assert!(problems.is_empty());
}

#[test]
fn crossing_ways_yield_a_tag_only_area() {
    let relation = multipolygon_relation(13, &[10, 11]);
    let rising = located_way(10, &[(1, 0, 0), (3, 10, 10)]);
    let falling = located_way(11, &[(4, 0, 10), (2, 10, 0)]);
    let (area, problems) = assemble(&relation, &[&rising, &falling]);

    assert!(!area.is_valid());
    assert_eq!(area.tags, relation.tags);
    assert_eq!(problems.len(), 1);
    match &problems[0] {
        Problem::Intersection { location, .. } => {
            assert_eq!(*location, Location::new(5, 5));
        }
        other => panic!("expected an intersection problem, got {}", other),
    }
}

#[test]
fn crossing_detection_without_remember_keeps_no_problems() {
    let relation = multipolygon_relation(13, &[10, 11]);
    let rising = located_way(10, &[(1, 0, 0), (3, 10, 10)]);
    let falling = located_way(11, &[(4, 0, 10), (2, 10, 0)]);

    let mut assembler = Assembler::new();
    let mut output = OutputBuffer::new();
    assembler.assemble(&relation, &[&rising, &falling], &mut output);

    let areas = output.read();
    assert_eq!(areas.len(), 1);
    assert!(!areas[0].is_valid());
    assert!(assembler.problems().is_empty());
}

#[test]
fn open_chain_records_both_loose_endpoints() {
    let relation = multipolygon_relation(14, &[10]);
    let chain = located_way(10, &[(1, 0, 0), (2, 1, 0), (3, 2, 0), (4, 3, 0)]);
    let (area, problems) = assemble(&relation, &[&chain]);

    assert!(!area.is_valid());
    assert_eq!(problems.len(), 2);
    let mut endpoints: Vec<i64> = problems
        .iter()
        .map(|p| match p {
            Problem::RingNotClosed { endpoint } => endpoint.id,
            other => panic!("expected ring not closed, got {}", other),
        })
        .collect();
    endpoints.sort();
    assert_eq!(endpoints, vec![1, 4]);
}

#[test]
fn problems_accumulate_until_cleared() {
    let relation = multipolygon_relation(14, &[10]);
    let chain = located_way(10, &[(1, 0, 0), (2, 1, 0), (3, 2, 0), (4, 3, 0)]);

    let mut assembler = Assembler::new();
    assembler.remember_problems(true);
    let mut output = OutputBuffer::new();
    assembler.assemble(&relation, &[&chain], &mut output);
    assembler.assemble(&relation, &[&chain], &mut output);
    assert_eq!(assembler.problems().len(), 4);
    assembler.clear_problems();
    assert!(assembler.problems().is_empty());
}

#[test]
fn debug_output_does_not_change_the_result() {
    let relation = multipolygon_relation(7, &[10]);
    let way = outer_square();

    let mut assembler = Assembler::new();
    assembler.enable_debug_output(true);
    let mut output = OutputBuffer::new();
    assembler.assemble(&relation, &[&way], &mut output);
    let areas = output.read();
    assert_eq!(areas.len(), 1);
    assert!(areas[0].is_valid());
    assert!(same_ring(&[1, 2, 3, 4, 1], &areas[0].parts[0].outer));
}

#[test]
fn unset_locations_are_skipped() {
    let relation = multipolygon_relation(15, &[10]);
    let mut way = Way::new(10);
    way.nodes.push(NodeRef::with_location(1, Location::new(0, 0)));
    way.nodes.push(NodeRef::new(2));
    way.nodes.push(NodeRef::with_location(3, Location::new(10, 10)));
    let (area, problems) = assemble(&relation, &[&way]);

    // no usable segments at all: ringless area, nothing to report
    assert!(!area.is_valid());
    assert!(problems.is_empty());
}
