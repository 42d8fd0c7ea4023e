use crate::elements::{Location, PolygonPart, RingNode};
use crate::segments::{is_below, NodeRefSegment};
use log::debug;
use std::fmt;

/// A ring under construction: open until its two ends refer to the same
/// node. The outer flag is the winding annotation of the segment that
/// started the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoRing {
    pub nodes: Vec<RingNode>,
    pub outer: bool,
}

impl ProtoRing {
    fn from_segment(segment: &NodeRefSegment, cw: bool) -> ProtoRing {
        ProtoRing {
            nodes: vec![segment.first, segment.second],
            outer: cw,
        }
    }

    pub fn first(&self) -> RingNode {
        self.nodes[0]
    }

    pub fn last(&self) -> RingNode {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn closed(&self) -> bool {
        self.nodes.len() > 1 && self.first().id == self.last().id
    }
}

impl fmt::Display for ProtoRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ring[")?;
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", n.id)?;
        }
        write!(f, "]")
    }
}

/// Per-segment annotations, parallel to the segment list. Ring links
/// are indices into the ring slot vector; absorbed rings leave a None
/// slot behind and their links are rewritten, so indices stay stable.
#[derive(Debug, Clone, Copy, Default)]
struct SegmentState {
    ring: Option<usize>,
    cw: bool,
    left: Option<usize>,
}

fn relink(state: &mut [SegmentState], from: usize, to: usize) {
    for s in state.iter_mut() {
        if s.ring == Some(from) {
            s.ring = Some(to);
        }
    }
}

/// After `rings[target]` grew at its end, splice in any open ring that
/// now continues from that end. Returns the absorbed slot.
fn combine_rings_end(target: usize, rings: &mut Vec<Option<ProtoRing>>, debug: bool) -> Option<usize> {
    let end = match &rings[target] {
        Some(ring) if !ring.closed() => ring.last(),
        _ => return None,
    };
    let mut found = None;
    for (i, slot) in rings.iter().enumerate() {
        if i == target {
            continue;
        }
        if let Some(other) = slot {
            if other.closed() {
                continue;
            }
            if other.first().id == end.id {
                found = Some((i, true));
                break;
            }
            if other.last().id == end.id {
                found = Some((i, false));
                break;
            }
        }
    }
    let (absorbed, at_start) = found?;
    let other = rings[absorbed].take()?;
    let ring = rings[target].as_mut()?;
    if at_start {
        ring.nodes.extend(other.nodes.into_iter().skip(1));
    } else {
        let mut nodes = other.nodes;
        nodes.pop();
        nodes.reverse();
        ring.nodes.extend(nodes);
    }
    if debug {
        debug!("combined ring {} into end of ring {}", absorbed, target);
    }
    Some(absorbed)
}

/// Mirror of combine_rings_end for a ring that grew at its start.
fn combine_rings_start(target: usize, rings: &mut Vec<Option<ProtoRing>>, debug: bool) -> Option<usize> {
    let start = match &rings[target] {
        Some(ring) if !ring.closed() => ring.first(),
        _ => return None,
    };
    let mut found = None;
    for (i, slot) in rings.iter().enumerate() {
        if i == target {
            continue;
        }
        if let Some(other) = slot {
            if other.closed() {
                continue;
            }
            if other.last().id == start.id {
                found = Some((i, true));
                break;
            }
            if other.first().id == start.id {
                found = Some((i, false));
                break;
            }
        }
    }
    let (absorbed, at_end) = found?;
    let other = rings[absorbed].take()?;
    let ring = rings[target].as_mut()?;
    let mut nodes = other.nodes;
    if at_end {
        nodes.pop();
    } else {
        nodes.reverse();
        nodes.pop();
    }
    nodes.extend(ring.nodes.drain(..));
    ring.nodes = nodes;
    if debug {
        debug!("combined ring {} into start of ring {}", absorbed, target);
    }
    Some(absorbed)
}

/// Join segments into rings. Segments are expected in canonical sorted
/// order; the orientation of each new ring is inherited, inverted, from
/// the nearest earlier segment spanning its start, which alternates
/// outer and inner polarity in a left to right sweep.
pub fn build_rings(segments: &[NodeRefSegment], debug: bool) -> Vec<ProtoRing> {
    let mut rings: Vec<Option<ProtoRing>> = Vec::new();
    let mut state = vec![SegmentState::default(); segments.len()];

    for (i, segment) in segments.iter().enumerate() {
        if debug {
            debug!("check segment {}", segment);
        }
        let mut attached = false;
        for ri in 0..rings.len() {
            enum Grow {
                EndWith(RingNode),
                StartWith(RingNode),
            }
            let grow = {
                let ring = match &rings[ri] {
                    Some(ring) if !ring.closed() => ring,
                    _ => continue,
                };
                if ring.last().id == segment.first.id {
                    Grow::EndWith(segment.second)
                } else if ring.last().id == segment.second.id {
                    Grow::EndWith(segment.first)
                } else if ring.first().id == segment.first.id {
                    Grow::StartWith(segment.second)
                } else if ring.first().id == segment.second.id {
                    Grow::StartWith(segment.first)
                } else {
                    continue;
                }
            };
            if debug {
                debug!("  match against ring {}", ri);
            }
            state[i].ring = Some(ri);
            let absorbed = match grow {
                Grow::EndWith(node) => {
                    if let Some(ring) = rings[ri].as_mut() {
                        ring.nodes.push(node);
                    }
                    combine_rings_end(ri, &mut rings, debug)
                }
                Grow::StartWith(node) => {
                    if let Some(ring) = rings[ri].as_mut() {
                        ring.nodes.insert(0, node);
                    }
                    combine_rings_start(ri, &mut rings, debug)
                }
            };
            if let Some(old) = absorbed {
                relink(&mut state, old, ri);
            }
            attached = true;
            break;
        }

        if !attached {
            let start = segment.first.location;
            let mut cw = true;
            let mut left = None;
            for j in (0..i).rev() {
                let other = &segments[j];
                let (lo, hi) = min_max_y(other);
                if lo <= start.y && hi >= start.y {
                    if (other.first.location.x <= start.x && other.second.location.x <= start.x)
                        || is_below(start, other)
                    {
                        cw = !state[j].cw;
                        left = Some(j);
                        break;
                    }
                }
            }
            state[i].cw = cw;
            state[i].left = left;
            rings.push(Some(ProtoRing::from_segment(segment, cw)));
            state[i].ring = Some(rings.len() - 1);
            if debug {
                debug!(
                    "  new {} ring {} for segment {} (left neighbour {:?})",
                    if cw { "cw" } else { "ccw" },
                    rings.len() - 1,
                    segment,
                    state[i].left
                );
            }
        }
    }

    rings.into_iter().flatten().collect()
}

fn min_max_y(segment: &NodeRefSegment) -> (i32, i32) {
    let a = segment.first.location.y;
    let b = segment.second.location.y;
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Even-odd test of `location` against a closed ring.
fn point_in_ring(location: Location, nodes: &[RingNode]) -> bool {
    let mut inside = false;
    for pair in nodes.windows(2) {
        let a = pair[0].location;
        let b = pair[1].location;
        if (a.y > location.y) != (b.y > location.y) {
            let lhs = (location.x as i128 - a.x as i128) * (b.y as i128 - a.y as i128);
            let rhs = (location.y as i128 - a.y as i128) * (b.x as i128 - a.x as i128);
            let crosses = if b.y > a.y { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
    }
    inside
}

/// Doubled enclosed area, sign free.
fn ring_area2(nodes: &[RingNode]) -> i128 {
    let mut total: i128 = 0;
    for pair in nodes.windows(2) {
        let a = pair[0].location;
        let b = pair[1].location;
        total += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
    }
    total.abs()
}

/// Pair every inner ring with the smallest outer ring containing its
/// start node and emit the polygon parts in outer creation order.
/// Returns None when some inner ring has no containing outer.
pub fn classify_rings(rings: &[ProtoRing], debug: bool) -> Option<Vec<PolygonPart>> {
    let mut outers = Vec::new();
    for (i, ring) in rings.iter().enumerate() {
        if ring.outer {
            if debug {
                debug!("outer: {}", ring);
            }
            outers.push(i);
        }
    }

    let mut inners_of = vec![Vec::new(); rings.len()];
    for (i, ring) in rings.iter().enumerate() {
        if ring.outer {
            continue;
        }
        if debug {
            debug!("inner: {}", ring);
        }
        let start = ring.first().location;
        let mut enclosing: Option<(usize, i128)> = None;
        for &o in &outers {
            if point_in_ring(start, &rings[o].nodes) {
                let area = ring_area2(&rings[o].nodes);
                let better = match enclosing {
                    Some((_, best)) => area < best,
                    None => true,
                };
                if better {
                    enclosing = Some((o, area));
                }
            }
        }
        match enclosing {
            Some((o, _)) => inners_of[o].push(i),
            None => {
                if debug {
                    debug!("no outer ring encloses {}", ring);
                }
                return None;
            }
        }
    }

    let mut parts = Vec::with_capacity(outers.len());
    for o in outers {
        parts.push(PolygonPart {
            outer: rings[o].nodes.clone(),
            inners: inners_of[o].iter().map(|&i| rings[i].nodes.clone()).collect(),
        });
    }
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{sort_segments, NodeRefSegment};

    fn seg(a: (i64, i32, i32), b: (i64, i32, i32)) -> NodeRefSegment {
        NodeRefSegment::new(
            RingNode::new(a.0, Location::new(a.1, a.2)),
            RingNode::new(b.0, Location::new(b.1, b.2)),
        )
    }

    fn ring_ids(ring: &ProtoRing) -> Vec<i64> {
        ring.nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn square_closes_into_one_cw_ring() {
        let mut segments = vec![
            seg((1, 0, 0), (2, 10, 0)),
            seg((2, 10, 0), (3, 10, 10)),
            seg((3, 10, 10), (4, 0, 10)),
            seg((4, 0, 10), (1, 0, 0)),
        ];
        sort_segments(&mut segments);
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].closed());
        assert!(rings[0].outer);
        assert_eq!(rings[0].nodes.len(), 5);
    }

    #[test]
    fn nested_rings_alternate_orientation() {
        let mut segments = vec![
            // outer square
            seg((1, 0, 0), (2, 10, 0)),
            seg((2, 10, 0), (3, 10, 10)),
            seg((3, 10, 10), (4, 0, 10)),
            seg((4, 0, 10), (1, 0, 0)),
            // inner square
            seg((5, 2, 2), (6, 6, 2)),
            seg((6, 6, 2), (7, 6, 6)),
            seg((7, 6, 6), (8, 2, 6)),
            seg((8, 2, 6), (5, 2, 2)),
        ];
        sort_segments(&mut segments);
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.closed()));
        let outer: Vec<_> = rings.iter().filter(|r| r.outer).collect();
        let inner: Vec<_> = rings.iter().filter(|r| !r.outer).collect();
        assert_eq!(outer.len(), 1);
        assert_eq!(inner.len(), 1);
        assert!(ring_ids(inner[0]).iter().all(|id| *id >= 5));
    }

    #[test]
    fn open_chain_stays_open() {
        let segments = vec![
            seg((1, 0, 0), (2, 1, 0)),
            seg((2, 1, 0), (3, 2, 0)),
            seg((3, 2, 0), (4, 3, 0)),
        ];
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 1);
        assert!(!rings[0].closed());
        assert_eq!(ring_ids(&rings[0]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn bridging_segment_combines_two_open_rings_at_the_end() {
        // deliberately ordered so two fragments exist before the bridge
        let segments = vec![
            seg((1, 0, 0), (2, 0, 2)),
            seg((3, 5, 0), (4, 5, 2)),
            seg((2, 0, 2), (3, 5, 0)),
            seg((1, 0, 0), (4, 5, 2)),
        ];
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].closed());
        assert_eq!(rings[0].nodes.len(), 5);
    }

    #[test]
    fn bridging_segment_combines_two_open_rings_at_the_start() {
        let segments = vec![
            seg((1, 4, 0), (2, 4, 2)),
            seg((3, 0, 0), (4, 0, 2)),
            seg((4, 0, 2), (1, 4, 0)),
            seg((3, 0, 0), (2, 4, 2)),
        ];
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].closed());
        assert_eq!(rings[0].nodes.len(), 5);
    }

    #[test]
    fn disjoint_rings_are_both_outer() {
        let mut segments = vec![
            seg((1, 0, 0), (2, 10, 0)),
            seg((2, 10, 0), (3, 10, 10)),
            seg((3, 10, 10), (4, 0, 10)),
            seg((4, 0, 10), (1, 0, 0)),
            seg((5, 20, 0), (6, 30, 0)),
            seg((6, 30, 0), (7, 30, 10)),
            seg((7, 30, 10), (8, 20, 10)),
            seg((8, 20, 10), (5, 20, 0)),
        ];
        sort_segments(&mut segments);
        let rings = build_rings(&segments, false);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.closed() && r.outer));
    }

    #[test]
    fn classification_pairs_inner_with_enclosing_outer() {
        let mut segments = vec![
            seg((1, 0, 0), (2, 10, 0)),
            seg((2, 10, 0), (3, 10, 10)),
            seg((3, 10, 10), (4, 0, 10)),
            seg((4, 0, 10), (1, 0, 0)),
            seg((5, 2, 2), (6, 6, 2)),
            seg((6, 6, 2), (7, 6, 6)),
            seg((7, 6, 6), (8, 2, 6)),
            seg((8, 2, 6), (5, 2, 2)),
        ];
        sort_segments(&mut segments);
        let rings = build_rings(&segments, false);
        let parts = classify_rings(&rings, false).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].inners.len(), 1);
    }

    #[test]
    fn inner_without_outer_is_rejected() {
        let rings = vec![ProtoRing {
            nodes: vec![
                RingNode::new(1, Location::new(0, 0)),
                RingNode::new(2, Location::new(4, 0)),
                RingNode::new(3, Location::new(4, 4)),
                RingNode::new(1, Location::new(0, 0)),
            ],
            outer: false,
        }];
        assert!(classify_rings(&rings, false).is_none());
    }

    #[test]
    fn point_in_ring_even_odd() {
        let square = vec![
            RingNode::new(1, Location::new(0, 0)),
            RingNode::new(2, Location::new(10, 0)),
            RingNode::new(3, Location::new(10, 10)),
            RingNode::new(4, Location::new(0, 10)),
            RingNode::new(1, Location::new(0, 0)),
        ];
        assert!(point_in_ring(Location::new(5, 5), &square));
        assert!(!point_in_ring(Location::new(15, 5), &square));
        assert!(!point_in_ring(Location::new(-1, -1), &square));
    }
}
