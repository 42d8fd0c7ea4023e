use crate::elements::{Area, Relation, Way};
use crate::output::OutputBuffer;
use crate::problems::Problem;
use crate::rings::{build_rings, classify_rings};
use crate::segments::{
    erase_duplicate_segments, extract_segments, find_intersections, sort_segments,
};
use log::debug;

/// Builds one area from a multipolygon relation and its way members.
/// Scratch state lives only for the duration of assemble; the problem
/// list accumulates across invocations until cleared.
///
/// Every invocation commits exactly one area record. When the input is
/// defective (crossing segments, unclosed rings, an inner ring with no
/// enclosing outer) the record carries metadata and tags but no rings,
/// which consumers read as invalid geometry.
pub struct Assembler {
    debug: bool,
    remember_problems: bool,
    problems: Vec<Problem>,
}

impl Assembler {
    pub fn new() -> Assembler {
        Assembler {
            debug: false,
            remember_problems: false,
            problems: Vec::new(),
        }
    }

    /// Trace segment processing, ring matches and classification
    /// decisions to the log.
    pub fn enable_debug_output(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Keep a list of defects found in the input. Off by default.
    pub fn remember_problems(&mut self, remember: bool) {
        self.remember_problems = remember;
    }

    pub fn clear_problems(&mut self) {
        self.problems.clear();
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn assemble(&mut self, relation: &Relation, ways: &[&Way], output: &mut OutputBuffer) {
        let mut segments = extract_segments(ways);
        if self.debug {
            debug!(
                "assemble relation {}: {} ways, {} segments",
                relation.id,
                ways.len(),
                segments.len()
            );
        }
        sort_segments(&mut segments);
        erase_duplicate_segments(&mut segments, self.debug);

        let mut area = Area::from_relation(relation);

        let crossings = find_intersections(&segments, self.debug);
        if !crossings.is_empty() {
            if self.remember_problems {
                for (location, segment_a, segment_b) in crossings {
                    self.problems.push(Problem::Intersection {
                        location: location,
                        segment_a: segment_a,
                        segment_b: segment_b,
                    });
                }
            }
            output.push(area);
            return;
        }

        let rings = build_rings(&segments, self.debug);

        let mut open = false;
        for ring in &rings {
            if !ring.closed() {
                open = true;
                if self.debug {
                    debug!("ring not closed: {}", ring);
                }
                if self.remember_problems {
                    self.problems.push(Problem::RingNotClosed {
                        endpoint: ring.first(),
                    });
                    self.problems.push(Problem::RingNotClosed {
                        endpoint: ring.last(),
                    });
                }
            }
        }
        if open {
            output.push(area);
            return;
        }

        match classify_rings(&rings, self.debug) {
            Some(parts) => area.parts = parts,
            None => {
                output.push(area);
                return;
            }
        }
        output.push(area);
    }
}

impl Default for Assembler {
    fn default() -> Assembler {
        Assembler::new()
    }
}
