use crate::elements::{Location, RingNode};
use crate::segments::NodeRefSegment;
use serde::Serialize;
use std::fmt;

/// Input defects found while assembling one relation. Collected only
/// when the assembler is asked to remember problems; detection happens
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Problem {
    Intersection {
        location: Location,
        segment_a: NodeRefSegment,
        segment_b: NodeRefSegment,
    },
    RingNotClosed {
        endpoint: RingNode,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Intersection {
                location,
                segment_a,
                segment_b,
            } => write!(
                f,
                "intersection at {} between {} and {}",
                location, segment_a, segment_b
            ),
            Problem::RingNotClosed { endpoint } => {
                write!(f, "ring not closed at {}", endpoint)
            }
        }
    }
}
