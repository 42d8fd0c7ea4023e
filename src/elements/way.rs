use crate::elements::{Info, Location, Tag};
use serde::Serialize;

/// A node reference in a way. The location is filled in by the caller
/// before the second pass; references whose location was never resolved
/// stay `None` and are skipped during segment extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeRef {
    pub id: i64,
    pub location: Option<Location>,
}

impl NodeRef {
    pub fn new(id: i64) -> NodeRef {
        NodeRef {
            id: id,
            location: None,
        }
    }

    pub fn with_location(id: i64, location: Location) -> NodeRef {
        NodeRef {
            id: id,
            location: Some(location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Way {
    pub id: i64,
    pub info: Info,
    pub tags: Vec<Tag>,
    pub nodes: Vec<NodeRef>,
}

impl Way {
    pub fn new(id: i64) -> Way {
        Way {
            id: id,
            info: Info::default(),
            tags: Vec::new(),
            nodes: Vec::new(),
        }
    }
}
