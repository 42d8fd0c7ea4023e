use crate::elements::{Info, Location, Tag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: i64,
    pub info: Info,
    pub tags: Vec<Tag>,
    pub location: Location,
}

impl Node {
    pub fn new(id: i64, location: Location) -> Node {
        Node {
            id: id,
            info: Info::default(),
            tags: Vec::new(),
            location: location,
        }
    }
}
