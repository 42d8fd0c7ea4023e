use crate::elements::{Info, ItemType, Tag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub item_type: ItemType,
    pub member_ref: i64,
    pub role: String,
}

impl Member {
    pub fn new(item_type: ItemType, member_ref: i64, role: &str) -> Member {
        Member {
            item_type: item_type,
            member_ref: member_ref,
            role: String::from(role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub id: i64,
    pub info: Info,
    pub tags: Vec<Tag>,
    pub members: Vec<Member>,
}

impl Relation {
    pub fn new(id: i64) -> Relation {
        Relation {
            id: id,
            info: Info::default(),
            tags: Vec::new(),
            members: Vec::new(),
        }
    }
}
