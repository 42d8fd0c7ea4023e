use crate::elements::{Element, ItemType, Node, Relation, Way};
use crate::Result;
use std::io::{Error, ErrorKind};

/// Rejects input that is not grouped nodes, then ways, then relations,
/// with strictly increasing ids within each kind. Runs before any
/// database mutation so a violation leaves everything untouched.
pub struct CheckOrder {
    last: Option<(ItemType, i64)>,
}

impl CheckOrder {
    pub fn new() -> CheckOrder {
        CheckOrder { last: None }
    }

    fn check(&mut self, item_type: ItemType, id: i64) -> Result<()> {
        if let Some((last_type, last_id)) = self.last {
            if item_type < last_type {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("input out of order: {} {} after {} {}", item_type, id, last_type, last_id),
                ));
            }
            if item_type == last_type && id <= last_id {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("input out of order: {} {} after id {}", item_type, id, last_id),
                ));
            }
        }
        self.last = Some((item_type, id));
        Ok(())
    }

    pub fn node(&mut self, node: &Node) -> Result<()> {
        self.check(ItemType::Node, node.id)
    }

    pub fn way(&mut self, way: &Way) -> Result<()> {
        self.check(ItemType::Way, way.id)
    }

    pub fn relation(&mut self, relation: &Relation) -> Result<()> {
        self.check(ItemType::Relation, relation.id)
    }

    pub fn element(&mut self, element: &Element) -> Result<()> {
        self.check(element.item_type(), element.id())
    }
}

impl Default for CheckOrder {
    fn default() -> CheckOrder {
        CheckOrder::new()
    }
}
