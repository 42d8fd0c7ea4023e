mod area;
mod info;
mod location;
mod node;
mod relation;
mod way;

pub use area::{Area, PolygonPart, RingNode};
pub use info::{find_tag, Info, Tag};
pub use location::{Location, COORDINATE_PRECISION};
pub use node::Node;
pub use relation::{Member, Relation};
pub use way::{NodeRef, Way};

use serde::Serialize;
use std::fmt;
use std::mem::size_of;

pub trait GeoJsonable {
    fn to_geojson(&self) -> crate::Result<serde_json::Value>;
}

/// The three element kinds, in canonical stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ItemType {
    Node,
    Way,
    Relation,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Node => write!(f, "node"),
            ItemType::Way => write!(f, "way"),
            ItemType::Relation => write!(f, "relation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Element {
    pub fn id(&self) -> i64 {
        match self {
            Element::Node(n) => n.id,
            Element::Way(w) => w.id,
            Element::Relation(r) => r.id,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Element::Node(_) => ItemType::Node,
            Element::Way(_) => ItemType::Way,
            Element::Relation(_) => ItemType::Relation,
        }
    }

    /// Estimated memory footprint in bytes, used for the used_memory
    /// diagnostics of the stash and the databases.
    pub fn byte_size(&self) -> usize {
        let heap = match self {
            Element::Node(n) => tags_size(&n.tags) + n.info.user.len(),
            Element::Way(w) => {
                tags_size(&w.tags) + w.info.user.len() + w.nodes.len() * size_of::<NodeRef>()
            }
            Element::Relation(r) => {
                let mut members = r.members.len() * size_of::<Member>();
                for m in &r.members {
                    members += m.role.len();
                }
                tags_size(&r.tags) + r.info.user.len() + members
            }
        };
        size_of::<Element>() + heap
    }
}

fn tags_size(tags: &[Tag]) -> usize {
    let mut total = tags.len() * size_of::<Tag>();
    for tag in tags {
        total += tag.key.len() + tag.value.len();
    }
    total
}

impl From<Node> for Element {
    fn from(n: Node) -> Element {
        Element::Node(n)
    }
}

impl From<Way> for Element {
    fn from(w: Way) -> Element {
        Element::Way(w)
    }
}

impl From<Relation> for Element {
    fn from(r: Relation) -> Element {
        Element::Relation(r)
    }
}
