mod assembler;
mod check_order;
mod elements;
mod manager;
mod members_db;
mod multipolygon;
mod output;
mod problems;
mod relations_db;
mod rings;
mod segments;
mod stash;

pub use crate::assembler::Assembler;
pub use crate::check_order::CheckOrder;
pub use crate::elements::{
    find_tag, Area, Element, GeoJsonable, Info, ItemType, Location, Member, Node, NodeRef,
    PolygonPart, Relation, RingNode, Tag, Way, COORDINATE_PRECISION,
};
pub use crate::manager::{CompletedMembers, MemoryUsage, RelationsHandler, RelationsManager};
pub use crate::members_db::MembersDatabase;
pub use crate::multipolygon::{MultipolygonHandler, MultipolygonManager, RelationFilter};
pub use crate::output::{FlushCallback, OutputBuffer};
pub use crate::problems::Problem;
pub use crate::relations_db::{RelationHandle, RelationsDatabase};
pub use crate::rings::{build_rings, classify_rings, ProtoRing};
pub use crate::segments::{
    calculate_intersection, erase_duplicate_segments, extract_segments, find_intersections,
    sort_segments, NodeRefSegment,
};
pub use crate::stash::{ItemHandle, ItemStash};

pub type Result<T> = std::io::Result<T>;
