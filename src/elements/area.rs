use crate::elements::{GeoJsonable, Info, Location, Relation, Tag};
use crate::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

/// A node reference with a resolved location. Assembled rings are
/// sequences of these; the first and last entry of a closed ring refer
/// to the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RingNode {
    pub id: i64,
    pub location: Location,
}

impl RingNode {
    pub fn new(id: i64, location: Location) -> RingNode {
        RingNode {
            id: id,
            location: location,
        }
    }
}

impl fmt::Display for RingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, self.location)
    }
}

/// One outer ring together with the inner rings of its holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonPart {
    pub outer: Vec<RingNode>,
    pub inners: Vec<Vec<RingNode>>,
}

/// An area derived from a multipolygon relation. Ids are relation id
/// times two plus one, leaving even ids free for areas built directly
/// from closed ways.
///
/// An area with no parts records a relation whose geometry could not be
/// assembled; metadata and tags are still present so consumers can
/// report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub id: i64,
    pub info: Info,
    pub tags: Vec<Tag>,
    pub parts: Vec<PolygonPart>,
}

impl Area {
    pub fn from_relation(relation: &Relation) -> Area {
        Area {
            id: relation.id * 2 + 1,
            info: relation.info.clone(),
            tags: relation.tags.clone(),
            parts: Vec::new(),
        }
    }

    /// Id of the relation this area was derived from.
    pub fn relation_id(&self) -> i64 {
        self.id / 2
    }

    pub fn is_valid(&self) -> bool {
        !self.parts.is_empty()
    }
}

fn ring_coordinates(nodes: &[RingNode]) -> Value {
    let mut coords = Vec::with_capacity(nodes.len());
    for n in nodes {
        coords.push(json!([n.location.lon(), n.location.lat()]));
    }
    json!(coords)
}

impl GeoJsonable for Area {
    fn to_geojson(&self) -> Result<Value> {
        let mut properties = Map::new();
        for tag in &self.tags {
            properties.insert(tag.key.clone(), json!(tag.value));
        }

        let mut polygons = Vec::new();
        for part in &self.parts {
            let mut rings = Vec::new();
            rings.push(ring_coordinates(&part.outer));
            for inner in &part.inners {
                rings.push(ring_coordinates(inner));
            }
            polygons.push(json!(rings));
        }

        let mut geometry = Map::new();
        geometry.insert(String::from("type"), json!("MultiPolygon"));
        geometry.insert(String::from("coordinates"), json!(polygons));

        let mut rr = Map::new();
        rr.insert(String::from("type"), json!("Feature"));
        rr.insert(String::from("id"), json!(self.id));
        rr.insert(String::from("properties"), json!(properties));
        rr.insert(String::from("geometry"), json!(geometry));
        Ok(json!(rr))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area[{} from relation {} with {} parts]",
            self.id,
            self.relation_id(),
            self.parts.len()
        )
    }
}
