use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Tag {
        Tag {
            key: String::from(key),
            value: String::from(value),
        }
    }
}

pub fn find_tag<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    for tag in tags {
        if tag.key == key {
            return Some(&tag.value);
        }
    }
    None
}

/// Version / changeset / timestamp metadata common to all elements,
/// copied onto areas derived from a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    pub version: i64,
    pub changeset: i64,
    pub timestamp: i64,
    pub uid: i64,
    pub user: String,
    pub visible: bool,
}

impl Default for Info {
    fn default() -> Info {
        Info {
            version: 0,
            changeset: 0,
            timestamp: 0,
            uid: 0,
            user: String::new(),
            visible: true,
        }
    }
}
