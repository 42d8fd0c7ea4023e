use crate::assembler::Assembler;
use crate::elements::{find_tag, ItemType, Member, Relation, Way};
use crate::manager::{CompletedMembers, RelationsHandler, RelationsManager};
use crate::output::OutputBuffer;
use crate::problems::Problem;

pub type RelationFilter = Box<dyn Fn(&Relation) -> bool>;

fn default_filter(relation: &Relation) -> bool {
    match find_tag(&relation.tags, "type") {
        Some(value) => value == "multipolygon" || value == "boundary",
        None => false,
    }
}

/// Handler wiring the relations manager to the area assembler: keeps
/// multipolygon and boundary relations, tracks only their way members
/// and assembles an area as each relation completes.
///
/// The relation filter is replaceable for other tagging policies.
pub struct MultipolygonHandler {
    assembler: Assembler,
    filter: RelationFilter,
}

impl MultipolygonHandler {
    pub fn new() -> MultipolygonHandler {
        MultipolygonHandler {
            assembler: Assembler::new(),
            filter: Box::new(default_filter),
        }
    }

    pub fn with_filter<F>(filter: F) -> MultipolygonHandler
    where
        F: Fn(&Relation) -> bool + 'static,
    {
        MultipolygonHandler {
            assembler: Assembler::new(),
            filter: Box::new(filter),
        }
    }

    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    pub fn assembler_mut(&mut self) -> &mut Assembler {
        &mut self.assembler
    }

    pub fn problems(&self) -> &[Problem] {
        self.assembler.problems()
    }
}

impl Default for MultipolygonHandler {
    fn default() -> MultipolygonHandler {
        MultipolygonHandler::new()
    }
}

impl RelationsHandler for MultipolygonHandler {
    fn select_relation(&mut self, relation: &Relation) -> bool {
        (self.filter)(relation)
    }

    fn select_member(&mut self, _relation: &Relation, member: &Member, _n: usize) -> bool {
        member.item_type == ItemType::Way
    }

    fn complete_relation(
        &mut self,
        relation: &Relation,
        members: &CompletedMembers,
        output: &mut OutputBuffer,
    ) {
        let ways: Vec<&Way> = members.ways().collect();
        self.assembler.assemble(relation, &ways, output);
    }
}

pub type MultipolygonManager = RelationsManager<MultipolygonHandler>;
