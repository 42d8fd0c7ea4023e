use crate::check_order::CheckOrder;
use crate::elements::{Area, Element, ItemType, Member, Node, Relation, Way};
use crate::members_db::MembersDatabase;
use crate::output::OutputBuffer;
use crate::relations_db::{RelationHandle, RelationsDatabase};
use crate::stash::{ItemHandle, ItemStash};
use crate::Result;
use log::debug;
use std::fmt;

/// Policy and callbacks driving a RelationsManager. Implement
/// complete_relation and override the selection hooks as needed; all
/// other hooks default to no-ops.
pub trait RelationsHandler {
    /// Called in pass 1 for every relation, to decide whether to keep
    /// it. Keeping relations costs memory, so filter early.
    fn select_relation(&mut self, _relation: &Relation) -> bool {
        true
    }

    /// Called in pass 1 for every member of a kept relation. Members
    /// not selected here are never tracked.
    fn select_member(&mut self, _relation: &Relation, _member: &Member, _n: usize) -> bool {
        true
    }

    /// Called in pass 2 the moment the last selected member of a
    /// relation has been seen.
    fn complete_relation(
        &mut self,
        relation: &Relation,
        members: &CompletedMembers,
        output: &mut OutputBuffer,
    );

    fn before_node(&mut self, _node: &Node) {}
    fn node_not_in_any_relation(&mut self, _node: &Node) {}
    fn after_node(&mut self, _node: &Node) {}

    fn before_way(&mut self, _way: &Way) {}
    fn way_not_in_any_relation(&mut self, _way: &Way) {}
    fn after_way(&mut self, _way: &Way) {}

    fn before_relation(&mut self, _relation: &Relation) {}
    fn relation_not_in_any_relation(&mut self, _relation: &Relation) {}
    fn after_relation(&mut self, _relation: &Relation) {}
}

/// The collected members of a completed relation, indexed by member
/// position. Positions whose member was not selected in pass 1 are
/// None.
pub struct CompletedMembers<'a> {
    members: Vec<Option<&'a Element>>,
}

impl<'a> CompletedMembers<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, n: usize) -> Option<&'a Element> {
        self.members.get(n).copied().flatten()
    }

    /// The collected way members, in member order.
    pub fn ways(&self) -> impl Iterator<Item = &'a Way> + '_ {
        self.members.iter().filter_map(|member| match *member {
            Some(Element::Way(way)) => Some(way),
            _ => None,
        })
    }
}

/// Memory used by the manager's parts, in bytes.
pub struct MemoryUsage {
    pub relations_db: usize,
    pub members_db: usize,
    pub stash: usize,
}

impl MemoryUsage {
    pub fn total(&self) -> usize {
        self.relations_db + self.members_db + self.stash
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  relations: {:8} kB", self.relations_db / 1024)?;
        writeln!(f, "  members:   {:8} kB", self.members_db / 1024)?;
        writeln!(f, "  stash:     {:8} kB", self.stash / 1024)?;
        write!(f, "  total:     {:8} kB", self.total() / 1024)
    }
}

/// Two-pass orchestrator. Pass 1 reads relations and remembers the
/// selected ones and which members they need; pass 2 streams all
/// elements in canonical order, collects tracked members and fires
/// the handler's complete_relation as each relation resolves.
///
/// A pending relation moves through registered, partially resolved,
/// complete, released; releases happen as soon as the completion
/// callback returns, so memory stays bounded by the working set of
/// unresolved relations.
pub struct RelationsManager<H: RelationsHandler> {
    stash: ItemStash,
    relations_db: RelationsDatabase,
    member_nodes_db: MembersDatabase,
    member_ways_db: MembersDatabase,
    member_relations_db: MembersDatabase,
    output: OutputBuffer,
    check_order: CheckOrder,
    handler: H,
}

impl<H: RelationsHandler> RelationsManager<H> {
    pub fn new(handler: H) -> RelationsManager<H> {
        RelationsManager {
            stash: ItemStash::new(),
            relations_db: RelationsDatabase::new(),
            member_nodes_db: MembersDatabase::new(),
            member_ways_db: MembersDatabase::new(),
            member_relations_db: MembersDatabase::new(),
            output: OutputBuffer::new(),
            check_order: CheckOrder::new(),
            handler: handler,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn relations_db(&self) -> &RelationsDatabase {
        &self.relations_db
    }

    pub fn member_database(&self, item_type: ItemType) -> &MembersDatabase {
        match item_type {
            ItemType::Node => &self.member_nodes_db,
            ItemType::Way => &self.member_ways_db,
            ItemType::Relation => &self.member_relations_db,
        }
    }

    /// Set the callback invoked when the output buffer flushes.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Vec<Area>) + 'static,
    {
        self.output.set_callback(callback);
    }

    pub fn flush_output(&mut self) {
        self.output.flush();
    }

    /// Drain buffered area records, for drivers without a callback.
    pub fn read(&mut self) -> Vec<Area> {
        self.output.read()
    }

    /// Pass 1 entry point for a single relation.
    pub fn relation(&mut self, relation: &Relation) {
        if !self.handler.select_relation(relation) {
            return;
        }
        let rel_handle = self.relations_db.add(relation, &mut self.stash);
        for (n, member) in relation.members.iter().enumerate() {
            if self.handler.select_member(relation, member, n) {
                let db = match member.item_type {
                    ItemType::Node => &mut self.member_nodes_db,
                    ItemType::Way => &mut self.member_ways_db,
                    ItemType::Relation => &mut self.member_relations_db,
                };
                db.track(rel_handle, member.member_ref, n, &mut self.relations_db);
            } else {
                // mark not interesting in the stored copy
                let stored = self
                    .stash
                    .get_mut(self.relations_db.item_handle(rel_handle));
                if let Element::Relation(stored) = stored {
                    stored.members[n].member_ref = 0;
                }
            }
        }
    }

    /// Feed relations from an element stream through pass 1 and sort
    /// the member databases for lookup.
    pub fn first_pass<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = Element>,
    {
        for element in elements {
            if let Element::Relation(relation) = element {
                self.relation(&relation);
            }
        }
        self.prepare_for_lookup();
    }

    pub fn prepare_for_lookup(&mut self) {
        self.member_nodes_db.prepare_for_lookup();
        self.member_ways_db.prepare_for_lookup();
        self.member_relations_db.prepare_for_lookup();
    }

    pub fn handle_node(&mut self, node: &Node) {
        self.handler.before_node(node);
        let (matched, completed) = self.member_nodes_db.add(
            node.id,
            || Element::Node(node.clone()),
            &mut self.stash,
            &mut self.relations_db,
        );
        for rel_handle in completed {
            self.handle_complete_relation(rel_handle);
        }
        if !matched {
            self.handler.node_not_in_any_relation(node);
        }
        self.handler.after_node(node);
        self.output.possibly_flush();
    }

    pub fn handle_way(&mut self, way: &Way) {
        self.handler.before_way(way);
        let (matched, completed) = self.member_ways_db.add(
            way.id,
            || Element::Way(way.clone()),
            &mut self.stash,
            &mut self.relations_db,
        );
        for rel_handle in completed {
            self.handle_complete_relation(rel_handle);
        }
        if !matched {
            self.handler.way_not_in_any_relation(way);
        }
        self.handler.after_way(way);
        self.output.possibly_flush();
    }

    pub fn handle_relation(&mut self, relation: &Relation) {
        self.handler.before_relation(relation);
        let (matched, completed) = self.member_relations_db.add(
            relation.id,
            || Element::Relation(relation.clone()),
            &mut self.stash,
            &mut self.relations_db,
        );
        for rel_handle in completed {
            self.handle_complete_relation(rel_handle);
        }
        if !matched {
            self.handler.relation_not_in_any_relation(relation);
        }
        self.handler.after_relation(relation);
        self.output.possibly_flush();
    }

    fn handle_complete_relation(&mut self, rel_handle: RelationHandle) {
        let rel_item = self.relations_db.item_handle(rel_handle);
        let member_handles: Vec<Option<ItemHandle>> =
            self.relations_db.member_handles(rel_handle).to_vec();

        let (relation_id, member_refs) = {
            let stash = &self.stash;
            let relation = match stash.get(rel_item) {
                Element::Relation(relation) => relation,
                _ => panic!("{} does not reference a relation", rel_item),
            };
            let members = CompletedMembers {
                members: member_handles
                    .iter()
                    .map(|handle| handle.map(|h| stash.get(h)))
                    .collect(),
            };
            self.handler
                .complete_relation(relation, &members, &mut self.output);
            let member_refs: Vec<(ItemType, i64)> = relation
                .members
                .iter()
                .map(|m| (m.item_type, m.member_ref))
                .collect();
            (relation.id, member_refs)
        };
        self.output.possibly_flush();

        // tear down: stale tracking entries first, then the shared
        // member copies, finally the relation row itself
        for (item_type, member_ref) in &member_refs {
            if *member_ref == 0 {
                continue;
            }
            let db = match item_type {
                ItemType::Node => &mut self.member_nodes_db,
                ItemType::Way => &mut self.member_ways_db,
                ItemType::Relation => &mut self.member_relations_db,
            };
            db.remove(*member_ref, relation_id, &self.relations_db, &self.stash);
        }
        for (n, handle) in member_handles.iter().enumerate() {
            if handle.is_some() {
                let (item_type, member_ref) = member_refs[n];
                let db = match item_type {
                    ItemType::Node => &mut self.member_nodes_db,
                    ItemType::Way => &mut self.member_ways_db,
                    ItemType::Relation => &mut self.member_relations_db,
                };
                db.release(member_ref, &mut self.stash);
            }
        }
        self.relations_db.remove(rel_handle, &mut self.stash);
        debug!("released relation {}", relation_id);
    }

    /// Pass 2: consume all elements in canonical order, rejecting any
    /// ordering violation before it can touch the databases.
    pub fn second_pass<I>(&mut self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = Element>,
    {
        for element in elements {
            self.check_order.element(&element)?;
            match &element {
                Element::Node(node) => self.handle_node(node),
                Element::Way(way) => self.handle_way(way),
                Element::Relation(relation) => self.handle_relation(relation),
            }
        }
        self.flush_output();
        Ok(())
    }

    pub fn used_memory(&self) -> MemoryUsage {
        MemoryUsage {
            relations_db: self.relations_db.used_memory(),
            members_db: self.member_nodes_db.used_memory()
                + self.member_ways_db.used_memory()
                + self.member_relations_db.used_memory(),
            stash: self.stash.used_memory(),
        }
    }
}
