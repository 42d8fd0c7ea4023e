use crate::elements::{Element, Relation};
use crate::stash::{ItemHandle, ItemStash};
use std::fmt;
use std::mem::size_of;

/// Stable index of a pending relation in the relations database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationHandle(usize);

impl fmt::Display for RelationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel#{}", self.0)
    }
}

struct PendingRelation {
    handle: ItemHandle,
    pending_members: usize,
    // member handles by position in the relation, filled in as the
    // members stream by in the second pass
    member_handles: Vec<Option<ItemHandle>>,
    removed: bool,
}

/// All relations selected in the first pass, each with the count of
/// tracked members not yet seen. A row is never freed while its
/// pending count is above zero.
pub struct RelationsDatabase {
    rows: Vec<PendingRelation>,
}

impl RelationsDatabase {
    pub fn new() -> RelationsDatabase {
        RelationsDatabase { rows: Vec::new() }
    }

    /// Store a relation in the stash and open a row for it.
    pub fn add(&mut self, relation: &Relation, stash: &mut ItemStash) -> RelationHandle {
        let positions = relation.members.len();
        let handle = stash.add(Element::Relation(relation.clone()));
        self.rows.push(PendingRelation {
            handle: handle,
            pending_members: 0,
            member_handles: vec![None; positions],
            removed: false,
        });
        RelationHandle(self.rows.len() - 1)
    }

    fn row(&self, handle: RelationHandle) -> &PendingRelation {
        let row = &self.rows[handle.0];
        if row.removed {
            panic!("released {}", handle);
        }
        row
    }

    fn row_mut(&mut self, handle: RelationHandle) -> &mut PendingRelation {
        let row = &mut self.rows[handle.0];
        if row.removed {
            panic!("released {}", handle);
        }
        row
    }

    /// Register interest in one more member. Pass 1 only.
    pub fn track(&mut self, handle: RelationHandle) {
        self.row_mut(handle).pending_members += 1;
    }

    /// One tracked member arrived. Returns true iff the relation is now
    /// complete.
    pub fn complete(&mut self, handle: RelationHandle) -> bool {
        let row = self.row_mut(handle);
        assert!(row.pending_members > 0, "complete on settled {}", handle);
        row.pending_members -= 1;
        row.pending_members == 0
    }

    pub fn set_member_handle(
        &mut self,
        handle: RelationHandle,
        position: usize,
        member: ItemHandle,
    ) {
        self.row_mut(handle).member_handles[position] = Some(member);
    }

    pub fn item_handle(&self, handle: RelationHandle) -> ItemHandle {
        self.row(handle).handle
    }

    pub fn member_handles(&self, handle: RelationHandle) -> &[Option<ItemHandle>] {
        &self.row(handle).member_handles
    }

    pub fn pending_members(&self, handle: RelationHandle) -> usize {
        self.row(handle).pending_members
    }

    pub fn relation_id(&self, handle: RelationHandle, stash: &ItemStash) -> i64 {
        stash.get(self.row(handle).handle).id()
    }

    /// Release the stored relation and close the row.
    pub fn remove(&mut self, handle: RelationHandle, stash: &mut ItemStash) {
        let row = self.row_mut(handle);
        assert!(
            row.pending_members == 0,
            "remove of {} with pending members",
            handle
        );
        row.removed = true;
        row.member_handles.clear();
        row.member_handles.shrink_to_fit();
        stash.remove(row.handle);
    }

    /// Rows not yet released.
    pub fn count(&self) -> usize {
        self.rows.iter().filter(|r| !r.removed).count()
    }

    pub fn used_memory(&self) -> usize {
        let mut total = self.rows.capacity() * size_of::<PendingRelation>();
        for row in &self.rows {
            total += row.member_handles.capacity() * size_of::<Option<ItemHandle>>();
        }
        total
    }
}

impl Default for RelationsDatabase {
    fn default() -> RelationsDatabase {
        RelationsDatabase::new()
    }
}
