use crate::elements::Element;
use crate::relations_db::{RelationHandle, RelationsDatabase};
use crate::stash::{ItemHandle, ItemStash};
use std::collections::BTreeMap;
use std::mem::size_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedMember {
    member_id: i64,
    rel: RelationHandle,
    position: usize,
}

struct StoredMember {
    handle: ItemHandle,
    refs: usize,
}

/// Member lookup for one element kind. Pass 1 appends tracking entries;
/// prepare_for_lookup sorts them by member id; pass 2 consumes them as
/// the members stream by in ascending id order, so matching is a merge
/// walk.
///
/// A member element is copied into the stash once per id and the handle
/// shared between all relations referencing it; the copy is released
/// when the last of those relations is torn down.
pub struct MembersDatabase {
    tracked: Vec<TrackedMember>,
    stored: BTreeMap<i64, StoredMember>,
    sorted: bool,
}

impl MembersDatabase {
    pub fn new() -> MembersDatabase {
        MembersDatabase {
            tracked: Vec::new(),
            stored: BTreeMap::new(),
            sorted: true,
        }
    }

    /// Record that `rel` wants the element with id `member_id` at member
    /// position `position`. Pass 1 only.
    pub fn track(
        &mut self,
        rel: RelationHandle,
        member_id: i64,
        position: usize,
        relations: &mut RelationsDatabase,
    ) {
        self.tracked.push(TrackedMember {
            member_id: member_id,
            rel: rel,
            position: position,
        });
        relations.track(rel);
        self.sorted = false;
    }

    /// Sort tracking entries for the merge walk of pass 2. Calling this
    /// again without intervening tracks is a no-op.
    pub fn prepare_for_lookup(&mut self) {
        if !self.sorted {
            self.tracked
                .sort_by_key(|t| (t.member_id, t.rel, t.position));
            self.sorted = true;
        }
    }

    /// Offer an arriving element. `make` is only called, once, if some
    /// relation tracks this id. Returns whether anything matched and the
    /// handles of relations that became complete.
    pub fn add<F>(
        &mut self,
        id: i64,
        make: F,
        stash: &mut ItemStash,
        relations: &mut RelationsDatabase,
    ) -> (bool, Vec<RelationHandle>)
    where
        F: FnOnce() -> Element,
    {
        assert!(self.sorted, "add before prepare_for_lookup");
        let start = self.tracked.partition_point(|t| t.member_id < id);
        let mut end = start;
        while end < self.tracked.len() && self.tracked[end].member_id == id {
            end += 1;
        }
        if end == start {
            return (false, Vec::new());
        }

        let handle = stash.add(make());
        let mut completed = Vec::new();
        for entry in &self.tracked[start..end] {
            relations.set_member_handle(entry.rel, entry.position, handle);
            if relations.complete(entry.rel) {
                completed.push(entry.rel);
            }
        }
        self.stored.insert(
            id,
            StoredMember {
                handle: handle,
                refs: end - start,
            },
        );
        self.tracked.drain(start..end);
        (true, completed)
    }

    /// Erase tracking entries matching both ids. Used when tearing down
    /// a completed relation to drop entries that can no longer resolve.
    pub fn remove(
        &mut self,
        member_id: i64,
        relation_id: i64,
        relations: &RelationsDatabase,
        stash: &ItemStash,
    ) {
        self.tracked.retain(|t| {
            t.member_id != member_id || relations.relation_id(t.rel, stash) != relation_id
        });
    }

    /// Drop one reference to the stored copy of `member_id`, releasing
    /// the stash item when nothing references it any more.
    pub fn release(&mut self, member_id: i64, stash: &mut ItemStash) {
        let gone = match self.stored.get_mut(&member_id) {
            Some(stored) => {
                stored.refs -= 1;
                if stored.refs == 0 {
                    stash.remove(stored.handle);
                    true
                } else {
                    false
                }
            }
            None => panic!("release of untracked member {}", member_id),
        };
        if gone {
            self.stored.remove(&member_id);
        }
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn stored_count(&self) -> usize {
        self.stored.len()
    }

    pub fn used_memory(&self) -> usize {
        self.tracked.capacity() * size_of::<TrackedMember>()
            + self.stored.len() * (size_of::<i64>() + size_of::<StoredMember>())
    }
}

impl Default for MembersDatabase {
    fn default() -> MembersDatabase {
        MembersDatabase::new()
    }
}
