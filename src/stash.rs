use crate::elements::Element;
use std::fmt;
use std::mem::size_of;

/// Stable reference into an ItemStash. A handle stays valid across any
/// number of later add calls and is invalidated by remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemHandle(usize);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Slot arena holding immutable copies of selected elements. Removed
/// slots go on a free list and are reused by later adds.
pub struct ItemStash {
    slots: Vec<Option<Element>>,
    free: Vec<usize>,
}

impl ItemStash {
    pub fn new() -> ItemStash {
        ItemStash {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn add(&mut self, item: Element) -> ItemHandle {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(item);
                ItemHandle(slot)
            }
            None => {
                self.slots.push(Some(item));
                ItemHandle(self.slots.len() - 1)
            }
        }
    }

    /// Using a released or never-issued handle is a programming error.
    pub fn get(&self, handle: ItemHandle) -> &Element {
        match self.slots.get(handle.0) {
            Some(Some(item)) => item,
            _ => panic!("stale {}", handle),
        }
    }

    pub fn get_mut(&mut self, handle: ItemHandle) -> &mut Element {
        match self.slots.get_mut(handle.0) {
            Some(Some(item)) => item,
            _ => panic!("stale {}", handle),
        }
    }

    pub fn remove(&mut self, handle: ItemHandle) {
        match self.slots.get_mut(handle.0) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                self.free.push(handle.0);
            }
            _ => panic!("stale {}", handle),
        }
    }

    /// Number of items currently held.
    pub fn count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn used_memory(&self) -> usize {
        let mut total = self.slots.capacity() * size_of::<Option<Element>>();
        for slot in &self.slots {
            if let Some(item) = slot {
                total += item.byte_size();
            }
        }
        total
    }
}

impl Default for ItemStash {
    fn default() -> ItemStash {
        ItemStash::new()
    }
}
