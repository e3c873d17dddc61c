//! Dense, order-preserving index table behind variables and constraints.
//!
//! Handles point at a generational slot. The slot stores the entity's current
//! backend index, and `order` maps index -> slot, so that
//! `order[slot.index] == key` holds for every live entity.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    name: String,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EntityTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<EntityKey>,
    names: HashSet<String>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_name_available(&self, name: &str) -> bool {
        !name.is_empty() && !self.names.contains(name)
    }

    /// Register an entity the backend just appended at `index`.
    pub fn insert(&mut self, name: &str, index: usize) -> EntityKey {
        assert_eq!(
            index,
            self.order.len(),
            "backend index out of step with the entity table"
        );
        let entry = Entry {
            index,
            name: name.to_string(),
        };
        let key = match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.entry = Some(entry);
                EntityKey {
                    slot,
                    generation: s.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                EntityKey { slot, generation: 0 }
            }
        };
        self.order.push(key);
        self.names.insert(name.to_string());
        key
    }

    fn entry(&self, key: EntityKey) -> Option<&Entry> {
        self.slots
            .get(key.slot as usize)
            .filter(|s| s.generation == key.generation)
            .and_then(|s| s.entry.as_ref())
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entry(key).is_some()
    }

    pub fn index_of(&self, key: EntityKey) -> Option<usize> {
        self.entry(key).map(|e| e.index)
    }

    pub fn name_of(&self, key: EntityKey) -> Option<&str> {
        self.entry(key).map(|e| e.name.as_str())
    }

    pub fn key_at(&self, index: usize) -> Option<EntityKey> {
        self.order.get(index).copied()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = EntityKey> + '_ {
        self.order.iter().copied()
    }

    /// Unregister an entity whose backend column/row was already deleted.
    ///
    /// Frees the name, retires the handle and shifts every later entity
    /// down by one. Returns the index the entity held.
    pub fn remove(&mut self, key: EntityKey) -> Option<usize> {
        let slot = self
            .slots
            .get_mut(key.slot as usize)
            .filter(|s| s.generation == key.generation)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.slot);
        self.names.remove(&entry.name);

        let removed = self.order.remove(entry.index);
        debug_assert_eq!(removed, key);
        for position in entry.index..self.order.len() {
            let later = self.order[position];
            if let Some(e) = self.slots[later.slot as usize].entry.as_mut() {
                e.index = position;
            }
        }
        Some(entry.index)
    }
}
