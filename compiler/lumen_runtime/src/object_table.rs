//! Generational slot table for native objects.
//!
//! A [`HandleId`] names a slot and the generation it was issued for. Removing
//! an object bumps the slot's generation, so stale ids never reach a newer
//! occupant of the same slot.

use std::fmt;

/// Id of an object in an [`ObjectTable`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct HandleId {
    index: u32,
    generation: u32,
}

impl HandleId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct ObjectTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for ObjectTable<T> {
    fn default() -> Self {
        ObjectTable {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> ObjectTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, reusing a released slot when one is available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots are live at once.
    pub fn insert(&mut self, value: T) -> HandleId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return HandleId {
                index,
                generation: slot.generation,
            };
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("object table is full")
        };
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        HandleId {
            index,
            generation: 0,
        }
    }

    fn slot(&self, id: HandleId) -> Option<&Slot<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    pub fn get(&self, id: HandleId) -> Option<&T> {
        self.slot(id).and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: HandleId) -> bool {
        self.get(id).is_some()
    }

    /// Release the object. Returns `None` for stale or unknown ids.
    pub fn remove(&mut self, id: HandleId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandleId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            let index = u32::try_from(index).ok()?;
            Some((
                HandleId {
                    index,
                    generation: slot.generation,
                },
                value,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_stale_id_is_rejected_after_reuse() {
        let mut table = ObjectTable::new();
        let first = table.insert("a");
        assert_eq!(table.remove(first), Some("a"));
        let second = table.insert("b");
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert_eq!(table.get(first), None);
        assert_eq!(table.get(second), Some(&"b"));
        assert_eq!(table.remove(first), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_double_remove_is_harmless() {
        let mut table = ObjectTable::new();
        let id = table.insert(1);
        assert_eq!(table.remove(id), Some(1));
        assert_eq!(table.remove(id), None);
        assert!(table.is_empty());
    }

    proptest! {
        #[test]
        fn live_ids_stay_valid(ops in proptest::collection::vec(any::<bool>(), 1..64)) {
            let mut table = ObjectTable::new();
            let mut live = Vec::new();
            for (n, insert) in ops.into_iter().enumerate() {
                if insert || live.is_empty() {
                    live.push((table.insert(n), n));
                } else {
                    let (id, value) = live.remove(0);
                    prop_assert_eq!(table.remove(id), Some(value));
                    prop_assert!(!table.contains(id));
                }
                prop_assert_eq!(table.len(), live.len());
                for (id, value) in &live {
                    prop_assert_eq!(table.get(*id), Some(value));
                }
            }
        }
    }
}
