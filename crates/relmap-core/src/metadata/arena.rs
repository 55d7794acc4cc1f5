use serde::Serialize;
use std::fmt;

///
/// ArenaId
///
/// Slot index plus generation. A removed slot bumps its generation, so ids
/// handed out before the removal stop resolving.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ArenaId {
    index: u32,
    generation: u32,
}

impl ArenaId {
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub(crate) ArenaId);

        impl From<ArenaId> for $name {
            fn from(id: ArenaId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ArenaId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to an entity type.
    EntityTypeId
);
arena_id!(
    /// Handle to a property.
    PropertyId
);
arena_id!(
    /// Handle to a primary or alternate key.
    KeyId
);
arena_id!(ForeignKeyId);
arena_id!(IndexId);
arena_id!(
    /// Handle to a database function.
    FunctionId
);

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

///
/// Arena
///
/// Generational slot storage for metadata nodes. Freed slots are reused
/// lowest-index first so iteration order depends only on the sequence of
/// edits.
///

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> ArenaId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);

            return ArenaId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });

        ArenaId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, id: ArenaId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.len -= 1;

        // keep the free list sorted descending so pop() yields the lowest index
        let pos = self.free.partition_point(|&i| i > id.index);
        self.free.insert(pos, id.index);

        Some(value)
    }

    pub(crate) fn get(&self, id: ArenaId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: ArenaId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ArenaId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    ArenaId {
                        index: u32::try_from(index).unwrap_or(u32::MAX),
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_ids_stop_resolving_after_removal() {
        let mut arena = Arena::default();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));

        let b = arena.insert("b");
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn freed_slots_are_reused_lowest_first() {
        let mut arena = Arena::default();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(ids[3]);
        arena.remove(ids[1]);

        assert_eq!(arena.insert(10).index(), 1);
        assert_eq!(arena.insert(11).index(), 3);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn iteration_skips_vacant_slots() {
        let mut arena = Arena::default();
        let a = arena.insert('a');
        arena.insert('b');
        arena.remove(a);

        let values: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, ['b']);
    }
}
