//! # Entity Arena
//!
//! Storage for every non-root entity of a tree. Entities are addressed by
//! [`EntityId`], a slot index paired with the slot's generation. Removing an
//! entity bumps its slot's generation, so ids held past a list shrink resolve
//! to nothing instead of to whichever entity reuses the slot.
//!
//! Index 0 is reserved for the root, which [`Data`](crate::Data) stores
//! outside the arena.

use crate::entity::node::Node;

/// Stable handle to an entity within one [`Data`](crate::Data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// The root entity of every tree.
    pub const ROOT: EntityId = EntityId { index: 0, generation: 0 };

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Arena {
    pub(crate) fn insert(&mut self, node: Node) -> EntityId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(slot_position(index)) {
                slot.node = Some(node);
                return EntityId { index, generation: slot.generation };
            }
        }
        self.slots.push(Slot { generation: 0, node: Some(node) });
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        EntityId { index, generation: 0 }
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Node> {
        if id.is_root() {
            return None;
        }
        self.slots
            .get(slot_position(id.index))
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        if id.is_root() {
            return None;
        }
        self.slots
            .get_mut(slot_position(id.index))
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Node> {
        if id.is_root() {
            return None;
        }
        let slot = self
            .slots
            .get_mut(slot_position(id.index))
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Number of live entities.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

fn slot_position(index: u32) -> usize {
    (index as usize).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::node::Node;
    use crate::schema::Schema;

    fn node() -> Node {
        Node::vacant(&Schema::text(), Some(EntityId::ROOT))
    }

    #[test]
    fn ids_never_collide_with_root() {
        let mut arena = Arena::default();
        let id = arena.insert(node());
        assert!(!id.is_root());
        assert!(arena.get(EntityId::ROOT).is_none());
        assert!(arena.get(id).is_some());
    }

    #[test]
    fn removed_ids_go_stale() {
        let mut arena = Arena::default();
        let first = arena.insert(node());
        assert!(arena.remove(first).is_some());
        assert!(arena.get(first).is_none());
        assert!(arena.remove(first).is_none());

        let reused = arena.insert(node());
        assert_ne!(first, reused);
        assert!(arena.get(first).is_none());
        assert!(arena.get(reused).is_some());
        assert_eq!(arena.len(), 1);
    }
}
