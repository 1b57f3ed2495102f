use crate::edges::{EdgeId, Hyperedge};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    edge: Option<Hyperedge>,
}

/// Slot arena owning committed edges.
///
/// Retiring an edge bumps its slot's generation before the slot is reused,
/// so ids of retired edges stay dead.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EdgeArena {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, edge: Hyperedge) -> (EdgeId, &Hyperedge) {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                let slot = u32::try_from(self.slots.len()).expect("edge arena exceeds u32 slots");
                self.slots.push(Slot {
                    generation: 0,
                    edge: None,
                });
                slot
            }
        };
        self.len += 1;
        let entry = &mut self.slots[slot as usize];
        let id = EdgeId::new(slot, entry.generation);
        let stored: &Hyperedge = entry.edge.insert(edge);
        (id, stored)
    }

    pub(crate) fn get(&self, id: EdgeId) -> Option<&Hyperedge> {
        self.slots
            .get(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.edge.as_ref())
    }

    pub(crate) fn contains(&self, id: EdgeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn remove(&mut self, id: EdgeId) -> Option<Hyperedge> {
        let slot = self.slots.get_mut(id.slot() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let edge = slot.edge.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot());
        self.len -= 1;
        Some(edge)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (EdgeId, &Hyperedge)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            entry
                .edge
                .as_ref()
                .map(|edge| (EdgeId::new(slot as u32, entry.generation), edge))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::Exclude;
    use crate::nodes::NodeId;
    use smallvec::smallvec;

    fn edge() -> Hyperedge {
        Hyperedge::Exclude(Exclude::new(NodeId::next(), smallvec![NodeId::next()]))
    }

    #[test]
    fn retired_id_does_not_resolve_after_reuse() {
        let mut arena = EdgeArena::default();
        let (first, _) = arena.insert(edge());
        assert!(arena.remove(first).is_some());

        let (second, _) = arena.insert(edge());
        assert_eq!(first.slot(), second.slot());
        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
        assert!(arena.remove(first).is_none());
        assert!(arena.contains(second));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut arena = EdgeArena::default();
        let (a, _) = arena.insert(edge());
        let (b, _) = arena.insert(edge());
        let (c, _) = arena.insert(edge());
        arena.remove(b);

        let ids: Vec<_> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
