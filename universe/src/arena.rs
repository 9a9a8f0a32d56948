//! Fixed-capacity critter storage with identity-preserving compaction.

use frequon_core::{CritterId, Event, PixelPoint};

use crate::{Critter, MAX_CRITTERS};

/// Backing store whose live critters occupy the prefix `[0, len)`.
///
/// Slot 0 holds the reference entity. Slots past the live prefix hold
/// garbage apart from their ids, which stay a permutation of
/// `0..MAX_CRITTERS` across every birth and cull.
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    slots: [Critter; MAX_CRITTERS],
    len: usize,
}

impl Arena {
    /// Creates storage with an empty live prefix.
    pub(crate) fn new() -> Self {
        Self {
            slots: std::array::from_fn(|index| Critter::vacant(slot_id(index))),
            len: 0,
        }
    }

    /// Reassigns ids by index and leaves only the reference entity live.
    pub(crate) fn reset(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            *slot = Critter::vacant(slot_id(index));
        }
        self.slots[0] = Critter::reference(slot_id(0));
        self.len = 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn live(&self) -> &[Critter] {
        &self.slots[..self.len]
    }

    pub(crate) fn aliens_mut(&mut self) -> &mut [Critter] {
        let len = self.len;
        &mut self.slots[1..len]
    }

    pub(crate) fn slots(&self) -> &[Critter] {
        &self.slots
    }

    /// Overwrites the reference entity with this frame's tracked position.
    pub(crate) fn place_reference(&mut self, position: PixelPoint) {
        let reference = &mut self.slots[0];
        reference.x = position.x();
        reference.y = position.y();
        reference.amplitude = crate::critter::REFERENCE_AMPLITUDE;
    }

    /// Removes every terminal alien from the live prefix.
    ///
    /// A terminal slot is swapped with the last live slot, so the survivor's
    /// record and id move together and the dead id lands just past the new
    /// end. The receiving slot is examined again before the scan advances.
    pub(crate) fn cull_terminal(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 1;
        while index < self.len {
            if !self.slots[index].vitality.is_terminal() {
                index += 1;
                continue;
            }

            let last = self.len - 1;
            let id = self.slots[index].id;
            self.slots.swap(index, last);
            self.len = last;
            tracing::debug!(id = id.get(), slot = index, "critter culled");
            out_events.push(Event::CritterCulled { id });
        }
    }

    /// Extends the live prefix by one slot and returns it for initialisation.
    ///
    /// `free_offset` selects which free slot donates its id; the id is swapped
    /// into the first free position, mirroring the cull discipline.
    pub(crate) fn admit(&mut self, free_offset: usize) -> &mut Critter {
        let first_free = self.len;
        let donor = first_free + free_offset;
        if donor >= MAX_CRITTERS {
            panic!(
                "arena overflow: len={} free_offset={free_offset} capacity={MAX_CRITTERS}",
                self.len
            );
        }

        let donor_id = self.slots[donor].id;
        self.slots[donor].id = self.slots[first_free].id;
        self.slots[first_free].id = donor_id;
        self.len = first_free + 1;
        &mut self.slots[first_free]
    }
}

fn slot_id(index: usize) -> CritterId {
    let value = u8::try_from(index).unwrap_or(u8::MAX);
    CritterId::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vitality;

    fn arena_with_aliens(count: usize) -> Arena {
        let mut arena = Arena::new();
        arena.reset();
        for _ in 0..count {
            let critter = arena.admit(0);
            critter.vitality = Vitality::newborn();
        }
        arena
    }

    fn sorted_ids(arena: &Arena) -> Vec<u8> {
        let mut ids: Vec<u8> = arena.slots().iter().map(|slot| slot.id.get()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn reset_leaves_only_reference_live() {
        let arena = arena_with_aliens(0);
        assert_eq!(arena.len(), 1);
        assert!(arena.live()[0].is_reference());
        let ids: Vec<u8> = arena.slots().iter().map(|slot| slot.id.get()).collect();
        let expected: Vec<u8> = (0..MAX_CRITTERS as u8).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn cull_moves_survivor_with_its_id() {
        let mut arena = arena_with_aliens(3);
        let survivor = arena.live()[3].id;
        let dead = arena.live()[1].id;
        arena.aliens_mut()[0].vitality = Vitality::Terminal;

        let mut events = Vec::new();
        arena.cull_terminal(&mut events);

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.live()[1].id, survivor);
        assert_eq!(arena.slots()[3].id, dead);
        assert_eq!(events, vec![Event::CritterCulled { id: dead }]);
    }

    #[test]
    fn cull_rechecks_swapped_in_slot() {
        let mut arena = arena_with_aliens(4);
        for critter in arena.aliens_mut().iter_mut().skip(1) {
            critter.vitality = Vitality::Terminal;
        }
        let keeper = arena.live()[1].id;

        let mut events = Vec::new();
        arena.cull_terminal(&mut events);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.live()[1].id, keeper);
        assert_eq!(events.len(), 3);
        assert_eq!(sorted_ids(&arena), (0..MAX_CRITTERS as u8).collect::<Vec<_>>());
    }

    #[test]
    fn cull_removes_every_alien_when_all_terminal() {
        let mut arena = arena_with_aliens(MAX_CRITTERS - 1);
        for critter in arena.aliens_mut() {
            critter.vitality = Vitality::Terminal;
        }

        let mut events = Vec::new();
        arena.cull_terminal(&mut events);

        assert_eq!(arena.len(), 1);
        assert_eq!(events.len(), MAX_CRITTERS - 1);
        assert!(arena.live()[0].is_reference());
    }

    #[test]
    fn admit_swaps_donor_id_into_first_free_slot() {
        let mut arena = arena_with_aliens(0);
        let donor = arena.slots()[5].id;
        let displaced = arena.slots()[1].id;

        let id = arena.admit(4).id;

        assert_eq!(id, donor);
        assert_eq!(arena.slots()[5].id, displaced);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "arena overflow")]
    fn admitting_past_capacity_is_fatal() {
        let mut arena = arena_with_aliens(MAX_CRITTERS - 1);
        let _ = arena.admit(0);
    }
}
