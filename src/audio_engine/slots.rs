//! Control-side bookkeeping for the mixer's sample bank.
//!
//! The audio thread only knows slot indices. [`SlotTable`] hands out
//! [`SoundHandle`]s that pair a slot with a generation counter, so a handle kept
//! after its sound was unloaded can never address whatever gets loaded into the
//! same slot later.

use crate::audio_engine::errors::AudioError;
use crate::soundboard::SoundHandle;

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    generation: u32,
    loaded: bool,
}

#[derive(Debug)]
pub struct SlotTable {
    slots: Vec<SlotState>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![SlotState::default(); capacity],
        }
    }

    /// Claims the lowest free slot and returns a fresh handle for it.
    pub fn allocate(&mut self) -> Result<SoundHandle, AudioError> {
        let capacity = self.slots.len();
        let (slot, state) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| !s.loaded)
            .ok_or(AudioError::SlotsExhausted(capacity))?;

        state.generation = state.generation.wrapping_add(1);
        state.loaded = true;
        Ok(SoundHandle::new(slot, state.generation))
    }

    /// Returns the slot index if `handle` is still the live occupant of its slot.
    pub fn resolve(&self, handle: SoundHandle) -> Result<usize, AudioError> {
        match self.slots.get(handle.slot()) {
            Some(state) if state.loaded && state.generation == handle.generation() => {
                Ok(handle.slot())
            }
            _ => Err(AudioError::StaleHandle(handle)),
        }
    }

    /// Frees the slot behind `handle`, returning its index.
    pub fn release(&mut self, handle: SoundHandle) -> Result<usize, AudioError> {
        let slot = self.resolve(handle)?;
        self.slots[slot].loaded = false;
        Ok(slot)
    }

    /// The handle for `slot` at `generation`, if that load is still live.
    ///
    /// Audio-thread reports name the generation they were produced for, so a
    /// report about an unloaded sample never maps onto a later occupant.
    pub fn live_handle(&self, slot: usize, generation: u32) -> Option<SoundHandle> {
        let handle = SoundHandle::new(slot, generation);
        self.resolve(handle).ok().map(|_| handle)
    }

    pub fn loaded(&self) -> usize {
        self.slots.iter().filter(|s| s.loaded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_uses_lowest_free_slot() {
        let mut table = SlotTable::new(4);
        let a = table.allocate().unwrap();
        let b = table.allocate().unwrap();

        assert_eq!(a.slot(), 0);
        assert_eq!(b.slot(), 1);
        assert_eq!(table.loaded(), 2);
    }

    #[test]
    fn test_released_handle_is_stale_after_reuse() {
        let mut table = SlotTable::new(1);
        let old = table.allocate().unwrap();
        table.release(old).unwrap();

        let new = table.allocate().unwrap();

        assert_eq!(old.slot(), new.slot());
        assert_ne!(old, new);
        assert!(matches!(table.resolve(old), Err(AudioError::StaleHandle(_))));
        assert_eq!(table.resolve(new).unwrap(), 0);
    }

    #[test]
    fn test_double_release_fails() {
        let mut table = SlotTable::new(2);
        let handle = table.allocate().unwrap();

        assert!(table.release(handle).is_ok());
        assert!(table.release(handle).is_err());
        assert_eq!(table.loaded(), 0);
    }

    #[test]
    fn test_exhausted() {
        let mut table = SlotTable::new(1);
        table.allocate().unwrap();

        assert!(matches!(
            table.allocate(),
            Err(AudioError::SlotsExhausted(1))
        ));
    }

    #[test]
    fn test_live_handle() {
        let mut table = SlotTable::new(2);
        let handle = table.allocate().unwrap();

        assert_eq!(table.live_handle(0, handle.generation()), Some(handle));
        assert_eq!(table.live_handle(1, 1), None);
        assert_eq!(table.live_handle(9, 1), None);
    }

    #[test]
    fn test_report_for_previous_occupant_is_not_live() {
        let mut table = SlotTable::new(1);
        let old = table.allocate().unwrap();
        table.release(old).unwrap();
        let new = table.allocate().unwrap();

        assert_eq!(table.live_handle(0, old.generation()), None);
        assert_eq!(table.live_handle(0, new.generation()), Some(new));
    }

    #[test]
    fn test_unknown_slot_is_stale() {
        let table = SlotTable::new(2);
        assert!(table.resolve(SoundHandle::new(5, 1)).is_err());
    }
}
