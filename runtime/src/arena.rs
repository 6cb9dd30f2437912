use std::sync::{
    Mutex,
    PoisonError,
};

use message::StationId;

const SLOTS: usize = StationId::MAX as usize + 1;

/// One lazily-filled slot per possible station id, each behind its own lock,
/// so work on one station never waits on another.
#[derive(Debug)]
pub(crate) struct StationArena<T> {
    slots: Box<[Mutex<Option<T>>]>,
}

impl<T> StationArena<T> {
    pub fn new() -> Self {
        Self {
            slots: (0..SLOTS).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// Run `f` with exclusive access to `station`'s slot.
    #[inline]
    pub fn with<R>(&self, station: StationId, f: impl FnOnce(&mut Option<T>) -> R) -> R {
        // slots hold plain data, a panic mid-update cannot leave them torn
        let mut slot =
            self.slots[usize::from(station)].lock().unwrap_or_else(PoisonError::into_inner);

        f(&mut slot)
    }

    pub fn stations(&self) -> Vec<StationId> {
        (0..=StationId::MAX).filter(|&id| self.with(id, |slot| slot.is_some())).collect()
    }
}

impl<T> Default for StationArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
