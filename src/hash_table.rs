//! Monomial hash table: the deduplicating intern map of §3/§4.B.

use crate::error::{Error, Result};
use crate::monomial::{ColumnState, MonomialArena, MonomialPtr, MonomialView};
use rustc_hash::FxHashMap;

/// Open-addressed table keyed by the monomial body (`component`, `degree`,
/// `exponents`) using the precomputed hash word. Stores canonical pointers;
/// each entry carries the small `ColumnState` header the source overloaded
/// into the `[-1]` slot (§9).
///
/// Lookup (`find`) and insertion (`insert`) are deliberately separate calls
/// rather than one `find_or_insert`, so that `process_current_monomial`
/// (§4.D.3) can probe a *reserved-but-uncommitted* candidate — "no intern;
/// the arena region is reused on the next product" only works if the lookup
/// never required committing it in the first place.
pub struct MonomialHashTable {
    /// Open-addressed slot array, sized to a power of two.
    slots: Vec<Option<MonomialPtr>>,
    /// Number of occupied slots.
    len: usize,
    /// Per-monomial header, keyed by arena offset (§9 back-pointer note).
    states: FxHashMap<MonomialPtr, ColumnState>,
    nvars: usize,
}

const INITIAL_CAPACITY: usize = 16;
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

impl MonomialHashTable {
    pub fn new(nvars: usize) -> Self {
        Self {
            slots: vec![None; INITIAL_CAPACITY],
            len: 0,
            states: FxHashMap::default(),
            nvars,
        }
    }

    fn slot_index(&self, hash: i32, cap: usize) -> usize {
        (hash as u32 as usize) & (cap - 1)
    }

    /// Look up a candidate (possibly not yet committed to the arena) by
    /// structural equality. Returns the canonical pointer on a hit.
    pub fn find(&self, arena: &MonomialArena, candidate: MonomialView<'_>) -> Option<MonomialPtr> {
        let mut idx = self.slot_index(candidate.hash(), self.slots.len());
        loop {
            match self.slots[idx] {
                None => return None,
                Some(existing) => {
                    if arena.view(existing, self.nvars) == candidate {
                        return Some(existing);
                    }
                    idx = (idx + 1) & (self.slots.len() - 1);
                }
            }
        }
    }

    /// Register a monomial already known (by a prior `find` miss) to be new.
    /// `ptr` must already be committed in `arena`.
    pub fn insert(&mut self, arena: &MonomialArena, ptr: MonomialPtr) -> Result<()> {
        if (self.len + 1) * LOAD_FACTOR_DEN > self.slots.len() * LOAD_FACTOR_NUM {
            self.grow(arena)?;
        }
        let hash = arena.view(ptr, self.nvars).hash();
        let cap = self.slots.len();
        let mut idx = self.slot_index(hash, cap);
        while self.slots[idx].is_some() {
            idx = (idx + 1) & (cap - 1);
        }
        self.slots[idx] = Some(ptr);
        self.len += 1;
        self.states.insert(ptr, ColumnState::Unprocessed);
        Ok(())
    }

    fn grow(&mut self, arena: &MonomialArena) -> Result<()> {
        let new_cap = self.slots.len() * 2;
        let mut new_slots: Vec<Option<MonomialPtr>> = Vec::new();
        new_slots
            .try_reserve(new_cap)
            .map_err(|_| Error::HashTableExhausted { entries: self.len })?;
        new_slots.resize(new_cap, None);

        for slot in self.slots.iter().flatten() {
            let hash = arena.view(*slot, self.nvars).hash();
            let mut idx = (hash as u32 as usize) & (new_cap - 1);
            while new_slots[idx].is_some() {
                idx = (idx + 1) & (new_cap - 1);
            }
            new_slots[idx] = Some(*slot);
        }
        self.slots = new_slots;
        Ok(())
    }

    pub fn state(&self, ptr: MonomialPtr) -> ColumnState {
        self.states
            .get(&ptr)
            .copied()
            .unwrap_or(ColumnState::Unprocessed)
    }

    pub fn set_state(&mut self, ptr: MonomialPtr, state: ColumnState) {
        self.states.insert(ptr, state);
    }

    /// Drops entries but retains capacity, per §4.B.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
