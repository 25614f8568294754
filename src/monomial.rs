//! Packed monomials and the arena that owns their storage.
//!
//! Component A of `SPEC_FULL.md` §4.A. A monomial is a contiguous run of
//! `i32` words in the arena:
//!
//! ```text
//! [hash, component, degree, exponent_0, .., exponent_{v-1}]
//! ```
//!
//! This collapses the source's `[-1, 0, 1, 2, 3..]` negative-indexed layout
//! into plain `0..` indexing — the `[-1]` divisor back-pointer is not stored
//! inline at all; per §9's "Back-pointer in `[-1]` slot" design note it lives
//! in a side table (`ColumnState`, below) keyed by the monomial's arena
//! offset, so the packed words here are exactly the part compared for
//! structural equality.

use crate::error::{Error, Result};
use std::hash::{Hash, Hasher};

/// Fixed header length before the exponent vector: `[hash, component, degree]`.
pub const HEADER_LEN: usize = 3;

/// Offset of a monomial's first word inside the arena buffer. Doubles as the
/// key into the `ColumnState` side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialPtr(pub(crate) usize);

/// A reserved-but-not-yet-committed region of the arena, returned by
/// [`MonomialArena::reserve`]. Writing into it through [`MonomialArena::slots_mut`]
/// is how a monomial's words are produced; calling [`MonomialArena::intern`]
/// commits it. A handle that is never interned is silently overwritten by the
/// arena's next `reserve` call.
#[derive(Debug, Clone, Copy)]
pub struct MonomialHandle {
    offset: usize,
    len: usize,
}

/// A borrowed, read-only view of a monomial's words, sized to a known number
/// of variables. Two views are structurally equal iff their `component`,
/// `degree` and `exponents` agree — the precomputed `hash` word is never
/// itself compared, mirroring the reference codebase's own pattern of basis
/// elements whose `Eq`/`Hash` impls look past fields that don't participate
/// in identity (see e.g. `MilnorBasisElement`, which hashes `p_part`/`q_part`
/// but not `degree`).
#[derive(Debug, Clone, Copy)]
pub struct MonomialView<'a> {
    slots: &'a [i32],
}

impl<'a> MonomialView<'a> {
    /// Builds a view directly over externally-owned words (used by
    /// [`crate::adapters::FrameElement`] and [`crate::adapters::SchreyerOrder`],
    /// whose monomials are not arena-backed).
    pub fn from_slots(slots: &'a [i32]) -> Self {
        Self { slots }
    }

    pub fn hash(&self) -> i32 {
        self.slots[0]
    }

    pub fn component(&self) -> usize {
        self.slots[1] as usize
    }

    pub fn degree(&self) -> i32 {
        self.slots[2]
    }

    pub fn exponents(&self) -> &'a [i32] {
        &self.slots[HEADER_LEN..]
    }

    pub fn nvars(&self) -> usize {
        self.slots.len() - HEADER_LEN
    }

    /// The full word sequence `[hash, component, degree, exponents..]`, for
    /// callers that need an owned copy to outlive a borrow of the arena it
    /// came from (e.g. before reserving new arena space).
    pub fn as_words(&self) -> &'a [i32] {
        self.slots
    }
}

impl<'a> PartialEq for MonomialView<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.component() == other.component()
            && self.degree() == other.degree()
            && self.exponents() == other.exponents()
    }
}
impl<'a> Eq for MonomialView<'a> {}

impl<'a> Hash for MonomialView<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.component().hash(state);
        self.degree().hash(state);
        self.exponents().hash(state);
    }
}

/// The tagged replacement for the source's overloaded `[-1]` slot (§9
/// "Back-pointer in `[-1]` slot"): a monomial known to the hash table is
/// either not yet classified, known to have no divisor, or promoted to a
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    Unprocessed,
    NoDivisor,
    Column(usize),
}

impl ColumnState {
    pub fn column_index(self) -> Option<usize> {
        match self {
            ColumnState::Column(k) => Some(k),
            _ => None,
        }
    }
}

/// Append-only bump allocator for packed monomial words (§3 "Monomial
/// arena", §4.A).
///
/// Invariant: any [`MonomialPtr`] returned by [`MonomialArena::intern`]
/// remains valid to read (via [`MonomialArena::view`]) until the next
/// [`MonomialArena::reset`].
pub struct MonomialArena {
    buf: Vec<i32>,
    committed: usize,
}

impl MonomialArena {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            committed: 0,
        }
    }

    /// Reserve `len` words at the current frontier without advancing it.
    /// Returns a handle usable with [`slots_mut`](Self::slots_mut) and
    /// [`intern`](Self::intern). Calling `reserve` again before `intern`
    /// discards the previous handle's contents.
    pub fn reserve(&mut self, len: usize) -> Result<MonomialHandle> {
        let needed = self.committed + len;
        if self.buf.len() < needed {
            let extra = needed - self.buf.len();
            self.buf
                .try_reserve(extra)
                .map_err(|_| Error::ArenaExhausted { requested: len })?;
            self.buf.resize(needed, 0);
        }
        Ok(MonomialHandle {
            offset: self.committed,
            len,
        })
    }

    /// Mutable access to a reserved-but-uncommitted region.
    pub fn slots_mut(&mut self, handle: MonomialHandle) -> &mut [i32] {
        &mut self.buf[handle.offset..handle.offset + handle.len]
    }

    /// Commit the most recent `reserve`, advancing the frontier and yielding
    /// a stable pointer to the just-written words.
    pub fn intern(&mut self, handle: MonomialHandle) -> MonomialPtr {
        debug_assert_eq!(
            handle.offset, self.committed,
            "intern called on a handle superseded by a later reserve"
        );
        self.committed = handle.offset + handle.len;
        MonomialPtr(handle.offset)
    }

    /// Read-only view of a committed monomial. `nvars` is supplied by the
    /// caller (the arena itself is variable-count agnostic).
    pub fn view(&self, ptr: MonomialPtr, nvars: usize) -> MonomialView<'_> {
        MonomialView {
            slots: &self.buf[ptr.0..ptr.0 + HEADER_LEN + nvars],
        }
    }

    /// Read-only view of a reserved-but-not-yet-committed region. Lets a
    /// caller inspect a just-built candidate (e.g. to hash-table-lookup it)
    /// before deciding whether to `intern` it at all (§4.D.3).
    pub fn view_handle(&self, handle: MonomialHandle, nvars: usize) -> MonomialView<'_> {
        debug_assert_eq!(handle.len, HEADER_LEN + nvars);
        MonomialView {
            slots: &self.buf[handle.offset..handle.offset + handle.len],
        }
    }

    /// Release all regions. Every previously issued [`MonomialPtr`] is
    /// poisoned after this call.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.committed = 0;
    }

    /// Total committed words, exposed for the idempotent-clear scenario
    /// (§8 scenario 6).
    pub fn committed_len(&self) -> usize {
        self.committed
    }
}

impl Default for MonomialArena {
    fn default() -> Self {
        Self::new()
    }
}
