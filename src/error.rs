//! Error type for the core. See `SPEC_FULL.md` §7 and §10.3.

use thiserror::Error;

/// The two disjoint error classes named in §7, realized as one enum with a
/// variant per concrete failure rather than two catch-all cases, so that a
/// caller inspecting an `Err` always learns *which* invariant broke.
#[derive(Error, Debug)]
pub enum Error {
    /// `loadRow`'s skeleton case expected a reducer to exist (the product of
    /// `r.lead_term` with a frame lead term should always land on a monomial
    /// with a divisor, in a non-skew ring) and it did not. Resolves the first
    /// open question of §9: treated as fatal rather than a silently-continued
    /// warning.
    #[error("expected monomial to live: component {component} at level {level}, degree {degree}")]
    ExpectedMonomialToLive {
        level: u32,
        degree: i32,
        component: usize,
    },

    /// After `reorderColumns` remaps a row's `components` through `ord`, the
    /// sequence was not strictly ascending (§8 invariant 1).
    #[error("row components not strictly ascending after remap: {row_kind} row {index}")]
    NonAscendingComponents { row_kind: &'static str, index: usize },

    /// A monomial's back-pointer (the tagged `ColumnState` replacing the
    /// source's `[-1]` slot, §9) disagrees with the role the caller expected
    /// it to have (§8 invariants 3 and 4).
    #[error("back-pointer inconsistent for monomial at arena offset {offset}: {detail}")]
    BackPointerInconsistent { offset: usize, detail: &'static str },

    /// The monomial arena could not grow to satisfy a `reserve`.
    #[error("monomial arena exhausted requesting {requested} words")]
    ArenaExhausted { requested: usize },

    /// The monomial hash table could not grow to satisfy an insert.
    #[error("monomial hash table exhausted at {entries} entries")]
    HashTableExhausted { entries: usize },

    /// The coefficient adapter failed to allocate a vector.
    #[error("coefficient vector allocation failed requesting length {requested}")]
    CoefficientAllocationFailed { requested: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
