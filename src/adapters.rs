//! External collaborator interfaces (§6, component H).
//!
//! These are deliberately narrow: the core never constructs a frame, never
//! implements ring arithmetic, and never owns a coefficient field. It only
//! calls through these traits. Mirrors the reference codebase's own
//! `ChainComplex` trait (`type Algebra`, `type Module`, `type Homomorphism`)
//! which bundles a family of associated types behind one trait rather than
//! threading three independent generic parameters through every function —
//! we do the same with [`System`], so the engine's public functions carry one
//! type parameter instead of four.

use crate::error::Result;
use crate::monomial::{MonomialView, HEADER_LEN};
use parking_lot::Mutex;
use std::cmp::Ordering;

/// Ring/monoid primitives (§6 "Ring / Monoid").
pub trait Ring {
    fn nvars(&self) -> usize;
    fn is_skew_commutative(&self) -> bool;

    /// Total word length of a packed monomial over this ring: the fixed
    /// three-word header plus one exponent per variable.
    fn monomial_len(&self) -> usize {
        HEADER_LEN + self.nvars()
    }

    /// Writes `m * n` into `out` (sized `monomial_len()`): sums exponents and
    /// components, and recomputes the hash word, per the "hash is a function
    /// of exponents and component, computed once when a monomial is built"
    /// rule in §3. The caller (component D) overwrites the component field
    /// immediately after, so what this writes there is only ever transient.
    fn unchecked_mult(&self, m: MonomialView, n: MonomialView, out: &mut [i32]);

    /// Sets `out = m / n` and returns `true` iff `n` divides `m`; on success
    /// zeroes the component field (the caller sets it to the real divisor
    /// index).
    fn divide(&self, m: MonomialView, n: MonomialView, out: &mut [i32]) -> bool;

    /// Compares `m * total_m` against `n * total_n` in the ring's monomial
    /// order; ties broken by the integer tie-breakers (smaller wins).
    fn compare_schreyer(
        &self,
        m: MonomialView,
        n: MonomialView,
        total_m: MonomialView,
        total_n: MonomialView,
        tie_m: i32,
        tie_n: i32,
    ) -> Ordering;

    /// Whether `m` is divisible by some variable whose index lies in
    /// `[lo, hi)`, used by the "only constant maps" pruning mode (§4.F).
    fn is_divisible_by_var_in_range(&self, m: MonomialView, lo: usize, hi: usize) -> bool;

    /// `{-1, 0, +1}`; only meaningful (and only ever called) when
    /// `is_skew_commutative()` is true.
    fn skew_mult_sign(&self, m: MonomialView, n: MonomialView) -> i32;
}

/// The coefficient adapter (§6 "Coefficient adapter (`ResGausser`)").
///
/// `Elt` is a single field element, used only for the dense scratch row.
/// `CoeffVec` is the opaque sparse coefficient vector carried by rows and by
/// a [`Polynomial`]'s terms.
pub trait Gausser {
    type Elt: Copy;
    type CoeffVec;

    fn zero_elt(&self) -> Self::Elt;
    fn is_zero(&self, e: &Self::Elt) -> bool;

    fn allocate(&self) -> Self::CoeffVec;
    /// Allocates the dense scratch row, sized to the matrix's column count.
    /// Fallible: an adapter backed by a real allocator reports exhaustion
    /// here rather than aborting (`Error::CoefficientAllocationFailed`).
    fn allocate_dense(&self, ncols: usize) -> Result<Vec<Self::Elt>>;

    fn push_back_one(&self, v: &mut Self::CoeffVec);
    fn push_back_minus_one(&self, v: &mut Self::CoeffVec);
    fn push_back_element(&self, v: &mut Self::CoeffVec, src: &Self::CoeffVec, idx: usize);
    fn push_back_negated_element(&self, v: &mut Self::CoeffVec, src: &Self::CoeffVec, idx: usize);

    fn coeff_len(&self, v: &Self::CoeffVec) -> usize;

    /// Scatter `coeffs` at `components` into `dense` (zero-initialized on
    /// entry to the row).
    fn scatter(&self, dense: &mut [Self::Elt], coeffs: &Self::CoeffVec, components: &[usize]);

    /// Cancel the pivot out of `dense` without recording a multiplier
    /// anywhere; returns the multiplier used.
    fn sparse_cancel(
        &self,
        dense: &mut [Self::Elt],
        pivot_coeffs: &Self::CoeffVec,
        pivot_components: &[usize],
    ) -> Self::Elt;

    /// As `sparse_cancel`, but also appends the (field-specific-negated)
    /// multiplier into `sink`.
    fn sparse_cancel_with_sink(
        &self,
        dense: &mut [Self::Elt],
        pivot_coeffs: &Self::CoeffVec,
        pivot_components: &[usize],
        sink: &mut Self::CoeffVec,
    ) -> Self::Elt;

    /// First nonzero column in `[start, end]`, or `end + 1` if none.
    fn next_nonzero(&self, dense: &[Self::Elt], start: usize, end: usize) -> usize;
}

/// A finished syzygy polynomial (§6 "Polynomial constructor" is the builder
/// side of this; this is the read side, needed by `loadRow`'s general case
/// to iterate `element.syzygy`'s terms).
pub trait Polynomial<G: Gausser> {
    /// Terms in construction order: packed monomial words (length
    /// `ring.monomial_len()`) paired with the term's index into
    /// [`coeffs`](Self::coeffs).
    fn terms(&self) -> Box<dyn Iterator<Item = (&[i32], usize)> + '_>;
    fn coeffs(&self) -> &G::CoeffVec;
}

/// Builds a polynomial one term at a time, in the order terms are pushed
/// (§6 "Polynomial constructor").
pub trait PolynomialBuilder<G: Gausser> {
    type Polynomial: Polynomial<G>;

    fn new(ring_monomial_len: usize) -> Self;
    fn append_monic_term(&mut self, lead: &[i32]);
    fn push_back_term(&mut self, monomial: &[i32]);
    /// The coefficient vector the caller should push this term's coefficient
    /// into immediately after `push_back_term`/`append_monic_term`.
    fn coeffs_mut(&mut self) -> &mut G::CoeffVec;
    fn build(self) -> Self::Polynomial;
}

/// One entry of a frame level (§6 "Frame").
///
/// `syzygy` is write-once: `None` until the core's `gaussReduce` finalizes
/// it, `Some` forever after. Interior mutability (rather than requiring
/// `&mut FrameElement`) matches the reference resolution driver's own
/// pattern of sharing frame/module data behind `Arc` while individual
/// write-once fields are `Mutex`-guarded (see e.g. `kernels:
/// OnceBiVec<Mutex<Option<Subspace>>>` in the reference `Resolution`).
pub struct FrameElement<P> {
    /// Packed monomial words, length `ring.monomial_len()`.
    pub lead: Vec<i32>,
    pub degree: i32,
    /// Half-open range into the next level down, consulted by divisor
    /// search (§4.C).
    pub begin: usize,
    pub end: usize,
    pub syzygy: Mutex<Option<P>>,
}

impl<P> FrameElement<P> {
    pub fn new(lead: Vec<i32>, degree: i32, begin: usize, end: usize) -> Self {
        Self {
            lead,
            degree,
            begin,
            end,
            syzygy: Mutex::new(None),
        }
    }

    pub fn lead_view(&self, nvars: usize) -> MonomialView<'_> {
        MonomialView::from_slots(&self.lead[..HEADER_LEN + nvars])
    }
}

/// The Schreyer order data for one level (§6 "`schreyer_order(ℓ)`").
pub struct SchreyerOrder {
    /// `total_monom[i]`: packed monomial words for frame element `i`.
    pub total_monom: Vec<Vec<i32>>,
    pub tie_breaker: Vec<i32>,
}

impl SchreyerOrder {
    pub fn total_monom_view(&self, i: usize, nvars: usize) -> MonomialView<'_> {
        MonomialView::from_slots(&self.total_monom[i][..HEADER_LEN + nvars])
    }
}

/// Read-only-during-construction, write-once-on-finalize frame access
/// (§6 "Frame").
pub trait Frame<G: Gausser> {
    type Polynomial: Polynomial<G>;

    fn level(&self, l: i64) -> &[FrameElement<Self::Polynomial>];
    fn schreyer_order(&self, l: i64) -> &SchreyerOrder;
}

/// Bundles one consistent choice of ring, coefficient adapter, polynomial
/// representation and frame, the way `ChainComplex` bundles `Algebra` +
/// `Module` + `Homomorphism` in the reference codebase.
pub trait System {
    type Ring: Ring;
    type Gausser: Gausser;
    type Polynomial: Polynomial<Self::Gausser>;
    type Builder: PolynomialBuilder<Self::Gausser, Polynomial = Self::Polynomial>;
    type Frame: Frame<Self::Gausser, Polynomial = Self::Polynomial>;
}
