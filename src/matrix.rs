//! Column/row builder and matrix lifecycle — components D and G.
//!
//! `Matrix` is the level scratchpad of §3: it exists only between
//! [`Matrix::construct`]'s internal `resetMatrix` and `clearMatrix`, which is
//! why `construct` is the crate's only public entry point rather than
//! exposing the individual phases (§4.G).

use crate::adapters::{Frame, Gausser, Polynomial, Ring, System};
use crate::error::{Error, Result};
use crate::hash_table::MonomialHashTable;
use crate::monomial::{ColumnState, MonomialArena, MonomialHandle, MonomialPtr, MonomialView};
use crate::reduce::{self, ReductionMode};
use crate::sort;
use tracing::{debug, info_span, trace};

/// Row-processed progress events fire every this-many rows, matching the
/// source's `trace_level >= 4` threshold (§10.2).
const PROGRESS_INTERVAL: usize = 5_000;

/// One matrix row (§3 "Row"): a lead term owned by the arena, an ascending
/// (once sorted) sequence of column indices, and a parallel coefficient
/// vector.
pub struct Row<G: Gausser> {
    pub lead_term: MonomialPtr,
    pub components: Vec<usize>,
    pub coeffs: G::CoeffVec,
}

/// The level scratchpad for one `(level, degree)` construction (§3 "Level
/// scratchpad (matrix)").
pub struct Matrix<S: System> {
    pub(crate) level: i64,
    pub(crate) degree: i32,
    pub(crate) arena: MonomialArena,
    pub(crate) table: MonomialHashTable,
    pub(crate) columns: Vec<MonomialPtr>,
    pub(crate) reducers: Vec<Row<S::Gausser>>,
    pub(crate) spairs: Vec<Row<S::Gausser>>,
    pub(crate) spair_components: Vec<usize>,
    next_reducer_to_process: usize,
}

struct ProductResult {
    column: Option<usize>,
    sign: i32,
}

impl<S: System> Matrix<S> {
    /// `resetMatrix(ℓ, d)` (§4.G): records the bidegree, and prepares an
    /// empty arena/table for a fresh construction.
    fn reset(ring: &S::Ring, level: i64, degree: i32) -> Self {
        Matrix {
            level,
            degree,
            arena: MonomialArena::new(),
            table: MonomialHashTable::new(ring.nvars()),
            columns: Vec::new(),
            reducers: Vec::new(),
            spairs: Vec::new(),
            spair_components: Vec::new(),
            next_reducer_to_process: 0,
        }
    }

    /// `clearMatrix` (§4.G): deallocates coefficient vectors, empties every
    /// per-degree vector, then resets the hash table and the arena, in that
    /// order — columns/reducers/spairs (which borrow arena pointers) must be
    /// torn down before the arena itself is reset (§3 "Ownership").
    fn clear(mut self) {
        self.reducers.clear();
        self.spairs.clear();
        self.columns.clear();
        self.spair_components.clear();
        self.table.reset();
        self.arena.reset();
    }

    /// The only public entry point (§4.G): sequences
    /// `resetMatrix → makeMatrix → reorderColumns → gaussReduce → clearMatrix`
    /// for one `(level, degree)` pair and writes the resulting syzygies back
    /// into the frame.
    pub fn construct(
        ring: &S::Ring,
        gausser: &S::Gausser,
        frame: &S::Frame,
        level: i64,
        degree: i32,
        mode: ReductionMode,
    ) -> Result<()> {
        let span = info_span!("construct", level, degree);
        let _enter = span.enter();

        let mut matrix = Self::reset(ring, level, degree);
        let result = (|| {
            let t0 = std::time::Instant::now();
            matrix.make_matrix(ring, frame, gausser)?;
            debug!(elapsed_ms = t0.elapsed().as_secs_f64() * 1e3, "makeMatrix done");

            let t1 = std::time::Instant::now();
            sort::reorder_columns(&mut matrix, ring, frame)?;
            debug!(
                elapsed_ms = t1.elapsed().as_secs_f64() * 1e3,
                ncols = matrix.columns.len(),
                nspairs = matrix.spairs.len(),
                "reorderColumns done"
            );

            let t2 = std::time::Instant::now();
            reduce::gauss_reduce(&mut matrix, ring, gausser, frame, mode)?;
            debug!(elapsed_ms = t2.elapsed().as_secs_f64() * 1e3, "gaussReduce done");
            Ok(())
        })();

        matrix.clear();
        result
    }

    /// `makeMatrix` (§4.D): seed S-pair rows from the frame, then close
    /// reducer rows to a fixed point.
    fn make_matrix(&mut self, ring: &S::Ring, frame: &S::Frame, gausser: &S::Gausser) -> Result<()> {
        let nvars = ring.nvars();
        let len = ring.monomial_len();

        // Phase 1: seed S-pair rows from frame[level] elements of this degree.
        let level_elems = frame.level(self.level);
        for (comp, elem) in level_elems.iter().enumerate() {
            if elem.degree != self.degree {
                continue;
            }
            let handle = self.arena.reserve(len)?;
            self.arena.slots_mut(handle).copy_from_slice(&elem.lead);
            let lead_term = self.arena.intern(handle);

            let mut row = Row {
                lead_term,
                components: Vec::new(),
                coeffs: gausser.allocate(),
            };
            self.load_row(&mut row, ring, frame, gausser, nvars)?;
            self.spairs.push(row);
            self.spair_components.push(comp);
        }

        // Phase 2: close reducer rows to a fixed point. `loadRow` may append
        // new columns (and hence new reducer rows), so the frontier walk
        // keeps going until it catches up with `self.columns.len()`.
        while self.next_reducer_to_process < self.columns.len() {
            let idx = self.next_reducer_to_process;
            // Swap the row out so `loadRow`'s pushes into `self.reducers`
            // (which may reallocate the backing `Vec`) never alias a
            // reference held into it (§9 "Vector-append invalidation").
            let placeholder = Row {
                lead_term: self.columns[idx],
                components: Vec::new(),
                coeffs: gausser.allocate(),
            };
            let mut row = std::mem::replace(&mut self.reducers[idx], placeholder);
            self.load_row(&mut row, ring, frame, gausser, nvars)?;
            self.reducers[idx] = row;
            self.next_reducer_to_process += 1;
            if self.next_reducer_to_process % PROGRESS_INTERVAL == 0 {
                trace!(
                    rows_processed = self.next_reducer_to_process,
                    ncols = self.columns.len(),
                    "reducer rows in progress"
                );
            }
        }
        Ok(())
    }

    /// `loadRow(r)` (§4.D.1): fill in the expansion of
    /// `r.lead_term · element.syzygy`, where
    /// `element = frame[level - 1][component(r.lead_term)]`.
    fn load_row(
        &mut self,
        row: &mut Row<S::Gausser>,
        ring: &S::Ring,
        frame: &S::Frame,
        gausser: &S::Gausser,
        nvars: usize,
    ) -> Result<()> {
        let lead_words = self.arena.view(row.lead_term, nvars).as_words().to_vec();
        let component = MonomialView::from_slots(&lead_words).component();
        let element = &frame.level(self.level - 1)[component];

        if element.degree == self.degree {
            // Skeleton case: exactly one nonzero entry.
            let n_words = element.lead.clone();
            let prod = self.process_monomial_product(ring, frame, gausser, &lead_words, &n_words)?;
            match prod.column {
                Some(col) => {
                    row.components.push(col);
                    match prod.sign {
                        1 => gausser.push_back_one(&mut row.coeffs),
                        -1 => gausser.push_back_minus_one(&mut row.coeffs),
                        _ => unreachable!("a promoted column always carries a nonzero sign"),
                    }
                }
                None => {
                    if prod.sign != 0 {
                        return Err(Error::ExpectedMonomialToLive {
                            level: self.level as u32,
                            degree: self.degree,
                            component,
                        });
                    }
                    // Skew sign zero: the row is legally empty (§4.D.1).
                }
            }
        } else {
            // General case: iterate the terms of element.syzygy.
            let syzygy_guard = element.syzygy.lock();
            let syzygy = syzygy_guard
                .as_ref()
                .expect("frame element consulted by loadRow must already have a syzygy");
            let terms: Vec<(Vec<i32>, usize)> = syzygy
                .terms()
                .map(|(m, i)| (m.to_vec(), i))
                .collect();
            for (n_words, coeff_idx) in terms {
                let prod = self.process_monomial_product(ring, frame, gausser, &lead_words, &n_words)?;
                if let Some(col) = prod.column {
                    row.components.push(col);
                    if prod.sign < 0 {
                        gausser.push_back_negated_element(&mut row.coeffs, syzygy.coeffs(), coeff_idx);
                    } else {
                        gausser.push_back_element(&mut row.coeffs, syzygy.coeffs(), coeff_idx);
                    }
                }
                // prod.column == None: skew-annihilated or no reducer; skip.
            }
        }
        Ok(())
    }

    /// `process_monomial_product(m, n)` (§4.D.2).
    fn process_monomial_product(
        &mut self,
        ring: &S::Ring,
        frame: &S::Frame,
        gausser: &S::Gausser,
        m_words: &[i32],
        n_words: &[i32],
    ) -> Result<ProductResult> {
        let m = MonomialView::from_slots(m_words);
        let n = MonomialView::from_slots(n_words);
        let x = n.component();

        let parent = &frame.level(self.level - 2)[x];
        if parent.begin >= parent.end {
            return Ok(ProductResult {
                column: None,
                sign: 1,
            });
        }

        let sign = if ring.is_skew_commutative() {
            ring.skew_mult_sign(m, n)
        } else {
            1
        };
        if sign == 0 {
            return Ok(ProductResult {
                column: None,
                sign: 0,
            });
        }

        let len = ring.monomial_len();
        let handle = self.arena.reserve(len)?;
        {
            let scratch = self.arena.slots_mut(handle);
            ring.unchecked_mult(m, n, scratch);
            scratch[1] = x as i32; // re-set the component field, per §4.D.2 step 2
        }

        let column = self.process_current_monomial(ring, frame, gausser, handle)?;
        Ok(ProductResult { column, sign })
    }

    /// `process_current_monomial` (§4.D.3).
    fn process_current_monomial(
        &mut self,
        ring: &S::Ring,
        frame: &S::Frame,
        gausser: &S::Gausser,
        handle: MonomialHandle,
    ) -> Result<Option<usize>> {
        let nvars = ring.nvars();
        let candidate_view = self.arena.view_handle(handle, nvars);

        if let Some(existing) = self.table.find(&self.arena, candidate_view) {
            // Already present: no intern. The reserved region is simply
            // overwritten by the next `reserve` (§4.D.3, §9). A hit must
            // already carry a final state (`Column` or `NoDivisor`) — every
            // insertion resolves its state before `process_current_monomial`
            // returns, so finding `Unprocessed` here means some other path
            // registered the monomial without classifying it (§8 invariant 4).
            return match self.table.state(existing) {
                ColumnState::Column(k) => Ok(Some(k)),
                ColumnState::NoDivisor => Ok(None),
                ColumnState::Unprocessed => Err(Error::BackPointerInconsistent {
                    offset: existing.0,
                    detail: "hash table hit on a monomial still marked Unprocessed",
                }),
            };
        }

        // New: commit its bytes, then search for a divisor.
        let canonical = self.arena.intern(handle);
        self.table.insert(&self.arena, canonical)?;

        let canonical_words = self.arena.view(canonical, nvars).as_words().to_vec();
        let divisor_len = ring.monomial_len();
        let out_handle = self.arena.reserve(divisor_len)?;
        let found = {
            let view = MonomialView::from_slots(&canonical_words);
            let scratch = self.arena.slots_mut(out_handle);
            crate::divisor::find_divisor(ring, frame, self.level - 1, view, scratch)
        };

        match found {
            None => {
                self.table.set_state(canonical, ColumnState::NoDivisor);
                Ok(None)
            }
            Some(_j) => {
                let reducer_ptr = self.arena.intern(out_handle);
                let k = self.columns.len();
                self.table.set_state(canonical, ColumnState::Column(k));
                self.columns.push(canonical);
                self.reducers.push(Row {
                    lead_term: reducer_ptr,
                    components: Vec::new(),
                    coeffs: gausser.allocate(),
                });
                Ok(Some(k))
            }
        }
    }
}
