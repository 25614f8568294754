//! Sparse Gauss reducer (§4.F, component F) — the largest single piece of
//! the core. Eliminates each S-pair row against the reducer rows built by
//! [`crate::matrix::Matrix::construct`]'s `makeMatrix` phase, and finalizes
//! the resulting polynomial into the frame element that produced the S-pair.

use crate::adapters::{Frame, Gausser, PolynomialBuilder, Ring, System};
use crate::error::Result;
use crate::matrix::Matrix;
use tracing::trace;

/// Matches `crate::matrix::PROGRESS_INTERVAL` — the source's
/// `trace_level >= 4` periodic-progress threshold (§10.2), applied here to
/// S-pair rows rather than reducer rows.
const PROGRESS_INTERVAL: usize = 5_000;

/// The one knob a driver passes into [`crate::matrix::Matrix::construct`]
/// (§10.1 "Configuration surface"). `OnlyConstantMaps` is the source's
/// pruning flag, kept live and selectable rather than permanently wired off
/// (§10.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionMode {
    Full,
    OnlyConstantMaps,
}

/// `gaussReduce` (§4.F): reduces every S-pair row against the reducer rows,
/// writing the resulting syzygy into `frame.level(matrix.level)[comp].syzygy`
/// for each S-pair's frame index `comp`.
pub fn gauss_reduce<S: System>(
    matrix: &Matrix<S>,
    ring: &S::Ring,
    gausser: &S::Gausser,
    frame: &S::Frame,
    mode: ReductionMode,
) -> Result<()> {
    let nvars = ring.nvars();
    let ncols = matrix.columns.len();
    let mut dense = gausser.allocate_dense(ncols)?;

    // "only constant maps" pruning (§4.F): a reducer's lead is tracked iff
    // divisible by a variable in [v - level + 1, v), half-open on the upper
    // bound so it covers exactly {v - level + 1, .., v - 1} per §4.F's
    // inclusive range.
    let track: Vec<bool> = if mode == ReductionMode::OnlyConstantMaps {
        let v = nvars as i64;
        let lo = (v - matrix.level + 1).max(0) as usize;
        let hi = v.max(0) as usize;
        matrix
            .reducers
            .iter()
            .map(|r| {
                let lead = matrix.arena.view(r.lead_term, nvars);
                ring.is_divisible_by_var_in_range(lead, lo, hi)
            })
            .collect()
    } else {
        Vec::new()
    };

    for (i, s) in matrix.spairs.iter().enumerate() {
        let comp = matrix.spair_components[i];
        let lead = frame.level(matrix.level)[comp].lead.clone();

        let mut builder = S::Builder::new(ring.monomial_len());
        builder.append_monic_term(&lead);
        gausser.push_back_one(builder.coeffs_mut());

        if s.components.is_empty() {
            // Legal under skew-commutation (§4.F step 2): single-term syzygy.
            *frame.level(matrix.level)[comp].syzygy.lock() = Some(builder.build());
            continue;
        }

        gausser.scatter(&mut dense, &s.coeffs, &s.components);
        let last = ncols - 1;
        let mut first = s.components[0];

        while first <= last {
            let reducer = &matrix.reducers[first];
            let tracked = mode != ReductionMode::OnlyConstantMaps || track[first];

            if tracked {
                let reducer_lead = matrix.arena.view(reducer.lead_term, nvars).as_words().to_vec();
                builder.push_back_term(&reducer_lead);
                gausser.sparse_cancel_with_sink(
                    &mut dense,
                    &reducer.coeffs,
                    &reducer.components,
                    builder.coeffs_mut(),
                );
            } else {
                // Cancel for its side effect on `dense` only; untracked
                // pivots never reach the syzygy polynomial (§4.F, "only
                // constant maps").
                gausser.sparse_cancel(&mut dense, &reducer.coeffs, &reducer.components);
            }

            first = if first == last {
                last + 1
            } else {
                gausser.next_nonzero(&dense, first + 1, last)
            };
        }

        *frame.level(matrix.level)[comp].syzygy.lock() = Some(builder.build());

        if (i + 1) % PROGRESS_INTERVAL == 0 {
            trace!(rows_processed = i + 1, nspairs = matrix.spairs.len(), "gauss reduce in progress");
        }
    }

    trace!(nspairs = matrix.spairs.len(), ncols, "gauss reduce complete");
    Ok(())
}
