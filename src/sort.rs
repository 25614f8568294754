//! Schreyer column sorter (§4.E, component E).

use crate::adapters::{Frame, Gausser, Ring, System};
use crate::error::{Error, Result};
use crate::matrix::{Matrix, Row};
use tracing::trace;

/// `reorderColumns`: computes a stable permutation of `[0, ncols)` under the
/// Schreyer induced order at level `ℓ - 1`, then applies it to `columns`,
/// `reducers`, and every row's `components` sequence.
///
/// Only the direct Schreyer comparator is implemented here; the source's
/// second, independent "normalize then tiebreak" comparator and its runtime
/// cross-check are exercised only in tests (§9 "Two sort paths", §8 scenario
/// 4), not carried as production scaffolding.
pub fn reorder_columns<S: System>(
    matrix: &mut Matrix<S>,
    ring: &S::Ring,
    frame: &S::Frame,
) -> Result<()> {
    let ncols = matrix.columns.len();
    if ncols == 0 {
        return Ok(());
    }
    let nvars = ring.nvars();
    let schreyer = frame.schreyer_order(matrix.level - 1);

    let mut comparisons = 0u64;
    let mut order: Vec<usize> = (0..ncols).collect();
    order.sort_by(|&a, &b| {
        comparisons += 1;
        let ma = matrix.arena.view(matrix.columns[a], nvars);
        let mb = matrix.arena.view(matrix.columns[b], nvars);
        let ca = ma.component();
        let cb = mb.component();
        ring.compare_schreyer(
            ma,
            mb,
            schreyer.total_monom_view(ca, nvars),
            schreyer.total_monom_view(cb, nvars),
            schreyer.tie_breaker[ca],
            schreyer.tie_breaker[cb],
        )
    });
    trace!(comparisons, "column sort comparisons");

    // `ord[old_index] = new_index`, the inverse of `order`.
    let mut ord = vec![0usize; ncols];
    for (new_idx, &old_idx) in order.iter().enumerate() {
        ord[old_idx] = new_idx;
    }

    // Rebuild `columns` and `reducers` together under the permutation —
    // `reducers[k]` must remain the row whose pivot is column `k` (§3
    // "Level scratchpad").
    let old_columns = std::mem::take(&mut matrix.columns);
    let mut old_reducers = std::mem::take(&mut matrix.reducers);

    // `order[new_idx] = old_idx`; pull each new slot's column/reducer out of
    // the old vectors by index. `old_reducers` entries are taken with a
    // placeholder swap since `Row` has no cheap default to pre-fill a `Vec`.
    let mut new_columns = Vec::with_capacity(ncols);
    let mut new_reducers = Vec::with_capacity(ncols);
    for &old_idx in &order {
        new_columns.push(old_columns[old_idx]);
    }
    // Pull reducers out in ascending old-index order (each exactly once) to
    // avoid needing `Clone` on `Row`, then re-sort them into `order`'s slots.
    let mut taken: Vec<Option<Row<S::Gausser>>> = old_reducers.drain(..).map(Some).collect();
    for &old_idx in &order {
        new_reducers.push(taken[old_idx].take().expect("each old index visited once"));
    }

    matrix.columns = new_columns;
    matrix.reducers = new_reducers;

    // Remap every row's `components` through `ord`, then verify ascension
    // (§8 invariant 1).
    remap_and_check(&mut matrix.reducers, &ord, "reducer")?;
    remap_and_check(&mut matrix.spairs, &ord, "spair")?;

    Ok(())
}

fn remap_and_check<G: Gausser>(
    rows: &mut [Row<G>],
    ord: &[usize],
    row_kind: &'static str,
) -> Result<()> {
    for (index, row) in rows.iter_mut().enumerate() {
        for c in row.components.iter_mut() {
            *c = ord[*c];
        }
        if !row.components.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::NonAscendingComponents { row_kind, index });
        }
    }
    Ok(())
}
