//! Divisor search (§4.C, component C).
//!
//! Given a monomial `m` that lives at frame level `L`, whose `component()`
//! field indexes into level `L - 1`, find the unique element of level `L`
//! itself (within the range level `L - 1`'s element hands out) whose lead
//! term divides `m`.

use crate::adapters::{Frame, Gausser, Ring};
use crate::monomial::MonomialView;

/// Returns the index `j` into `frame.level(level)` such that
/// `frame.level(level)[j].lead` divides `m`, and writes `m / lead` into
/// `out` with its component field set to `j`. Returns `None` if the range is
/// empty or no element in it divides `m` (both first-class, non-error
/// outcomes per §7).
///
/// The frame guarantees at most one match in the range and that the range is
/// scanned in ascending order (§4.C); this function relies on, but does not
/// re-verify, that guarantee.
pub fn find_divisor<G, R, Fr>(
    ring: &R,
    frame: &Fr,
    level: i64,
    m: MonomialView<'_>,
    out: &mut [i32],
) -> Option<usize>
where
    G: Gausser,
    R: Ring,
    Fr: Frame<G>,
{
    let nvars = ring.nvars();
    let c = m.component();
    let parent = &frame.level(level - 1)[c];
    if parent.begin >= parent.end {
        return None;
    }

    let candidates = frame.level(level);
    for j in parent.begin..parent.end {
        let lead = candidates[j].lead_view(nvars);
        if ring.divide(m, lead, out) {
            out[1] = j as i32; // component word, per MonomialView layout ([hash, component, degree, exponents..])
            return Some(j);
        }
    }
    None
}
