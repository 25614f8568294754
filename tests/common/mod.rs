//! Shared test fixtures: a small field, a grevlex (optionally exterior)
//! polynomial ring, and a `Frame` built from an explicit level table.
//!
//! Not itself a test module — each integration test does `mod common;` and
//! pulls in what it needs.

#![allow(dead_code)]

use schreyer_res_core::monomial::{MonomialView, HEADER_LEN};
use schreyer_res_core::{
    Frame, FrameElement, Gausser, Polynomial, PolynomialBuilder, Ring, SchreyerOrder, System,
};
use std::cmp::Ordering;

pub const P: i32 = 5;

fn norm(a: i32) -> i32 {
    ((a % P) + P) % P
}

fn inv_mod(a: i32) -> i32 {
    // Extended Euclidean algorithm; P is prime in every fixture below.
    let (mut old_r, mut r) = (norm(a) as i64, P as i64);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        let (new_r, new_s) = (old_r - q * r, old_s - q * s);
        old_r = r;
        r = new_r;
        old_s = s;
        s = new_s;
    }
    norm(old_s as i32)
}

fn compute_hash(component: usize, degree: i32, exps: &[i32]) -> i32 {
    let mut h: i32 = (component as i32).wrapping_mul(1_000_003).wrapping_add(degree);
    for (i, &e) in exps.iter().enumerate() {
        h = h.wrapping_mul(31).wrapping_add(e.wrapping_mul(i as i32 + 7));
    }
    h
}

/// Builds packed monomial words `[hash, component, degree, exponents..]`.
pub fn make_monomial(component: usize, exps: &[i32]) -> Vec<i32> {
    let degree: i32 = exps.iter().sum();
    let mut v = vec![0i32; HEADER_LEN + exps.len()];
    v[1] = component as i32;
    v[2] = degree;
    v[3..].copy_from_slice(exps);
    v[0] = compute_hash(component, degree, exps);
    v
}

/// A `k[x_1..x_n]` ring over `Z/P`, optionally skew-commutative (an exterior
/// algebra on the same variables, exponents restricted to 0/1).
pub struct PolyRing {
    pub nvars: usize,
    pub skew: bool,
}

impl Ring for PolyRing {
    fn nvars(&self) -> usize {
        self.nvars
    }

    fn is_skew_commutative(&self) -> bool {
        self.skew
    }

    fn unchecked_mult(&self, m: MonomialView, n: MonomialView, out: &mut [i32]) {
        let nvars = self.nvars;
        let me = m.exponents();
        let ne = n.exponents();
        for i in 0..nvars {
            out[3 + i] = me[i] + ne[i];
        }
        out[2] = m.degree() + n.degree();
        out[1] = n.component() as i32;
        out[0] = compute_hash(out[1] as usize, out[2], &out[3..3 + nvars]);
    }

    fn divide(&self, m: MonomialView, n: MonomialView, out: &mut [i32]) -> bool {
        let nvars = self.nvars;
        let me = m.exponents();
        let ne = n.exponents();
        for i in 0..nvars {
            if me[i] < ne[i] {
                return false;
            }
        }
        for i in 0..nvars {
            out[3 + i] = me[i] - ne[i];
        }
        out[2] = m.degree() - n.degree();
        out[1] = 0;
        out[0] = compute_hash(0, out[2], &out[3..3 + nvars]);
        true
    }

    fn compare_schreyer(
        &self,
        m: MonomialView,
        n: MonomialView,
        total_m: MonomialView,
        total_n: MonomialView,
        tie_m: i32,
        tie_n: i32,
    ) -> Ordering {
        let nvars = self.nvars;
        let mut cm = vec![0i32; nvars];
        let mut cn = vec![0i32; nvars];
        for i in 0..nvars {
            cm[i] = m.exponents()[i] + total_m.exponents()[i];
            cn[i] = n.exponents()[i] + total_n.exponents()[i];
        }
        let deg_m: i32 = cm.iter().sum();
        let deg_n: i32 = cn.iter().sum();
        match deg_m.cmp(&deg_n) {
            Ordering::Equal => {}
            other => return other,
        }
        // Degree-reverse-lex tiebreak: compare from the last variable, the
        // monomial with the *smaller* trailing exponent sorts first.
        for i in (0..nvars).rev() {
            match cn[i].cmp(&cm[i]) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        tie_m.cmp(&tie_n)
    }

    fn is_divisible_by_var_in_range(&self, m: MonomialView, lo: usize, hi: usize) -> bool {
        let exps = m.exponents();
        let hi = hi.min(exps.len());
        (lo..hi).any(|i| exps[i] > 0)
    }

    fn skew_mult_sign(&self, m: MonomialView, n: MonomialView) -> i32 {
        if !self.skew {
            return 1;
        }
        let me = m.exponents();
        let ne = n.exponents();
        let mut sign = 1i32;
        for j in 0..me.len() {
            if me[j] != 0 && ne[j] != 0 {
                return 0;
            }
        }
        for j in (0..me.len()).rev() {
            if ne[j] == 0 {
                continue;
            }
            let inversions = me[j + 1..].iter().filter(|&&e| e != 0).count();
            if inversions % 2 == 1 {
                sign = -sign;
            }
        }
        sign
    }
}

/// The dense-row/sparse-row coefficient adapter over `Z/P`.
pub struct FpGausser;

impl Gausser for FpGausser {
    type Elt = i32;
    type CoeffVec = Vec<i32>;

    fn zero_elt(&self) -> i32 {
        0
    }
    fn is_zero(&self, e: &i32) -> bool {
        *e == 0
    }
    fn allocate(&self) -> Vec<i32> {
        Vec::new()
    }
    fn allocate_dense(&self, ncols: usize) -> schreyer_res_core::Result<Vec<i32>> {
        Ok(vec![0; ncols])
    }
    fn push_back_one(&self, v: &mut Vec<i32>) {
        v.push(1);
    }
    fn push_back_minus_one(&self, v: &mut Vec<i32>) {
        v.push(norm(-1));
    }
    fn push_back_element(&self, v: &mut Vec<i32>, src: &Vec<i32>, idx: usize) {
        v.push(src[idx]);
    }
    fn push_back_negated_element(&self, v: &mut Vec<i32>, src: &Vec<i32>, idx: usize) {
        v.push(norm(-src[idx]));
    }
    fn coeff_len(&self, v: &Vec<i32>) -> usize {
        v.len()
    }
    fn scatter(&self, dense: &mut [i32], coeffs: &Vec<i32>, components: &[usize]) {
        for (i, &c) in components.iter().enumerate() {
            dense[c] = coeffs[i];
        }
    }
    fn sparse_cancel(&self, dense: &mut [i32], pivot_coeffs: &Vec<i32>, pivot_components: &[usize]) -> i32 {
        let pivot_col = pivot_components[0];
        let mult = norm(dense[pivot_col] * inv_mod(pivot_coeffs[0]));
        for (i, &c) in pivot_components.iter().enumerate() {
            dense[c] = norm(dense[c] - mult * pivot_coeffs[i]);
        }
        mult
    }
    fn sparse_cancel_with_sink(
        &self,
        dense: &mut [i32],
        pivot_coeffs: &Vec<i32>,
        pivot_components: &[usize],
        sink: &mut Vec<i32>,
    ) -> i32 {
        let mult = self.sparse_cancel(dense, pivot_coeffs, pivot_components);
        sink.push(mult);
        mult
    }
    fn next_nonzero(&self, dense: &[i32], start: usize, end: usize) -> usize {
        for i in start..=end {
            if dense[i] != 0 {
                return i;
            }
        }
        end + 1
    }
}

#[derive(Clone)]
pub struct Poly {
    pub terms: Vec<Vec<i32>>,
    pub coeffs: Vec<i32>,
}

impl Polynomial<FpGausser> for Poly {
    fn terms(&self) -> Box<dyn Iterator<Item = (&[i32], usize)> + '_> {
        Box::new(self.terms.iter().map(|t| t.as_slice()).zip(0..))
    }
    fn coeffs(&self) -> &Vec<i32> {
        &self.coeffs
    }
}

pub struct PolyBuilder {
    terms: Vec<Vec<i32>>,
    coeffs: Vec<i32>,
}

impl PolynomialBuilder<FpGausser> for PolyBuilder {
    type Polynomial = Poly;

    fn new(_ring_monomial_len: usize) -> Self {
        Self {
            terms: Vec::new(),
            coeffs: Vec::new(),
        }
    }
    fn append_monic_term(&mut self, lead: &[i32]) {
        self.terms.push(lead.to_vec());
    }
    fn push_back_term(&mut self, monomial: &[i32]) {
        self.terms.push(monomial.to_vec());
    }
    fn coeffs_mut(&mut self) -> &mut Vec<i32> {
        &mut self.coeffs
    }
    fn build(self) -> Poly {
        Poly {
            terms: self.terms,
            coeffs: self.coeffs,
        }
    }
}

/// A frame with levels indexed `-1, 0, 1, ..`, stored at offset `+1`.
/// Level `-1` is a guard level with one empty-range element per component
/// of level 0, used whenever `Matrix::construct` is asked to build the
/// lowest nontrivial level.
pub struct TestFrame {
    pub levels: Vec<Vec<FrameElement<Poly>>>,
    pub orders: Vec<SchreyerOrder>,
}

impl TestFrame {
    fn idx(l: i64) -> usize {
        (l + 1) as usize
    }
}

impl Frame<FpGausser> for TestFrame {
    type Polynomial = Poly;

    fn level(&self, l: i64) -> &[FrameElement<Poly>] {
        &self.levels[Self::idx(l)]
    }
    fn schreyer_order(&self, l: i64) -> &SchreyerOrder {
        &self.orders[Self::idx(l)]
    }
}

pub struct TestSystem;

impl System for TestSystem {
    type Ring = PolyRing;
    type Gausser = FpGausser;
    type Polynomial = Poly;
    type Builder = PolyBuilder;
    type Frame = TestFrame;
}

pub fn trivial_order(entries: usize) -> SchreyerOrder {
    SchreyerOrder {
        total_monom: (0..entries).map(|_| make_monomial(0, &[0])).collect(),
        tie_breaker: vec![0; entries],
    }
}

/// A minimal one-variable frame: a guard level, one rank-1 generator whose
/// own syzygy is itself (`x`), and one S-pair whose lead is `x^exponent`
/// scaled against that generator. Constructing `(level = 1, degree =
/// exponent + 1)` against this frame always produces one column (`x^(exponent+1)`)
/// and a two-term syzygy, regardless of `exponent` — used to drive both
/// fixed-case and randomized checks against the same hand-traced shape.
pub fn single_generator_frame(exponent: i32) -> TestFrame {
    let guard = FrameElement::new(make_monomial(0, &[0]), 0, 0, 1);
    let generator = FrameElement::new(make_monomial(0, &[1]), 1, 0, 0);
    *generator.syzygy.lock() = Some(Poly {
        terms: vec![make_monomial(0, &[1])],
        coeffs: vec![1],
    });
    let spair = FrameElement::new(make_monomial(0, &[exponent]), exponent + 1, 0, 0);

    TestFrame {
        levels: vec![vec![guard], vec![generator], vec![spair]],
        orders: vec![trivial_order(1), trivial_order(1), trivial_order(1)],
    }
}

/// Installs a `tracing-subscriber` test writer so `tracing::info_span!` /
/// `debug!` / `trace!` calls inside `Matrix::construct` exercise their real
/// formatting path under test instead of going to a no-op default
/// subscriber. Safe to call from multiple tests; only the first call wins.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("trace")
        .try_init();
}
