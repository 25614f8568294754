//! F4-style core for constructing one graded piece of a free resolution
//! over a (possibly skew-commutative) polynomial ring.
//!
//! Given a precomputed Schreyer frame, [`Matrix::construct`] builds the
//! sparse matrix for one `(level, degree)` pair, reduces it, and writes the
//! resulting syzygies back into the frame. See `SPEC_FULL.md` for the full
//! specification this module implements; in particular §2 names the eight
//! components (A–H) this crate's modules are organized around.

pub mod adapters;
pub mod divisor;
pub mod error;
pub mod hash_table;
pub mod matrix;
pub mod monomial;
pub mod reduce;
pub mod sort;

pub use adapters::{
    Frame, FrameElement, Gausser, Polynomial, PolynomialBuilder, Ring, SchreyerOrder, System,
};
pub use error::{Error, Result};
pub use matrix::{Matrix, Row};
pub use reduce::ReductionMode;
