//! Fixed-income primitives: the flat-rate annuity family and the
//! discount/forward curve adapter.

pub mod annuity;
pub mod curve;

pub use annuity::{irr0, irr1, irr2};
pub use curve::{CurvePoint, CurveTable};
