//! Module `pricing::payoff`.
//!
//! Implements the coupon payoff family and the replication density that
//! weights vanilla swaptions under the static-replication integrals.
//!
//! References: Hagan, "Convexity Conundrums" (2003), replication weights
//! around Eq. (3.6).
//!
//! Key types and purpose: `Payoff` is the seam between the payoff economics
//! and the payoff-agnostic replication machinery; `DecompoundedPayoff` is the
//! traded coupon.
use serde::{Deserialize, Serialize};

use crate::rates::annuity::{irr0, irr1, irr2};

/// Twice-differentiable payoff of the realised swap rate.
///
/// The replication machinery consumes only this triple; pricing a different
/// coupon means supplying a different implementation.
pub trait Payoff {
    /// Payoff value g(k).
    fn value(&self, k: f64) -> f64;
    /// First derivative g'(k).
    fn slope(&self, k: f64) -> f64;
    /// Second derivative g''(k).
    fn convexity(&self, k: f64) -> f64;
}

/// Decompounded CMS coupon `k^(1/p) - c^(1/q)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompoundedPayoff {
    /// Root exponent `p` applied to the swap rate.
    pub rate_root: f64,
    /// Root exponent `q` applied to the floor level.
    pub floor_root: f64,
    /// Floor level `c`.
    pub floor_level: f64,
}

impl DecompoundedPayoff {
    /// Creates a decompounded coupon.
    pub fn new(rate_root: f64, floor_root: f64, floor_level: f64) -> Self {
        Self {
            rate_root,
            floor_root,
            floor_level,
        }
    }

    /// The quoted coupon: fourth root of the swap rate less the square root
    /// of 4%.
    pub fn reference() -> Self {
        Self::new(4.0, 2.0, 0.04)
    }

    /// Swap rate at which the coupon crosses zero, `c^(p/q)`.
    pub fn zero_strike(&self) -> f64 {
        self.floor_level.powf(self.rate_root / self.floor_root)
    }
}

impl Payoff for DecompoundedPayoff {
    fn value(&self, k: f64) -> f64 {
        k.powf(1.0 / self.rate_root) - self.floor_level.powf(1.0 / self.floor_root)
    }

    fn slope(&self, k: f64) -> f64 {
        let p = 1.0 / self.rate_root;
        p * k.powf(p - 1.0)
    }

    fn convexity(&self, k: f64) -> f64 {
        let p = 1.0 / self.rate_root;
        p * (p - 1.0) * k.powf(p - 2.0)
    }
}

/// Identity payoff g(k) = k; prices the raw CMS rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsRatePayoff;

impl Payoff for CmsRatePayoff {
    fn value(&self, k: f64) -> f64 {
        k
    }

    fn slope(&self, _k: f64) -> f64 {
        1.0
    }

    fn convexity(&self, _k: f64) -> f64 {
        0.0
    }
}

/// Replication density h(k) = g(k) / irr0(k).
pub fn density<P: Payoff>(payoff: &P, k: f64, m: f64, n: f64) -> f64 {
    payoff.value(k) / irr0(k, m, n)
}

/// First strike derivative of the replication density.
pub fn density_slope<P: Payoff>(payoff: &P, k: f64, m: f64, n: f64) -> f64 {
    let i0 = irr0(k, m, n);
    payoff.slope(k) / i0 - payoff.value(k) * irr1(k, m, n) / (i0 * i0)
}

/// Second strike derivative of the replication density: the weight applied to
/// each vanilla swaption price under the replication integral.
pub fn density_convexity<P: Payoff>(payoff: &P, k: f64, m: f64, n: f64) -> f64 {
    let i0 = irr0(k, m, n);
    let i1 = irr1(k, m, n);
    let i2 = irr2(k, m, n);
    let g0 = payoff.value(k);
    let g1 = payoff.slope(k);
    let g2 = payoff.convexity(k);

    g2 / i0 - i2 * g0 / (i0 * i0) - 2.0 * i1 * g1 / (i0 * i0)
        + 2.0 * i1 * i1 * g0 / (i0 * i0 * i0)
}
