//! Flat-rate annuity factor and its strike derivatives.
//!
//! References: Hagan, "Convexity Conundrums" (2003), cash-settled annuity
//! mapping around Eq. (2.5).

/// Annuity factor of a unit-notional fixed leg paying `1/m` per period over
/// `n` years, discounted at the flat rate `k`.
///
/// Undefined at `k = 0` (division by zero); callers keep strikes strictly
/// positive. The closed-form limit for `k -> 0` is `n`.
pub fn irr0(k: f64, m: f64, n: f64) -> f64 {
    (1.0 / k) * (1.0 - (1.0 + k / m).powf(-(n * m)))
}

/// First strike derivative of [`irr0`].
///
/// Expressed recursively through the annuity value itself; the grouping is
/// fixed so that reruns reproduce reference values bit for bit.
pub fn irr1(k: f64, m: f64, n: f64) -> f64 {
    -irr0(k, m, n) / k + (1.0 / (k * m)) * (n * m) * (1.0 + k / m).powf(-(n * m) - 1.0)
}

/// Second strike derivative of [`irr0`], expressed recursively through
/// [`irr1`].
pub fn irr2(k: f64, m: f64, n: f64) -> f64 {
    -2.0 * irr1(k, m, n) / k
        - (1.0 / (k * m * m)) * (n * m) * (n * m + 1.0) * (1.0 + k / m).powf(-(n * m) - 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GRID_K: [f64; 3] = [0.01, 0.05, 0.10];
    const GRID_M: [f64; 3] = [1.0, 2.0, 4.0];
    const GRID_N: [f64; 4] = [1.0, 5.0, 10.0, 30.0];

    #[test]
    fn zero_rate_limit_is_the_tenor() {
        for n in GRID_N {
            for m in GRID_M {
                assert_relative_eq!(irr0(1e-9, m, n), n, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn known_value_semiannual_ten_year() {
        // (1/0.04) * (1 - 1.02^-20)
        assert_relative_eq!(irr0(0.04, 2.0, 10.0), 8.175_716_672_298_563, epsilon = 1e-12);
    }

    #[test]
    fn first_derivative_matches_finite_difference() {
        let h = 1e-5;
        for k in GRID_K {
            for m in GRID_M {
                for n in GRID_N {
                    let fd = (irr0(k + h, m, n) - irr0(k - h, m, n)) / (2.0 * h);
                    assert_relative_eq!(irr1(k, m, n), fd, max_relative = 1e-6);
                }
            }
        }
    }

    #[test]
    fn second_derivative_matches_finite_difference() {
        let h = 1e-5;
        for k in GRID_K {
            for m in GRID_M {
                for n in GRID_N {
                    let fd = (irr1(k + h, m, n) - irr1(k - h, m, n)) / (2.0 * h);
                    assert_relative_eq!(irr2(k, m, n), fd, max_relative = 1e-6);
                }
            }
        }
    }

    #[test]
    fn annuity_shrinks_as_rates_rise() {
        for m in GRID_M {
            for n in GRID_N {
                assert!(irr0(0.08, m, n) < irr0(0.02, m, n));
                assert!(irr1(0.05, m, n) < 0.0);
                assert!(irr2(0.05, m, n) > 0.0);
            }
        }
    }
}
