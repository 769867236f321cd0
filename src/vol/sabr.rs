//! Module `vol::sabr`.
//!
//! Implements the lognormal SABR implied-volatility map feeding every
//! swaption price under the replication integrals.
//!
//! References: Hagan et al. (2002), Hull (11th ed.) Ch. 18, SABR asymptotic volatility formula around Eq. (A.69).
//!
//! Key types and purpose: `SabrParams` define the core data contracts for this module.
//!
//! Numerical considerations: the general branch is a 0/0 limit at the money,
//! so strikes within the hard tie-break take the closed-form expansion;
//! parameters are not clamped and out-of-domain inputs propagate as NaN.
use serde::{Deserialize, Serialize};

/// Strikes closer to the forward than this take the at-the-money branch.
///
/// The tie-break is part of the pricing contract: near the money the two
/// branches agree only approximately, and moving the threshold moves prices.
const ATM_THRESHOLD: f64 = 1e-12;

/// Calibrated SABR smile parameters for one (expiry, tenor) grid point.
///
/// Meaningful smiles satisfy `nu >= 0`, `|rho| <= 1` and `0 <= beta <= 1`;
/// violations are not rejected and yield NaN prices downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrParams {
    pub alpha: f64,
    pub beta: f64,
    pub rho: f64,
    pub nu: f64,
}

impl SabrParams {
    /// Creates a parameter tuple.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Self {
        Self {
            alpha,
            beta,
            rho,
            nu,
        }
    }

    /// At-the-money lognormal volatility expansion at forward `f` and
    /// expiry `t`.
    pub fn atm_vol(&self, f: f64, t: f64) -> f64 {
        let one_minus_beta = 1.0 - self.beta;
        let f_pow = f.powf(one_minus_beta);
        let a1 =
            (one_minus_beta * one_minus_beta / 24.0) * self.alpha * self.alpha
                / f.powf(2.0 * one_minus_beta);
        let a2 = 0.25 * self.rho * self.beta * self.nu * self.alpha / f_pow;
        let a3 = ((2.0 - 3.0 * self.rho * self.rho) / 24.0) * self.nu * self.nu;
        self.alpha * (1.0 + (a1 + a2 + a3) * t) / f_pow
    }

    /// Hagan lognormal implied volatility at strike `k`, forward `f` and
    /// expiry `t`.
    pub fn implied_vol(&self, f: f64, k: f64, t: f64) -> f64 {
        if (f - k).abs() < ATM_THRESHOLD {
            return self.atm_vol(f, t);
        }

        let one_minus_beta = 1.0 - self.beta;
        let fk = f * k;
        let fk_pow_half = fk.powf(0.5 * one_minus_beta);
        let log_fk = (f / k).ln();

        let z = (self.nu / self.alpha) * fk_pow_half * log_fk;
        let chi = (((1.0 - 2.0 * self.rho * z + z * z).sqrt() + z - self.rho)
            / (1.0 - self.rho))
            .ln();

        let a1 = (one_minus_beta * one_minus_beta / 24.0) * self.alpha * self.alpha
            / fk.powf(one_minus_beta);
        let a2 = 0.25 * self.rho * self.beta * self.nu * self.alpha / fk_pow_half;
        let a3 = ((2.0 - 3.0 * self.rho * self.rho) / 24.0) * self.nu * self.nu;

        let numer = self.alpha * (1.0 + (a1 + a2 + a3) * t) * z;
        let denom = fk_pow_half
            * (1.0
                + (one_minus_beta * one_minus_beta / 24.0) * log_fk * log_fk
                + (one_minus_beta.powi(4) / 1920.0) * log_fk.powi(4))
            * chi;

        numer / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_smile() -> SabrParams {
        SabrParams::new(0.3, 0.5, -0.4, 0.8)
    }

    #[test]
    fn hagan_reference_case_matches_expected_values() {
        let params = reference_smile();
        let forward = 0.04;
        let t = 5.0;

        let strikes = [
            0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.045, 0.05, 0.06, 0.08,
        ];
        let expected = [
            2.380257906011172,
            2.107269276162069,
            1.925_635_528_505_62,
            1.791378193429727,
            1.686220961919487,
            1.600827072338926,
            1.529_781_25,
            1.469656043231035,
            1.418137287693584,
            1.334774783651072,
            1.221122758700629,
        ];

        for (k, exp) in strikes.iter().zip(expected.iter()) {
            let vol = params.implied_vol(forward, *k, t);
            assert_relative_eq!(vol, *exp, max_relative = 1e-12);
        }
    }

    #[test]
    fn atm_branch_engages_inside_threshold() {
        let params = reference_smile();
        let f = 0.04;
        let t = 5.0;

        // Both sit inside the tie-break, so both evaluate the ATM expansion.
        let atm = params.implied_vol(f, f, t);
        let inside = params.implied_vol(f, f + 1e-13, t);
        assert_relative_eq!(atm, params.atm_vol(f, t), epsilon = 1e-15);
        assert_relative_eq!(atm, inside, epsilon = 1e-9);
    }

    #[test]
    fn branches_agree_across_the_boundary() {
        let params = reference_smile();
        let f = 0.04;
        let t = 5.0;

        let atm = params.implied_vol(f, f, t);
        let near = params.implied_vol(f, f * (1.0 + 1e-8), t);
        assert_relative_eq!(atm, near, max_relative = 1e-5);
    }

    #[test]
    fn smile_is_decreasing_through_the_money_for_negative_rho() {
        let params = reference_smile();
        let f = 0.04;
        let t = 5.0;
        let low = params.implied_vol(f, 0.02, t);
        let atm = params.implied_vol(f, f, t);
        let high = params.implied_vol(f, 0.08, t);
        assert!(low > atm);
        assert!(atm > high);
    }

    #[test]
    fn out_of_domain_inputs_propagate_nan() {
        let params = SabrParams::new(0.3, 0.5, -0.4, 0.8);
        assert!(params.implied_vol(-0.04, 0.05, 5.0).is_nan());
        assert!(params.implied_vol(0.04, -0.05, 5.0).is_nan());

        // Correlation far outside [-1, 1] breaks the square root for wing
        // strikes rather than being clamped away.
        let broken = SabrParams::new(0.3, 0.5, 1.5, 0.8);
        assert!(broken.implied_vol(0.04, 0.004, 5.0).is_nan());
    }

    #[test]
    fn params_serde_round_trip() {
        let params = reference_smile();
        let json = serde_json::to_string(&params).unwrap();
        let back: SabrParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
