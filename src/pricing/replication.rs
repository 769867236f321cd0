//! Rates analytics for CMS decompounded coupons.
//!
//! Static replication prices a non-linear payoff of the swap rate as a linear
//! term plus a continuum of vanilla swaptions weighted by the payoff's
//! convexity: receiver swaptions below the forward, payer swaptions above it.
//!
//! References:
//! - Hagan, "Convexity Conundrums" (2003)
//! - Pelsser, "Efficient Methods for Valuing Interest Rate Derivatives" (2000)

use crate::core::{MarketPoint, PricingError, SwaptionSide};
use crate::math::{integrate_adaptive, MathError};
use crate::pricing::black76::annuity_settled_price;
use crate::pricing::payoff::{density_convexity, density_slope, CmsRatePayoff, Payoff};
use crate::vol::SabrParams;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lower integration cutoff standing in for the zero-strike annuity
/// singularity.
const LOWER_CUTOFF: f64 = 1e-6;

/// Absolute quadrature tolerance per replication integral.
const QUAD_TOL: f64 = 1e-9;

/// One pricing request of the batch API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CmsRequest {
    /// Grid point identifying expiry, tenor, and fixed-leg frequency.
    pub point: MarketPoint,
    /// OIS discount factor to the coupon payment date.
    pub discount: f64,
    /// Forward swap rate for the grid point.
    pub forward: f64,
    /// Calibrated smile for the grid point.
    pub smile: SabrParams,
}

fn quadrature_error(e: MathError) -> PricingError {
    match e {
        MathError::NonConvergence => PricingError::ConvergenceFailure(
            "replication quadrature did not converge".to_string(),
        ),
        other => {
            PricingError::NumericalError(format!("replication quadrature failed: {other:?}"))
        }
    }
}

fn validate_request(
    point: MarketPoint,
    discount: f64,
    forward: f64,
) -> Result<(), PricingError> {
    point.validate()?;
    if !discount.is_finite() || discount <= 0.0 {
        return Err(PricingError::InvalidInput(
            "discount factor must be finite and > 0".to_string(),
        ));
    }
    if !forward.is_finite() || forward <= 0.0 {
        return Err(PricingError::InvalidInput(
            "forward swap rate must be finite and > 0".to_string(),
        ));
    }

    Ok(())
}

/// Present value of the unrestricted coupon `g(S_T)` observed at expiry.
///
/// The linear term values the payoff at the forward; the boundary slope term
/// is carried explicitly even though put-call parity makes it vanish at the
/// forward; the two integrals sum receiver swaptions below the forward and
/// payer swaptions above it, each weighted by the density convexity at its
/// strike.
pub fn price_unrestricted_payoff<P: Payoff>(
    payoff: &P,
    point: MarketPoint,
    discount: f64,
    forward: f64,
    smile: SabrParams,
) -> Result<f64, PricingError> {
    validate_request(point, discount, forward)?;
    let MarketPoint {
        expiry,
        tenor,
        frequency,
    } = point;

    let swaption = |k: f64, side: SwaptionSide| {
        let sigma = smile.implied_vol(forward, k, expiry);
        annuity_settled_price(discount, forward, k, sigma, expiry, frequency, tenor, side)
    };
    let weighted =
        |k: f64, side: SwaptionSide| density_convexity(payoff, k, frequency, tenor) * swaption(k, side);

    let linear_term = discount * payoff.value(forward);
    let boundary_term = density_slope(payoff, forward, frequency, tenor)
        * (swaption(forward, SwaptionSide::Payer) - swaption(forward, SwaptionSide::Receiver));

    let receiver_leg = integrate_adaptive(
        |k| weighted(k, SwaptionSide::Receiver),
        LOWER_CUTOFF,
        forward,
        QUAD_TOL,
    )
    .map_err(quadrature_error)?;
    let payer_leg = integrate_adaptive(
        |k| weighted(k, SwaptionSide::Payer),
        forward,
        f64::INFINITY,
        QUAD_TOL,
    )
    .map_err(quadrature_error)?;

    Ok(linear_term + boundary_term + receiver_leg + payer_leg)
}

/// Present value of the floored coupon `g(S_T)` paid only above the floor
/// strike `L`.
///
/// Only the payer side contributes: the slope term at the floor captures the
/// first-derivative jump, the integral the convexity beyond it. The value of
/// the coupon itself at the floor is assumed to vanish there (the floor sits
/// at the payoff's zero crossing), so no level term appears.
pub fn price_floored_payoff<P: Payoff>(
    payoff: &P,
    point: MarketPoint,
    discount: f64,
    forward: f64,
    smile: SabrParams,
    floor_strike: f64,
) -> Result<f64, PricingError> {
    validate_request(point, discount, forward)?;
    if !floor_strike.is_finite() || floor_strike <= 0.0 {
        return Err(PricingError::InvalidInput(
            "floor strike must be finite and > 0".to_string(),
        ));
    }
    let MarketPoint {
        expiry,
        tenor,
        frequency,
    } = point;

    let payer = |k: f64| {
        let sigma = smile.implied_vol(forward, k, expiry);
        annuity_settled_price(
            discount,
            forward,
            k,
            sigma,
            expiry,
            frequency,
            tenor,
            SwaptionSide::Payer,
        )
    };

    let jump_term = density_slope(payoff, floor_strike, frequency, tenor) * payer(floor_strike);
    let payer_leg = integrate_adaptive(
        |k| density_convexity(payoff, k, frequency, tenor) * payer(k),
        floor_strike,
        f64::INFINITY,
        QUAD_TOL,
    )
    .map_err(quadrature_error)?;

    Ok(jump_term + payer_leg)
}

/// Convexity-adjusted CMS rate: the expectation of the swap rate under the
/// payment measure, backed out of the unrestricted replication value of the
/// identity payoff.
pub fn cms_rate(
    point: MarketPoint,
    discount: f64,
    forward: f64,
    smile: SabrParams,
) -> Result<f64, PricingError> {
    let pv = price_unrestricted_payoff(&CmsRatePayoff, point, discount, forward, smile)?;
    Ok(pv / discount)
}

/// Prices a batch of independent unrestricted-coupon requests.
///
/// Requests share the payoff and read-only market data; with the `parallel`
/// feature each request prices on its own Rayon worker.
pub fn price_grid<P>(payoff: &P, requests: &[CmsRequest]) -> Vec<Result<f64, PricingError>>
where
    P: Payoff + Sync,
{
    let price_one = |request: &CmsRequest| {
        price_unrestricted_payoff(
            payoff,
            request.point,
            request.discount,
            request.forward,
            request.smile,
        )
    };

    #[cfg(feature = "parallel")]
    let values = requests.par_iter().map(price_one).collect::<Vec<_>>();
    #[cfg(not(feature = "parallel"))]
    let values = requests.iter().map(price_one).collect::<Vec<_>>();

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::payoff::DecompoundedPayoff;
    use approx::assert_relative_eq;

    fn scenario() -> (MarketPoint, f64, f64, SabrParams) {
        let point = MarketPoint::new(5.0, 10.0, 2.0);
        let discount = (-0.03_f64 * 5.0).exp();
        let forward = 0.04;
        let smile = SabrParams::new(0.05, 0.5, -0.25, 0.5);
        (point, discount, forward, smile)
    }

    #[test]
    fn rejects_invalid_requests() {
        let (point, discount, forward, smile) = scenario();
        let payoff = DecompoundedPayoff::reference();

        let bad_point = MarketPoint::new(-1.0, 10.0, 2.0);
        assert!(price_unrestricted_payoff(&payoff, bad_point, discount, forward, smile).is_err());
        assert!(price_unrestricted_payoff(&payoff, point, 0.0, forward, smile).is_err());
        assert!(price_unrestricted_payoff(&payoff, point, discount, -0.01, smile).is_err());
        assert!(
            price_floored_payoff(&payoff, point, discount, forward, smile, 0.0).is_err()
        );
    }

    #[test]
    fn unrestricted_value_sits_below_the_linear_term() {
        let (point, discount, forward, smile) = scenario();
        let payoff = DecompoundedPayoff::reference();

        let pv = price_unrestricted_payoff(&payoff, point, discount, forward, smile).unwrap();
        let linear = discount * payoff.value(forward);
        // The coupon is concave in the swap rate, so both replication legs
        // carry negative weights and the correction pulls the value down.
        assert!(pv > 0.5 * linear, "pv {pv} collapsed against linear term {linear}");
        assert!(pv < linear, "pv {pv} exceeds linear term {linear}");
    }

    #[test]
    fn floored_value_is_monotone_in_the_floor() {
        let (point, discount, forward, smile) = scenario();
        let payoff = DecompoundedPayoff::reference();

        let floors = [payoff.zero_strike(), 0.005, 0.01, 0.02, 0.04];
        let mut last = f64::INFINITY;
        for floor in floors {
            let pv =
                price_floored_payoff(&payoff, point, discount, forward, smile, floor).unwrap();
            assert!(pv.is_finite());
            assert!(pv <= last + 1e-12, "pv {pv} rose as the floor moved to {floor}");
            last = pv;
        }
    }

    #[test]
    fn cms_rate_carries_a_positive_convexity_adjustment() {
        let (point, discount, forward, smile) = scenario();
        let adjusted = cms_rate(point, discount, forward, smile).unwrap();
        assert!(adjusted > forward);
        assert!(adjusted < forward * 1.25);
    }

    #[test]
    fn boundary_term_vanishes_by_parity() {
        let (point, discount, forward, smile) = scenario();
        let sigma = smile.implied_vol(forward, forward, point.expiry);
        let payer = annuity_settled_price(
            discount,
            forward,
            forward,
            sigma,
            point.expiry,
            point.frequency,
            point.tenor,
            SwaptionSide::Payer,
        );
        let receiver = annuity_settled_price(
            discount,
            forward,
            forward,
            sigma,
            point.expiry,
            point.frequency,
            point.tenor,
            SwaptionSide::Receiver,
        );
        assert_relative_eq!(payer, receiver, epsilon = 1e-12);
    }

    #[test]
    fn broken_smile_surfaces_a_quadrature_error() {
        let (point, discount, forward, _) = scenario();
        let payoff = DecompoundedPayoff::reference();

        // Correlation outside [-1, 1] makes wing vols NaN, which the
        // integrator refuses to average over.
        let broken = SabrParams::new(0.05, 0.5, 1.5, 0.5);
        let got = price_unrestricted_payoff(&payoff, point, discount, forward, broken);
        assert!(matches!(
            got,
            Err(PricingError::NumericalError(_)) | Err(PricingError::ConvergenceFailure(_))
        ));
    }

    #[test]
    fn grid_batch_matches_single_requests() {
        let (point, discount, forward, smile) = scenario();
        let payoff = DecompoundedPayoff::reference();

        let requests = vec![
            CmsRequest {
                point,
                discount,
                forward,
                smile,
            },
            CmsRequest {
                point: MarketPoint::new(5.0, 5.0, 2.0),
                discount,
                forward: 0.035,
                smile,
            },
        ];

        let batch = price_grid(&payoff, &requests);
        assert_eq!(batch.len(), 2);
        for (got, request) in batch.iter().zip(&requests) {
            let single = price_unrestricted_payoff(
                &payoff,
                request.point,
                request.discount,
                request.forward,
                request.smile,
            )
            .unwrap();
            assert_relative_eq!(*got.as_ref().unwrap(), single, epsilon = 1e-15);
        }
    }
}
