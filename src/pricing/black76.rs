//! Module `pricing::black76`.
//!
//! Implements Black-76 swap-rate option pricing under the annuity measure,
//! with concrete routines such as `black76_call`, `annuity_settled_price`.
//!
//! References: Hull (11th ed.) Ch. 26, Black-76 formulas around Eq. (26.1)-(26.2); Hagan, "Convexity Conundrums" (2003) for the annuity-settled convention.
//!
//! Numerical considerations: `sigma <= 0` or `t <= 0` leave d1/d2 ill-defined
//! and propagate as NaN rather than being intercepted.
use crate::core::SwaptionSide;
use crate::math::normal_cdf;
use crate::rates::annuity::irr0;

/// Black-76 `d1` moneyness term.
pub fn d1(f: f64, k: f64, sigma: f64, t: f64) -> f64 {
    ((f / k).ln() + 0.5 * sigma * sigma * t) / (sigma * t.sqrt())
}

/// Black-76 `d2` moneyness term.
pub fn d2(f: f64, k: f64, sigma: f64, t: f64) -> f64 {
    d1(f, k, sigma, t) - sigma * t.sqrt()
}

/// Black-76 call on a forward rate, scaled by the supplied discount factor.
pub fn black76_call(discount: f64, f: f64, k: f64, sigma: f64, t: f64) -> f64 {
    discount * (f * normal_cdf(d1(f, k, sigma, t)) - k * normal_cdf(d2(f, k, sigma, t)))
}

/// Black-76 put on a forward rate, scaled by the supplied discount factor.
pub fn black76_put(discount: f64, f: f64, k: f64, sigma: f64, t: f64) -> f64 {
    discount * (k * normal_cdf(-d2(f, k, sigma, t)) - f * normal_cdf(-d1(f, k, sigma, t)))
}

/// IRR-settled European swaption price.
///
/// The Black-76 leg prices receiver as a put and payer as a call on the swap
/// rate, with the numeraire discount factor held at unity inside the Black
/// evaluation; the annuity at the forward and the external `discount` rescale
/// the result outside. The two-stage scaling is the settlement convention and
/// must not be collapsed into the Black call itself.
#[allow(clippy::too_many_arguments)]
pub fn annuity_settled_price(
    discount: f64,
    f: f64,
    k: f64,
    sigma: f64,
    t: f64,
    m: f64,
    n: f64,
    side: SwaptionSide,
) -> f64 {
    let df_numeraire = 1.0; // not 1.0 / irr0(f, m, n)
    let annuity = irr0(f, m, n);
    let black = match side {
        SwaptionSide::Receiver => black76_put(df_numeraire, f, k, sigma, t),
        SwaptionSide::Payer => black76_call(df_numeraire, f, k, sigma, t),
    };

    discount * annuity * black
}
