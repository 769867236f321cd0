//! FerroCMS prices CMS decompounded options by static replication under a
//! SABR smile.
//!
//! Given a forward swap rate off a bootstrapped curve, calibrated SABR
//! parameters for the (expiry, tenor) point, and a non-linear payoff of the
//! realised swap rate, the crate decomposes the payoff into a linear term
//! plus a continuum of vanilla swaptions weighted by the payoff's convexity,
//! and integrates that continuum adaptively: receiver swaptions below the
//! forward, payer swaptions above it.
//!
//! References used across modules include:
//! - Hagan, "Convexity Conundrums: Pricing CMS Swaps, Caps, and Floors" (2003).
//! - Hagan et al., "Managing Smile Risk" (2002) for the SABR asymptotics.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 26.
//!
//! Numerical considerations:
//! - The math kernels propagate NaN for invalid domains instead of raising;
//!   only the outward-facing pricing and curve surfaces return errors.
//! - The replication integrals run an adaptive quadrature with a hard
//!   subdivision limit; exhaustion surfaces as a convergence error.
//! - The annuity function is singular at zero strike, so the receiver-side
//!   integral starts at a small positive cutoff.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered batch pricing over request grids.
//!
//! # Quick Start
//! Price the reference decompounded coupon:
//! ```rust
//! use ferrocms::core::MarketPoint;
//! use ferrocms::pricing::{price_unrestricted_payoff, DecompoundedPayoff};
//! use ferrocms::rates::CurveTable;
//! use ferrocms::vol::SabrParams;
//!
//! let curve = CurveTable::flat(0.5, 20.0, 0.03, 0.04).unwrap();
//! let point = MarketPoint::new(5.0, 10.0, 2.0);
//! let forward = curve.forward_swap_rate(5.0, 10.0, 2.0).unwrap();
//! let discount = curve.discount_factor(5.0).unwrap();
//! let smile = SabrParams::new(0.05, 0.5, -0.25, 0.5);
//!
//! let payoff = DecompoundedPayoff::reference();
//! let pv = price_unrestricted_payoff(&payoff, point, discount, forward, smile).unwrap();
//! assert!(pv > 0.0 && pv < 1.0);
//! ```
//!
//! Price the floored version above its zero crossing:
//! ```rust
//! use ferrocms::core::MarketPoint;
//! use ferrocms::pricing::{price_floored_payoff, DecompoundedPayoff};
//! use ferrocms::vol::SabrParams;
//!
//! let point = MarketPoint::new(5.0, 10.0, 2.0);
//! let smile = SabrParams::new(0.05, 0.5, -0.25, 0.5);
//! let payoff = DecompoundedPayoff::reference();
//!
//! let pv = price_floored_payoff(
//!     &payoff,
//!     point,
//!     0.86,
//!     0.04,
//!     smile,
//!     payoff.zero_strike(),
//! )
//! .unwrap();
//! assert!(pv > 0.0);
//! ```
//!
//! Convexity-adjust a CMS rate:
//! ```rust
//! use ferrocms::core::MarketPoint;
//! use ferrocms::pricing::cms_rate;
//! use ferrocms::vol::SabrParams;
//!
//! let point = MarketPoint::new(5.0, 10.0, 2.0);
//! let smile = SabrParams::new(0.05, 0.5, -0.25, 0.5);
//! let adjusted = cms_rate(point, 0.86, 0.04, smile).unwrap();
//! assert!(adjusted > 0.04);
//! ```

pub mod core;
pub mod math;
pub mod pricing;
pub mod rates;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::{MarketPoint, PricingError, SwaptionSide};
    pub use crate::pricing::{
        annuity_settled_price, cms_rate, price_floored_payoff, price_grid,
        price_unrestricted_payoff, CmsRatePayoff, CmsRequest, DecompoundedPayoff, Payoff,
    };
    pub use crate::rates::{irr0, irr1, irr2, CurvePoint, CurveTable};
    pub use crate::vol::SabrParams;
}
