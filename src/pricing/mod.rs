//! Pricing layer: Black-76 under the annuity measure, the payoff family, and
//! the static-replication entry points.

pub mod black76;
pub mod payoff;
pub mod replication;

pub use black76::{annuity_settled_price, black76_call, black76_put, d1, d2};
pub use payoff::{CmsRatePayoff, DecompoundedPayoff, Payoff};
pub use replication::{
    cms_rate, price_floored_payoff, price_grid, price_unrestricted_payoff, CmsRequest,
};
