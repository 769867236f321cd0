use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Grid-time tolerance for exact-node lookup, in units of grid spacing.
const GRID_SNAP: f64 = 1e-8;

/// One node of the bootstrapped curve: the OIS discount factor to the node
/// date and the forward LIBOR fixing for the accrual period ending there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// OIS discount factor from today to the node date.
    pub df_ois: f64,
    /// Simply-compounded forward LIBOR for the period ending at the node.
    pub fwd_libor: f64,
}

/// Bootstrapped discount/forward curve sampled on its native uniform grid.
///
/// The table performs exact-grid lookup only. Requests off the grid are a
/// calling-convention violation and surface as
/// [`PricingError::MarketDataMissing`]; nothing is interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveTable {
    spacing: f64,
    points: Vec<CurvePoint>,
}

impl CurveTable {
    /// Creates a table whose first node sits at `t = spacing`.
    pub fn new(spacing: f64, points: Vec<CurvePoint>) -> Result<Self, PricingError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(PricingError::InvalidInput(
                "curve spacing must be finite and > 0".to_string(),
            ));
        }
        if points.is_empty() {
            return Err(PricingError::InvalidInput(
                "curve table must hold at least one node".to_string(),
            ));
        }

        Ok(Self { spacing, points })
    }

    /// Flat curve helper: continuous OIS zero rate and a constant forward
    /// LIBOR on every period out to `horizon`.
    pub fn flat(
        spacing: f64,
        horizon: f64,
        ois_rate: f64,
        fwd_libor: f64,
    ) -> Result<Self, PricingError> {
        if !horizon.is_finite() || horizon < spacing {
            return Err(PricingError::InvalidInput(
                "curve horizon must reach the first grid node".to_string(),
            ));
        }

        let count = (horizon / spacing).round() as usize;
        let points = (1..=count)
            .map(|i| {
                let t = i as f64 * spacing;
                CurvePoint {
                    df_ois: (-ois_rate * t).exp(),
                    fwd_libor,
                }
            })
            .collect();
        Self::new(spacing, points)
    }

    /// Grid spacing in years.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Last grid date in years.
    pub fn horizon(&self) -> f64 {
        self.spacing * self.points.len() as f64
    }

    /// Node lookup at time `t`; errs when `t` falls off the grid.
    pub fn at(&self, t: f64) -> Result<CurvePoint, PricingError> {
        let ratio = t / self.spacing;
        let nearest = ratio.round();
        if nearest < 1.0 || (ratio - nearest).abs() > GRID_SNAP {
            return Err(PricingError::MarketDataMissing(format!(
                "no curve node at t = {t}"
            )));
        }

        self.points
            .get(nearest as usize - 1)
            .copied()
            .ok_or_else(|| PricingError::MarketDataMissing(format!("curve ends before t = {t}")))
    }

    /// OIS discount factor at grid time `t`.
    pub fn discount_factor(&self, t: f64) -> Result<f64, PricingError> {
        Ok(self.at(t)?.df_ois)
    }

    /// Annuity-weighted forward swap rate of the swap running from `expiry`
    /// to `expiry + tenor` with `frequency` fixed payments per year.
    ///
    /// Every payment date must land on the curve grid. The weighting matches
    /// the annuity numeraire of the pricing layer: the same accrual fraction
    /// multiplies the discount factor in both numerator and denominator.
    pub fn forward_swap_rate(
        &self,
        expiry: f64,
        tenor: f64,
        frequency: f64,
    ) -> Result<f64, PricingError> {
        if !expiry.is_finite() || expiry < 0.0 {
            return Err(PricingError::InvalidInput(
                "swap expiry must be finite and >= 0".to_string(),
            ));
        }
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(PricingError::InvalidInput(
                "swap frequency must be finite and > 0".to_string(),
            ));
        }
        let periods_exact = tenor * frequency;
        let periods = periods_exact.round();
        if !tenor.is_finite() || periods < 1.0 || (periods_exact - periods).abs() > GRID_SNAP {
            return Err(PricingError::InvalidInput(
                "swap tenor must be a whole, positive number of payment periods".to_string(),
            ));
        }

        let delta = 1.0 / frequency;
        let mut annuity = 0.0;
        let mut floating = 0.0;
        for i in 1..=(periods as usize) {
            let node = self.at(expiry + i as f64 * delta)?;
            annuity += delta * node.df_ois;
            floating += delta * node.df_ois * node.fwd_libor;
        }

        Ok(floating / annuity)
    }
}
