use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Settlement side of a European swaption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwaptionSide {
    /// Right to receive fixed; a put on the swap rate.
    Receiver,
    /// Right to pay fixed; a call on the swap rate.
    Payer,
}

impl SwaptionSide {
    /// Returns +1.0 for payers and -1.0 for receivers.
    pub fn sign(self) -> f64 {
        match self {
            Self::Payer => 1.0,
            Self::Receiver => -1.0,
        }
    }
}

/// One point on the (expiry, tenor) pricing grid.
///
/// Identifies which smile parameters and forward swap rate apply to a pricing
/// request; carries no market data itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPoint {
    /// Option expiry in years.
    pub expiry: f64,
    /// Underlying swap tenor in years.
    pub tenor: f64,
    /// Fixed-leg payments per year.
    pub frequency: f64,
}

impl MarketPoint {
    /// Creates a grid point.
    pub fn new(expiry: f64, tenor: f64, frequency: f64) -> Self {
        Self {
            expiry,
            tenor,
            frequency,
        }
    }

    /// Validates request fields.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.expiry.is_finite() || self.expiry <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market point expiry must be finite and > 0".to_string(),
            ));
        }
        if !self.tenor.is_finite() || self.tenor <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market point tenor must be finite and > 0".to_string(),
            ));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market point frequency must be finite and > 0".to_string(),
            ));
        }

        Ok(())
    }
}
