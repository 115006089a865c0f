//! Rounding of settled amounts to the currency's atomic unit.
//!
//! Net amounts are always rounded upward: the sum collected from members may
//! exceed the bill by a few atomic units but never falls short of it.

use crate::model::Money;
use thiserror::Error;

const MAX_SETTLEMENT_SCALE: u32 = 22;

/// Currencies settled in whole units.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK", "UGX"];

/// Rounding mode for net amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round toward positive infinity at the atomic unit.
    Ceiling,
}

/// Context for settlement rounding.
///
/// # Example
/// ```
/// use harn_domain::services::{RoundingMode, SettlementContext};
///
/// let ctx = SettlementContext {
///     scale: 2, // satang
///     rounding_mode: RoundingMode::Ceiling,
/// };
/// assert_eq!(ctx, SettlementContext::thb_default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementContext {
    /// Number of decimal places of the atomic unit (2 for THB, 0 for JPY).
    pub scale: u32,
    pub rounding_mode: RoundingMode,
}

impl SettlementContext {
    pub const fn thb_default() -> Self {
        Self {
            scale: 2,
            rounding_mode: RoundingMode::Ceiling,
        }
    }

    /// Picks the scale from an ISO 4217 code; unknown codes settle at two places.
    pub fn for_currency(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let scale = if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
            0
        } else {
            2
        };
        Self {
            scale,
            ..Self::thb_default()
        }
    }

    pub fn validate(self) -> Result<(), SettlementRoundingError> {
        if self.scale <= MAX_SETTLEMENT_SCALE {
            return Ok(());
        }
        Err(SettlementRoundingError::UnsupportedScale {
            scale: self.scale,
            max_supported: MAX_SETTLEMENT_SCALE,
        })
    }

    pub fn round(self, amount: Money) -> Money {
        match self.rounding_mode {
            RoundingMode::Ceiling => amount.round_up(self.scale),
        }
    }
}

impl Default for SettlementContext {
    fn default() -> Self {
        Self::thb_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettlementRoundingError {
    #[error("settlement scale {scale} is not supported (maximum {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}
