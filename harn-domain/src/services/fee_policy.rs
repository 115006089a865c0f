use crate::{
    model::{AmountOverflow, FeeConfig, Money},
    services::SettlementContext,
};

/// Fees owed on top of one member's base amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub base: Money,
    pub service_charge: Money,
    pub vat: Money,
    /// `base + service_charge + vat`, rounded up to the atomic unit.
    pub net: Money,
}

impl FeeBreakdown {
    pub fn unrounded_total(&self) -> Money {
        self.base + self.service_charge + self.vat
    }
}

/// Applies service charge and VAT to a base amount.
///
/// Service charge comes first; VAT is charged on the base plus service charge.
pub struct FeePolicy<'a> {
    fees: &'a FeeConfig,
    context: SettlementContext,
}

impl<'a> FeePolicy<'a> {
    pub fn new(fees: &'a FeeConfig, context: SettlementContext) -> Self {
        Self { fees, context }
    }

    pub fn apply(&self, base: Money) -> Result<FeeBreakdown, AmountOverflow> {
        let mut current = base;

        let service_charge =
            if !self.fees.service_charge_included && self.fees.service_charge_rate.is_positive() {
                current.checked_mul(self.fees.service_charge_rate.fraction())?
            } else {
                Money::ZERO
            };
        current = current.checked_add(service_charge)?;

        let vat = if !self.fees.vat_included && self.fees.vat_rate.is_positive() {
            current.checked_mul(self.fees.vat_rate.fraction())?
        } else {
            Money::ZERO
        };
        current = current.checked_add(vat)?;

        Ok(FeeBreakdown {
            base,
            service_charge,
            vat,
            net: self.context.round(current),
        })
    }
}
