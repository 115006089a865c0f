//! Per-member settlement of one bill.
//!
//! The engine runs in two passes over a bill snapshot:
//! 1. every item's total is allocated to members by weight (or by fixed amount),
//!    falling back to the owner when nobody is assigned;
//! 2. service charge and VAT are applied to each member's base amount and the
//!    result is rounded up to the atomic unit.
//!
//! No rounding happens in the first pass. The grand total is the sum of the
//! rounded per-member amounts, so it always matches what members are shown.

use crate::{
    model::{
        Allocation, AmountOverflow, Bill, BillItem, BillMember, FeeConfigError, FeeRates, IntegrityWarning,
        ItemId, ItemShare, MemberId, MemberSettlement, Money, Settlement, SettlementKey,
        UNASSIGNED_SUFFIX, Weight,
    },
    services::{FeePolicy, SettlementContext, SettlementRoundingError},
};
use fxhash::FxHashMap;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("bill has no members")]
    NoMembers,
    #[error("settlement key {0} is shared by more than one member")]
    DuplicateSettlementKey(SettlementKey),
    #[error("split on item {item_id} references member {member_id} outside this bill")]
    UnknownSplitMember { item_id: ItemId, member_id: MemberId },
    #[error("split on item {item_id} has a negative weight for member {member_id}")]
    NegativeWeight { item_id: ItemId, member_id: MemberId },
    #[error("split on item {item_id} has a negative fixed amount for member {member_id}")]
    NegativeFixedAmount { item_id: ItemId, member_id: MemberId },
    #[error(transparent)]
    InvalidFees(#[from] FeeConfigError),
    #[error(transparent)]
    Rounding(#[from] SettlementRoundingError),
    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
}

/// Settlement calculation service
pub struct SettlementEngine;

impl SettlementEngine {
    /// Settles `bill` at the scale of its currency.
    pub fn compute(
        &self,
        bill: &Bill,
        items: &[BillItem],
        members: &[BillMember],
    ) -> Result<Settlement, SettlementError> {
        self.compute_with_context(bill, items, members, bill.settlement_context())
    }

    /// Settles `bill` with an explicit rounding context.
    ///
    /// The snapshot must be complete: every member of the bill and every split
    /// of every item. Splits that point outside `members` are rejected rather
    /// than skipped.
    pub fn compute_with_context(
        &self,
        bill: &Bill,
        items: &[BillItem],
        members: &[BillMember],
        context: SettlementContext,
    ) -> Result<Settlement, SettlementError> {
        bill.fees.validate()?;
        context.validate()?;

        let mut ledger = Ledger::open(bill, members)?;

        tracing::debug!(
            bill_id = %bill.id,
            member_count = members.len(),
            item_count = items.len(),
            scale = context.scale,
            "Settlement started"
        );

        for item in items {
            ledger.allocate(item)?;
        }

        let policy = FeePolicy::new(&bill.fees, context);
        let Ledger {
            accounts, warnings, ..
        } = ledger;
        let members = accounts
            .into_values()
            .map(|account| account.settle(&policy))
            .collect::<Result<Vec<MemberSettlement>, _>>()?;
        let grand_total = members
            .iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m.net_amount))?;

        tracing::debug!(
            bill_id = %bill.id,
            grand_total = %grand_total,
            warning_count = warnings.len(),
            "Settlement finished"
        );

        Ok(Settlement {
            bill_id: bill.id,
            title: bill.title.clone(),
            config: FeeRates {
                vat: bill.fees.vat_rate,
                sc: bill.fees.service_charge_rate,
            },
            members,
            grand_total,
            warnings,
        })
    }
}

/// Running base amount and itemized shares of one member.
struct Account<'a> {
    member: &'a BillMember,
    base: Money,
    items: Vec<ItemShare>,
}

impl<'a> Account<'a> {
    fn new(member: &'a BillMember) -> Self {
        Self {
            member,
            base: Money::ZERO,
            items: Vec::new(),
        }
    }

    fn credit(&mut self, share: ItemShare) -> Result<(), AmountOverflow> {
        self.base = self.base.checked_add(share.amount)?;
        self.items.push(share);
        Ok(())
    }

    fn settle(self, policy: &FeePolicy<'_>) -> Result<MemberSettlement, AmountOverflow> {
        let fees = policy.apply(self.base)?;
        Ok(MemberSettlement {
            member_id: self.member.id,
            user_id: self.member.user.clone(),
            name: self.member.name.clone(),
            is_paid: self.member.is_paid,
            base_amount: fees.base,
            sc_amount: fees.service_charge,
            vat_amount: fees.vat,
            net_amount: fees.net,
            items: self.items,
        })
    }
}

struct Ledger<'a> {
    bill: &'a Bill,
    accounts: IndexMap<SettlementKey, Account<'a>>,
    keys: FxHashMap<MemberId, SettlementKey>,
    owner_key: SettlementKey,
    warnings: Vec<IntegrityWarning>,
}

impl<'a> Ledger<'a> {
    /// One account per member, keyed once, before any allocation.
    fn open(bill: &'a Bill, members: &'a [BillMember]) -> Result<Self, SettlementError> {
        if members.is_empty() {
            return Err(SettlementError::NoMembers);
        }

        let mut accounts = IndexMap::with_capacity(members.len());
        let mut keys = FxHashMap::default();
        for member in members {
            let key = member.settlement_key();
            if accounts.contains_key(&key) {
                return Err(SettlementError::DuplicateSettlementKey(key));
            }
            keys.insert(member.id, key.clone());
            accounts.insert(key, Account::new(member));
        }

        Ok(Self {
            bill,
            accounts,
            keys,
            owner_key: bill.owner_key(),
            warnings: Vec::new(),
        })
    }

    fn allocate(&mut self, item: &BillItem) -> Result<(), SettlementError> {
        let mut fixed_total = Money::ZERO;
        let mut total_weight = Decimal::ZERO;
        let mut weighted: Vec<(SettlementKey, Weight)> = Vec::with_capacity(item.splits.len());
        let mut fixed: Vec<(SettlementKey, Money)> = Vec::new();

        for split in &item.splits {
            let key = self
                .keys
                .get(&split.member_id)
                .cloned()
                .ok_or(SettlementError::UnknownSplitMember {
                    item_id: item.id,
                    member_id: split.member_id,
                })?;
            match split.fixed_amount {
                Some(amount) => {
                    if amount.is_negative() {
                        return Err(SettlementError::NegativeFixedAmount {
                            item_id: item.id,
                            member_id: split.member_id,
                        });
                    }
                    fixed_total = fixed_total.checked_add(amount)?;
                    fixed.push((key, amount));
                }
                None => {
                    if split.weight.is_negative() {
                        return Err(SettlementError::NegativeWeight {
                            item_id: item.id,
                            member_id: split.member_id,
                        });
                    }
                    total_weight = total_weight
                        .checked_add(split.weight.value())
                        .ok_or(AmountOverflow)?;
                    weighted.push((key, split.weight));
                }
            }
        }

        let has_fixed = !fixed.is_empty();
        for (key, amount) in fixed {
            self.credit(
                &key,
                ItemShare {
                    item_id: item.id,
                    name: item.name.clone(),
                    amount,
                    weight: None,
                    allocation: Allocation::Fixed,
                },
            )?;
        }

        let remainder = item.total_price() - fixed_total;
        if remainder.is_negative() {
            let excess = fixed_total - item.total_price();
            tracing::warn!(
                bill_id = %self.bill.id,
                item_id = %item.id,
                excess = %excess,
                "Fixed amounts exceed item total; weighted splits receive nothing"
            );
            self.warnings.push(IntegrityWarning::FixedAmountsExceedTotal {
                item_id: item.id,
                excess,
            });
            return Ok(());
        }

        if total_weight > Decimal::ZERO {
            for (key, weight) in weighted {
                let share = remainder
                    .checked_mul(weight.value())?
                    .checked_div(total_weight)?;
                self.credit(
                    &key,
                    ItemShare {
                        item_id: item.id,
                        name: item.name.clone(),
                        amount: share,
                        weight: Some(weight),
                        allocation: Allocation::Weighted,
                    },
                )?;
            }
        } else if !(has_fixed && remainder.is_zero()) {
            self.assign_to_owner(item, remainder)?;
        }

        Ok(())
    }

    fn assign_to_owner(&mut self, item: &BillItem, amount: Money) -> Result<(), AmountOverflow> {
        let share = ItemShare {
            item_id: item.id,
            name: format!("{} {UNASSIGNED_SUFFIX}", item.name),
            amount,
            weight: None,
            allocation: Allocation::Unassigned,
        };
        match self.accounts.get_mut(&self.owner_key) {
            Some(owner) => owner.credit(share)?,
            None => {
                tracing::warn!(
                    bill_id = %self.bill.id,
                    item_id = %item.id,
                    owner = %self.bill.owner,
                    amount = %amount,
                    "Unassigned item has no owner member to fall back to"
                );
                self.warnings.push(IntegrityWarning::OwnerMemberMissing {
                    item_id: item.id,
                    amount,
                });
            }
        }
        Ok(())
    }

    fn credit(&mut self, key: &SettlementKey, share: ItemShare) -> Result<(), AmountOverflow> {
        match self.accounts.get_mut(key) {
            Some(account) => account.credit(share),
            None => Ok(()),
        }
    }
}
