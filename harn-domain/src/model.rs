use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Sub, SubAssign},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::SettlementContext;

/// Label appended to an item that nobody was assigned to.
pub const UNASSIGNED_SUFFIX: &str = "(Unassigned)";

pub const JOIN_CODE_LEN: usize = 6;
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id!(BillId);
uuid_id!(
    /// Identifies a participant row of one bill, registered or guest.
    MemberId
);
uuid_id!(ItemId);
uuid_id!(BankAccountId);

/// Reference to an externally authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key that attributes amounts to a member for the whole of one settlement.
///
/// Registered members are keyed by their user reference, guests by their member id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SettlementKey {
    User(UserId),
    Member(MemberId),
}

impl fmt::Display for SettlementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementKey::User(user) => write!(f, "{user}"),
            SettlementKey::Member(member) => write!(f, "{member}"),
        }
    }
}

/// An amount left the range a [`Decimal`] can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("amount is too large to represent")]
pub struct AmountOverflow;

/// Exact decimal amount of money.
///
/// The operator impls panic on overflow; code that handles user-supplied
/// amounts uses the `checked_*` forms.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, AmountOverflow> {
        self.0.checked_add(rhs.0).map(Self).ok_or(AmountOverflow)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Result<Self, AmountOverflow> {
        self.0.checked_mul(rhs).map(Self).ok_or(AmountOverflow)
    }

    pub fn checked_div(self, rhs: Decimal) -> Result<Self, AmountOverflow> {
        self.0.checked_div(rhs).map(Self).ok_or(AmountOverflow)
    }

    /// Rounds toward positive infinity at `scale` decimal places.
    pub fn round_up(self, scale: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::ToPositiveInfinity),
        )
    }

    /// Formats with exactly `scale` decimal places, for display only.
    pub fn to_fixed(self, scale: u32) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(scale, RoundingStrategy::ToPositiveInfinity);
        format!("{rounded:.prec$}", prec = scale as usize)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A rate expressed in percent, e.g. `7` for 7 % VAT.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// The rate as a fraction, `7 %` becomes `0.07`.
    pub fn fraction(self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Relative share of one split among all splits of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Weight {
    pub const ONE: Self = Self(Decimal::ONE);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeeConfigError {
    #[error("VAT rate must not be negative (found {0})")]
    NegativeVatRate(Percent),
    #[error("service charge rate must not be negative (found {0})")]
    NegativeServiceChargeRate(Percent),
}

/// Bill-level fee configuration.
///
/// An included fee is already part of the listed prices and is never added again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub vat_rate: Percent,
    pub service_charge_rate: Percent,
    #[serde(rename = "isVatIncluded")]
    pub vat_included: bool,
    #[serde(rename = "isServiceChargeIncluded")]
    pub service_charge_included: bool,
}

impl FeeConfig {
    pub fn new(
        vat_rate: Percent,
        service_charge_rate: Percent,
        vat_included: bool,
        service_charge_included: bool,
    ) -> Result<Self, FeeConfigError> {
        let config = Self {
            vat_rate,
            service_charge_rate,
            vat_included,
            service_charge_included,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeeConfigError> {
        if self.vat_rate.is_negative() {
            return Err(FeeConfigError::NegativeVatRate(self.vat_rate));
        }
        if self.service_charge_rate.is_negative() {
            return Err(FeeConfigError::NegativeServiceChargeRate(
                self.service_charge_rate,
            ));
        }
        Ok(())
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            vat_rate: Percent::from_i64(7),
            service_charge_rate: Percent::from_i64(10),
            vat_included: false,
            service_charge_included: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    #[default]
    Draft,
    Completed,
    Cancelled,
}

/// Six-character code that lets a user join a bill.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Normalizes to upper case and checks length and alphabet.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() != JOIN_CODE_LEN || !code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)) {
            return None;
        }
        Some(Self(code))
    }

    /// Builds a code from alphabet positions; positions wrap around the alphabet.
    pub fn from_indices(indices: [usize; JOIN_CODE_LEN]) -> Self {
        let code = indices
            .iter()
            .map(|idx| char::from(JOIN_CODE_ALPHABET[idx % JOIN_CODE_ALPHABET.len()]))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner payment details copied onto a bill when it is closed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSnapshot {
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub prompt_pay_name: Option<String>,
    pub prompt_pay_number: Option<String>,
}

impl PaymentSnapshot {
    pub fn from_account(account: &BankAccount) -> Self {
        Self {
            bank_name: Some(account.bank_name.clone()),
            bank_account: Some(account.account_number.clone()),
            prompt_pay_name: Some(account.account_name.clone()),
            prompt_pay_number: Some(account.account_number.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub owner: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub currency: String,
    pub fees: FeeConfig,
    #[serde(default)]
    pub status: BillStatus,
    pub join_code: JoinCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentSnapshot>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn owner_key(&self) -> SettlementKey {
        SettlementKey::User(self.owner.clone())
    }

    pub fn settlement_context(&self) -> SettlementContext {
        SettlementContext::for_currency(&self.currency)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillMember {
    pub id: MemberId,
    pub bill_id: BillId,
    /// `None` for a guest without a login.
    #[serde(rename = "userId")]
    pub user: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl BillMember {
    pub fn registered(id: MemberId, bill_id: BillId, user: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            bill_id,
            user: Some(user),
            name: name.into(),
            is_paid: false,
            paid_at: None,
            verified_at: None,
        }
    }

    pub fn guest(id: MemberId, bill_id: BillId, name: impl Into<String>) -> Self {
        Self {
            id,
            bill_id,
            user: None,
            name: name.into(),
            is_paid: false,
            paid_at: None,
            verified_at: None,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user.is_none()
    }

    pub fn settlement_key(&self) -> SettlementKey {
        match &self.user {
            Some(user) => SettlementKey::User(user.clone()),
            None => SettlementKey::Member(self.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSplit {
    pub member_id: MemberId,
    #[serde(default)]
    pub weight: Weight,
    /// Flat amount that replaces weighted allocation for this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_amount: Option<Money>,
}

impl ItemSplit {
    pub fn weighted(member_id: MemberId, weight: Weight) -> Self {
        Self {
            member_id,
            weight,
            fixed_amount: None,
        }
    }

    pub fn fixed(member_id: MemberId, amount: Money) -> Self {
        Self {
            member_id,
            weight: Weight::ONE,
            fixed_amount: Some(amount),
        }
    }
}

/// A line item. `total_price` is kept equal to `price × quantity` on every mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub id: ItemId,
    pub bill_id: BillId,
    pub name: String,
    price: Money,
    quantity: u32,
    total_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(default)]
    pub splits: Vec<ItemSplit>,
}

impl BillItem {
    pub fn new(
        id: ItemId,
        bill_id: BillId,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Result<Self, AmountOverflow> {
        Ok(Self {
            id,
            bill_id,
            name: name.into(),
            price,
            quantity,
            total_price: line_total(price, quantity)?,
            order_index: None,
            splits: Vec::new(),
        })
    }

    pub fn with_order_index(mut self, order_index: u32) -> Self {
        self.order_index = Some(order_index);
        self
    }

    pub fn with_splits(mut self, splits: Vec<ItemSplit>) -> Self {
        self.splits = splits;
        self
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Leaves the item unchanged when the new total would overflow.
    pub fn set_price(&mut self, price: Money) -> Result<(), AmountOverflow> {
        self.total_price = line_total(price, self.quantity)?;
        self.price = price;
        Ok(())
    }

    /// Leaves the item unchanged when the new total would overflow.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), AmountOverflow> {
        self.total_price = line_total(self.price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

fn line_total(price: Money, quantity: u32) -> Result<Money, AmountOverflow> {
    price.checked_mul(Decimal::from(quantity))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: BankAccountId,
    pub user: UserId,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// How an item share came to be attributed to a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Allocation {
    Weighted,
    Fixed,
    Unassigned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemShare {
    pub item_id: ItemId,
    pub name: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    pub allocation: Allocation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSettlement {
    pub member_id: MemberId,
    pub user_id: Option<UserId>,
    pub name: String,
    pub is_paid: bool,
    pub base_amount: Money,
    pub sc_amount: Money,
    pub vat_amount: Money,
    pub net_amount: Money,
    pub items: Vec<ItemShare>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRates {
    pub vat: Percent,
    pub sc: Percent,
}

/// Non-fatal inconsistency found while settling a bill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IntegrityWarning {
    /// An unassigned amount had no owner member to fall back to.
    OwnerMemberMissing { item_id: ItemId, amount: Money },
    /// Fixed amounts on an item add up to more than its total.
    FixedAmountsExceedTotal { item_id: ItemId, excess: Money },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub bill_id: BillId,
    pub title: String,
    pub config: FeeRates,
    pub members: Vec<MemberSettlement>,
    /// Sum of the already rounded `net_amount` values.
    pub grand_total: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

impl Settlement {
    pub fn member(&self, member_id: MemberId) -> Option<&MemberSettlement> {
        self.members.iter().find(|m| m.member_id == member_id)
    }
}
