use harn_domain::{
    Bill, BillId, BillItem, BillMember, BillStatus, FeeConfig, ItemId, ItemSplit, MemberId, Money,
    PaymentSnapshot, Settlement, Weight,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "THB";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub fees: FeeConfig,
}

impl NewBill {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            note: None,
            currency: None,
            fees: FeeConfig::default(),
        }
    }

    pub fn with_fees(mut self, fees: FeeConfig) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// Partial update of a bill; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillUpdate {
    pub title: Option<String>,
    pub note: Option<String>,
    pub currency: Option<String>,
    pub fees: Option<FeeConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub bill_id: BillId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAssignment {
    pub item_id: ItemId,
    pub splits: Vec<ItemSplit>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOverview {
    #[serde(flatten)]
    pub bill: Bill,
    pub member_count: usize,
    pub item_count: usize,
}

/// A bill with its members and items, splits included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillAggregate {
    #[serde(flatten)]
    pub bill: Bill,
    pub members: Vec<BillMember>,
    pub items: Vec<BillItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub bill_id: BillId,
    pub member: BillMember,
    pub already_joined: bool,
}

/// One split of an item with the member's display name resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitView {
    pub member_id: MemberId,
    pub member_name: String,
    pub weight: Weight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_amount: Option<Money>,
}

/// Settlement of a bill plus its lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    #[serde(flatten)]
    pub settlement: Settlement,
    pub currency: String,
    pub status: BillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentSnapshot>,
}
