#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Allocation, AmountOverflow, BankAccount, BankAccountId, Bill, BillId, BillItem, BillMember,
    BillStatus, FeeConfig, FeeConfigError, FeeRates, IntegrityWarning, ItemId, ItemShare,
    ItemSplit, JOIN_CODE_ALPHABET, JOIN_CODE_LEN, JoinCode, MemberId, MemberSettlement, Money,
    PaymentSnapshot, Percent, Settlement, SettlementKey, UNASSIGNED_SUFFIX, UserId, Weight,
};
pub use services::{
    SettlementContext, SettlementEngine, SettlementError, SplitValidationError, SplitValidator,
};
