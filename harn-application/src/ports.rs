use crate::error::RepositoryError;
use chrono::{DateTime, Utc};
use harn_domain::{
    BankAccount, BankAccountId, Bill, BillId, BillItem, BillMember, ItemId, ItemSplit, JoinCode,
    UserId,
};
use std::collections::HashMap;

/// Storage for bills and everything that hangs off them.
///
/// Lookups of a record that does not exist return `Ok(None)`; updates of a
/// record that does not exist return [`RepositoryError::Missing`].
pub trait BillRepository: Send + Sync {
    /// Stores a new bill together with its owner member.
    fn insert_bill(&self, bill: Bill, owner: BillMember) -> Result<(), RepositoryError>;

    fn bill(&self, id: BillId) -> Result<Option<Bill>, RepositoryError>;

    fn bill_by_join_code(&self, code: &JoinCode) -> Result<Option<Bill>, RepositoryError>;

    /// Every bill owned by `owner`, soft-deleted ones included.
    fn bills_owned_by(&self, owner: &UserId) -> Result<Vec<Bill>, RepositoryError>;

    fn save_bill(&self, bill: &Bill) -> Result<(), RepositoryError>;

    /// Members in the order they joined.
    fn members(&self, bill: BillId) -> Result<Vec<BillMember>, RepositoryError>;

    fn insert_member(&self, member: BillMember) -> Result<(), RepositoryError>;

    fn save_member(&self, member: &BillMember) -> Result<(), RepositoryError>;

    /// Items by order index, then insertion order. Splits are included.
    fn items(&self, bill: BillId) -> Result<Vec<BillItem>, RepositoryError>;

    fn item(&self, id: ItemId) -> Result<Option<BillItem>, RepositoryError>;

    fn insert_item(&self, item: BillItem) -> Result<(), RepositoryError>;

    fn save_item(&self, item: &BillItem) -> Result<(), RepositoryError>;

    fn remove_item(&self, id: ItemId) -> Result<(), RepositoryError>;

    /// Swaps the whole split set of an item. Readers see the old set or the
    /// new one, never a mix.
    fn replace_splits(&self, item: ItemId, splits: Vec<ItemSplit>) -> Result<(), RepositoryError>;
}

pub trait BankAccountRepository: Send + Sync {
    fn accounts(&self, user: &UserId) -> Result<Vec<BankAccount>, RepositoryError>;

    fn account(&self, id: BankAccountId) -> Result<Option<BankAccount>, RepositoryError>;

    fn insert_account(&self, account: BankAccount) -> Result<(), RepositoryError>;

    fn save_account(&self, account: &BankAccount) -> Result<(), RepositoryError>;

    fn remove_account(&self, id: BankAccountId) -> Result<(), RepositoryError>;

    fn default_account(&self, user: &UserId) -> Result<Option<BankAccount>, RepositoryError> {
        Ok(self
            .accounts(user)?
            .into_iter()
            .find(|account| account.is_default))
    }
}

pub trait JoinCodeGenerator: Send + Sync {
    fn generate(&self) -> JoinCode;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait UserDirectory: Send + Sync {
    fn display_name(&self, user: &UserId) -> Option<String>;
}

impl UserDirectory for HashMap<UserId, String> {
    fn display_name(&self, user: &UserId) -> Option<String> {
        self.get(user).cloned()
    }
}
