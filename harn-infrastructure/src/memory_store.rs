use dashmap::DashMap;
use harn_application::{BankAccountRepository, BillRepository, RepositoryError, Resource};
use harn_domain::{
    BankAccount, BankAccountId, Bill, BillId, BillItem, BillMember, ItemId, ItemSplit, JoinCode,
    MemberId, UserId,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A bill with everything stored under it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub bill: Bill,
    pub members: Vec<BillMember>,
    pub items: Vec<BillItem>,
}

/// Serializable image of an [`InMemoryStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub bills: Vec<BillRecord>,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
}

#[derive(Debug)]
struct StoredBill {
    bill: Bill,
    members: IndexMap<MemberId, BillMember>,
    items: IndexMap<ItemId, BillItem>,
}

/// In-memory storage for bills and bank accounts.
///
/// # Invariant
/// Members and items live inside their bill's entry, so every write to one
/// bill holds that entry's lock. Split replacement therefore swaps the whole
/// set in one step.
///
/// Secondary indexes (join code, item, account) are only read to find the
/// owning entry and are never held while that entry is locked.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    bills: Arc<DashMap<BillId, StoredBill>>,
    join_codes: Arc<DashMap<JoinCode, BillId>>,
    item_bills: Arc<DashMap<ItemId, BillId>>,
    accounts: Arc<DashMap<UserId, IndexMap<BankAccountId, BankAccount>>>,
    account_owners: Arc<DashMap<BankAccountId, UserId>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for record in snapshot.bills {
            let bill_id = record.bill.id;
            store.join_codes.insert(record.bill.join_code.clone(), bill_id);
            for item in &record.items {
                store.item_bills.insert(item.id, bill_id);
            }
            store.bills.insert(
                bill_id,
                StoredBill {
                    bill: record.bill,
                    members: record.members.into_iter().map(|m| (m.id, m)).collect(),
                    items: record.items.into_iter().map(|i| (i.id, i)).collect(),
                },
            );
        }
        for account in snapshot.bank_accounts {
            store.account_owners.insert(account.id, account.user.clone());
            store
                .accounts
                .entry(account.user.clone())
                .or_default()
                .insert(account.id, account);
        }
        store
    }

    /// Copies the current contents, bills oldest first.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut bills: Vec<BillRecord> = self
            .bills
            .iter()
            .map(|entry| BillRecord {
                bill: entry.bill.clone(),
                members: entry.members.values().cloned().collect(),
                items: entry.items.values().cloned().collect(),
            })
            .collect();
        bills.sort_by(|a, b| {
            a.bill
                .created_at
                .cmp(&b.bill.created_at)
                .then_with(|| a.bill.id.cmp(&b.bill.id))
        });

        let mut bank_accounts: Vec<BankAccount> = self
            .accounts
            .iter()
            .flat_map(|entry| entry.values().cloned().collect::<Vec<_>>())
            .collect();
        bank_accounts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        StoreSnapshot {
            bills,
            bank_accounts,
        }
    }

    fn bill_of_item(&self, item: ItemId) -> Result<BillId, RepositoryError> {
        self.item_bills
            .get(&item)
            .map(|entry| *entry.value())
            .ok_or_else(|| missing(Resource::Item, item))
    }
}

fn missing(resource: Resource, id: impl ToString) -> RepositoryError {
    RepositoryError::Missing {
        resource,
        id: id.to_string(),
    }
}

fn duplicate(resource: Resource, id: impl ToString) -> RepositoryError {
    RepositoryError::Duplicate {
        resource,
        id: id.to_string(),
    }
}

impl BillRepository for InMemoryStore {
    fn insert_bill(&self, bill: Bill, owner: BillMember) -> Result<(), RepositoryError> {
        if self.bills.contains_key(&bill.id) {
            return Err(duplicate(Resource::Bill, bill.id));
        }
        if self.join_codes.contains_key(&bill.join_code) {
            return Err(duplicate(Resource::Bill, &bill.join_code));
        }

        self.join_codes.insert(bill.join_code.clone(), bill.id);
        let mut members = IndexMap::new();
        members.insert(owner.id, owner);
        self.bills.insert(
            bill.id,
            StoredBill {
                bill,
                members,
                items: IndexMap::new(),
            },
        );
        Ok(())
    }

    fn bill(&self, id: BillId) -> Result<Option<Bill>, RepositoryError> {
        Ok(self.bills.get(&id).map(|entry| entry.bill.clone()))
    }

    fn bill_by_join_code(&self, code: &JoinCode) -> Result<Option<Bill>, RepositoryError> {
        let Some(bill_id) = self.join_codes.get(code).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.bill(bill_id)
    }

    fn bills_owned_by(&self, owner: &UserId) -> Result<Vec<Bill>, RepositoryError> {
        Ok(self
            .bills
            .iter()
            .filter(|entry| &entry.bill.owner == owner)
            .map(|entry| entry.bill.clone())
            .collect())
    }

    fn save_bill(&self, bill: &Bill) -> Result<(), RepositoryError> {
        let mut entry = self
            .bills
            .get_mut(&bill.id)
            .ok_or_else(|| missing(Resource::Bill, bill.id))?;
        entry.bill = bill.clone();
        Ok(())
    }

    fn members(&self, bill: BillId) -> Result<Vec<BillMember>, RepositoryError> {
        Ok(self
            .bills
            .get(&bill)
            .map(|entry| entry.members.values().cloned().collect())
            .unwrap_or_default())
    }

    fn insert_member(&self, member: BillMember) -> Result<(), RepositoryError> {
        let mut entry = self
            .bills
            .get_mut(&member.bill_id)
            .ok_or_else(|| missing(Resource::Bill, member.bill_id))?;
        if entry.members.contains_key(&member.id) {
            return Err(duplicate(Resource::Member, member.id));
        }
        entry.members.insert(member.id, member);
        Ok(())
    }

    fn save_member(&self, member: &BillMember) -> Result<(), RepositoryError> {
        let mut entry = self
            .bills
            .get_mut(&member.bill_id)
            .ok_or_else(|| missing(Resource::Bill, member.bill_id))?;
        let stored = entry
            .members
            .get_mut(&member.id)
            .ok_or_else(|| missing(Resource::Member, member.id))?;
        *stored = member.clone();
        Ok(())
    }

    fn items(&self, bill: BillId) -> Result<Vec<BillItem>, RepositoryError> {
        let mut items: Vec<BillItem> = self
            .bills
            .get(&bill)
            .map(|entry| entry.items.values().cloned().collect())
            .unwrap_or_default();
        // Stable: unordered items keep insertion order after the ordered ones.
        items.sort_by_key(|item| (item.order_index.is_none(), item.order_index));
        Ok(items)
    }

    fn item(&self, id: ItemId) -> Result<Option<BillItem>, RepositoryError> {
        let Some(bill_id) = self.item_bills.get(&id).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self
            .bills
            .get(&bill_id)
            .and_then(|entry| entry.items.get(&id).cloned()))
    }

    fn insert_item(&self, item: BillItem) -> Result<(), RepositoryError> {
        if self.item_bills.contains_key(&item.id) {
            return Err(duplicate(Resource::Item, item.id));
        }
        let item_id = item.id;
        let bill_id = item.bill_id;
        {
            let mut entry = self
                .bills
                .get_mut(&bill_id)
                .ok_or_else(|| missing(Resource::Bill, bill_id))?;
            entry.items.insert(item_id, item);
        }
        self.item_bills.insert(item_id, bill_id);
        Ok(())
    }

    fn save_item(&self, item: &BillItem) -> Result<(), RepositoryError> {
        let bill_id = self.bill_of_item(item.id)?;
        let mut entry = self
            .bills
            .get_mut(&bill_id)
            .ok_or_else(|| missing(Resource::Bill, bill_id))?;
        let stored = entry
            .items
            .get_mut(&item.id)
            .ok_or_else(|| missing(Resource::Item, item.id))?;
        *stored = item.clone();
        Ok(())
    }

    fn remove_item(&self, id: ItemId) -> Result<(), RepositoryError> {
        let bill_id = self.bill_of_item(id)?;
        {
            let mut entry = self
                .bills
                .get_mut(&bill_id)
                .ok_or_else(|| missing(Resource::Bill, bill_id))?;
            entry.items.shift_remove(&id);
        }
        self.item_bills.remove(&id);
        Ok(())
    }

    fn replace_splits(&self, item: ItemId, splits: Vec<ItemSplit>) -> Result<(), RepositoryError> {
        let bill_id = self.bill_of_item(item)?;
        let mut entry = self
            .bills
            .get_mut(&bill_id)
            .ok_or_else(|| missing(Resource::Bill, bill_id))?;
        let stored = entry
            .items
            .get_mut(&item)
            .ok_or_else(|| missing(Resource::Item, item))?;
        stored.splits = splits;
        Ok(())
    }
}

impl BankAccountRepository for InMemoryStore {
    fn accounts(&self, user: &UserId) -> Result<Vec<BankAccount>, RepositoryError> {
        Ok(self
            .accounts
            .get(user)
            .map(|entry| entry.values().cloned().collect())
            .unwrap_or_default())
    }

    fn account(&self, id: BankAccountId) -> Result<Option<BankAccount>, RepositoryError> {
        let Some(user) = self.account_owners.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .get(&user)
            .and_then(|entry| entry.get(&id).cloned()))
    }

    fn insert_account(&self, account: BankAccount) -> Result<(), RepositoryError> {
        if self.account_owners.contains_key(&account.id) {
            return Err(duplicate(Resource::BankAccount, account.id));
        }
        self.account_owners.insert(account.id, account.user.clone());
        self.accounts
            .entry(account.user.clone())
            .or_default()
            .insert(account.id, account);
        Ok(())
    }

    fn save_account(&self, account: &BankAccount) -> Result<(), RepositoryError> {
        let mut entry = self
            .accounts
            .get_mut(&account.user)
            .ok_or_else(|| missing(Resource::BankAccount, account.id))?;
        let stored = entry
            .get_mut(&account.id)
            .ok_or_else(|| missing(Resource::BankAccount, account.id))?;
        *stored = account.clone();
        Ok(())
    }

    fn remove_account(&self, id: BankAccountId) -> Result<(), RepositoryError> {
        let (_, user) = self
            .account_owners
            .remove(&id)
            .ok_or_else(|| missing(Resource::BankAccount, id))?;
        if let Some(mut entry) = self.accounts.get_mut(&user) {
            entry.shift_remove(&id);
        }
        Ok(())
    }
}
