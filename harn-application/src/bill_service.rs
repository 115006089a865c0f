use crate::{
    error::{BillError, Field, InvalidInput, Resource, Role},
    model::{
        BillAggregate, BillOverview, BillSummary, BillUpdate, DEFAULT_CURRENCY, ItemUpdate,
        JoinOutcome, NewBankAccount, NewBill, NewItem, SplitAssignment, SplitView,
    },
    ports::{BankAccountRepository, BillRepository, Clock, JoinCodeGenerator, UserDirectory},
};
use harn_domain::{
    BankAccount, BankAccountId, Bill, BillId, BillItem, BillMember, BillStatus, ItemId, JoinCode,
    MemberId, PaymentSnapshot, SettlementEngine, SplitValidator, UserId,
};

const OWNER_FALLBACK_NAME: &str = "Owner";
const MEMBER_FALLBACK_NAME: &str = "Member";
const JOIN_CODE_ATTEMPTS: usize = 32;

/// Bill use cases over the storage, clock and identity ports.
///
/// Authorization and validation happen here, before anything reaches the
/// settlement engine.
#[derive(Clone, Copy)]
pub struct BillService<'a> {
    bills: &'a dyn BillRepository,
    accounts: &'a dyn BankAccountRepository,
    codes: &'a dyn JoinCodeGenerator,
    clock: &'a dyn Clock,
    users: &'a dyn UserDirectory,
}

impl<'a> BillService<'a> {
    pub fn new(
        bills: &'a dyn BillRepository,
        accounts: &'a dyn BankAccountRepository,
        codes: &'a dyn JoinCodeGenerator,
        clock: &'a dyn Clock,
        users: &'a dyn UserDirectory,
    ) -> Self {
        Self {
            bills,
            accounts,
            codes,
            clock,
            users,
        }
    }

    // --- bills ---

    pub fn create_bill(&self, actor: &UserId, new_bill: NewBill) -> Result<BillAggregate, BillError> {
        let title = required(new_bill.title, Field::Title)?;
        let currency = match new_bill.currency {
            Some(code) => normalize_currency(&code)?,
            None => DEFAULT_CURRENCY.to_string(),
        };
        new_bill.fees.validate()?;

        let mut join_code = None;
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let candidate = self.codes.generate();
            if self.bills.bill_by_join_code(&candidate)?.is_none() {
                join_code = Some(candidate);
                break;
            }
        }
        let Some(join_code) = join_code else {
            tracing::warn!(owner = %actor, "Join code space exhausted");
            return Err(BillError::JoinCodeExhausted {
                attempts: JOIN_CODE_ATTEMPTS,
            });
        };

        let bill = Bill {
            id: BillId::random(),
            owner: actor.clone(),
            title,
            note: non_blank(new_bill.note),
            currency,
            fees: new_bill.fees,
            status: BillStatus::Draft,
            join_code,
            payment: None,
            created_at: self.clock.now(),
            deleted_at: None,
        };
        let owner_name = self
            .users
            .display_name(actor)
            .and_then(|name| non_blank(Some(name)))
            .unwrap_or_else(|| OWNER_FALLBACK_NAME.to_string());
        let owner = BillMember::registered(MemberId::random(), bill.id, actor.clone(), owner_name);

        self.bills.insert_bill(bill.clone(), owner.clone())?;
        tracing::info!(bill_id = %bill.id, owner = %actor, join_code = %bill.join_code, "Bill created");

        Ok(BillAggregate {
            bill,
            members: vec![owner],
            items: Vec::new(),
        })
    }

    /// Live bills owned by `actor`, newest first.
    pub fn list_bills(&self, actor: &UserId) -> Result<Vec<BillOverview>, BillError> {
        let mut bills: Vec<Bill> = self
            .bills
            .bills_owned_by(actor)?
            .into_iter()
            .filter(|bill| !bill.is_deleted())
            .collect();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        bills
            .into_iter()
            .map(|bill| {
                let member_count = self.bills.members(bill.id)?.len();
                let item_count = self.bills.items(bill.id)?.len();
                Ok(BillOverview {
                    bill,
                    member_count,
                    item_count,
                })
            })
            .collect()
    }

    pub fn bill(&self, id: BillId) -> Result<BillAggregate, BillError> {
        let bill = self.live_bill(id)?;
        let members = self.bills.members(id)?;
        let items = self.bills.items(id)?;
        Ok(BillAggregate {
            bill,
            members,
            items,
        })
    }

    pub fn update_bill(
        &self,
        id: BillId,
        actor: &UserId,
        update: BillUpdate,
    ) -> Result<Bill, BillError> {
        let mut bill = self.live_bill(id)?;
        require_owner(&bill, actor)?;

        if let Some(title) = update.title {
            bill.title = required(title, Field::Title)?;
        }
        if let Some(note) = update.note {
            bill.note = non_blank(Some(note));
        }
        if let Some(code) = update.currency {
            bill.currency = normalize_currency(&code)?;
        }
        if let Some(fees) = update.fees {
            fees.validate()?;
            bill.fees = fees;
        }

        self.bills.save_bill(&bill)?;
        tracing::info!(bill_id = %bill.id, "Bill updated");
        Ok(bill)
    }

    /// Soft delete: the bill stays in storage, cancelled and hidden.
    pub fn delete_bill(&self, id: BillId, actor: &UserId) -> Result<Bill, BillError> {
        let mut bill = self.live_bill(id)?;
        require_owner(&bill, actor)?;

        bill.deleted_at = Some(self.clock.now());
        bill.status = BillStatus::Cancelled;

        self.bills.save_bill(&bill)?;
        tracing::info!(bill_id = %bill.id, "Bill deleted");
        Ok(bill)
    }

    /// Completes the bill and copies the owner's default bank account onto it.
    ///
    /// The copy is taken once; closing a completed bill again returns it as is.
    pub fn close_bill(&self, id: BillId, actor: &UserId) -> Result<Bill, BillError> {
        let mut bill = self.live_bill(id)?;
        require_owner(&bill, actor)?;

        if bill.status == BillStatus::Completed {
            return Ok(bill);
        }

        let account = self.accounts.default_account(actor)?;
        if account.is_none() {
            tracing::warn!(bill_id = %bill.id, owner = %actor, "Closing bill without a default bank account");
        }
        bill.payment = account.as_ref().map(PaymentSnapshot::from_account);
        bill.status = BillStatus::Completed;

        self.bills.save_bill(&bill)?;
        tracing::info!(bill_id = %bill.id, "Bill closed");
        Ok(bill)
    }

    // --- members ---

    /// Joins `actor` to the bill behind `code`. Joining twice returns the
    /// existing membership.
    pub fn join_bill(&self, actor: &UserId, code: &str) -> Result<JoinOutcome, BillError> {
        let Some(code) = JoinCode::parse(code) else {
            return Err(BillError::NotFound(Resource::Bill));
        };
        let bill = self
            .bills
            .bill_by_join_code(&code)?
            .ok_or(BillError::NotFound(Resource::Bill))?;
        if bill.status == BillStatus::Cancelled || bill.is_deleted() {
            return Err(InvalidInput::BillCancelled.into());
        }

        let members = self.bills.members(bill.id)?;
        if let Some(existing) = members.into_iter().find(|m| m.user.as_ref() == Some(actor)) {
            return Ok(JoinOutcome {
                bill_id: bill.id,
                member: existing,
                already_joined: true,
            });
        }

        let name = self
            .users
            .display_name(actor)
            .and_then(|name| non_blank(Some(name)))
            .unwrap_or_else(|| MEMBER_FALLBACK_NAME.to_string());
        let member = BillMember::registered(MemberId::random(), bill.id, actor.clone(), name);
        self.bills.insert_member(member.clone())?;
        tracing::info!(bill_id = %bill.id, member_id = %member.id, user = %actor, "Member joined");

        Ok(JoinOutcome {
            bill_id: bill.id,
            member,
            already_joined: false,
        })
    }

    /// Adds a member without a login.
    pub fn add_guest(
        &self,
        bill_id: BillId,
        actor: &UserId,
        name: &str,
    ) -> Result<BillMember, BillError> {
        let bill = self.live_bill(bill_id)?;
        let members = self.bills.members(bill_id)?;
        require_participant(&bill, &members, actor)?;

        let member = BillMember::guest(
            MemberId::random(),
            bill_id,
            required(name.to_string(), Field::Name)?,
        );
        self.bills.insert_member(member.clone())?;
        tracing::info!(bill_id = %bill_id, member_id = %member.id, "Guest added");
        Ok(member)
    }

    pub fn members(&self, bill_id: BillId) -> Result<Vec<BillMember>, BillError> {
        self.live_bill(bill_id)?;
        Ok(self.bills.members(bill_id)?)
    }

    /// Marks that a member says they have paid.
    pub fn report_payment(
        &self,
        bill_id: BillId,
        actor: &UserId,
        member_id: MemberId,
    ) -> Result<BillMember, BillError> {
        let bill = self.live_bill(bill_id)?;
        let mut member = self.member_of(bill_id, member_id)?;
        if !bill.is_owned_by(actor) && member.user.as_ref() != Some(actor) {
            return Err(BillError::Forbidden {
                required: Role::Payer,
            });
        }

        member.paid_at = Some(self.clock.now());
        self.bills.save_member(&member)?;
        tracing::info!(bill_id = %bill_id, member_id = %member_id, "Payment reported");
        Ok(member)
    }

    /// Owner confirms that a member's payment arrived.
    pub fn confirm_payment(
        &self,
        bill_id: BillId,
        actor: &UserId,
        member_id: MemberId,
    ) -> Result<BillMember, BillError> {
        let bill = self.live_bill(bill_id)?;
        require_owner(&bill, actor)?;
        let mut member = self.member_of(bill_id, member_id)?;

        let now = self.clock.now();
        member.is_paid = true;
        member.paid_at.get_or_insert(now);
        member.verified_at = Some(now);
        self.bills.save_member(&member)?;
        tracing::info!(bill_id = %bill_id, member_id = %member_id, "Payment confirmed");
        Ok(member)
    }

    // --- items ---

    pub fn add_item(&self, actor: &UserId, new_item: NewItem) -> Result<BillItem, BillError> {
        let bill = self.live_bill(new_item.bill_id)?;
        let members = self.bills.members(bill.id)?;
        require_participant(&bill, &members, actor)?;

        let name = required(new_item.name, Field::Name)?;
        if new_item.quantity == 0 {
            return Err(InvalidInput::ZeroQuantity.into());
        }
        if new_item.price.is_negative() {
            return Err(InvalidInput::NegativePrice.into());
        }

        let next_index = self
            .bills
            .items(bill.id)?
            .iter()
            .filter_map(|item| item.order_index)
            .max()
            .map_or(0, |last| last + 1);
        let item = BillItem::new(
            ItemId::random(),
            bill.id,
            name,
            new_item.price,
            new_item.quantity,
        )
        .map_err(InvalidInput::from)?
        .with_order_index(next_index);

        self.bills.insert_item(item.clone())?;
        tracing::info!(
            bill_id = %bill.id,
            item_id = %item.id,
            total = %item.total_price(),
            "Item added"
        );
        Ok(item)
    }

    pub fn update_item(
        &self,
        id: ItemId,
        actor: &UserId,
        update: ItemUpdate,
    ) -> Result<BillItem, BillError> {
        let (bill, mut item) = self.live_item(id)?;
        require_owner(&bill, actor)?;

        if let Some(name) = update.name {
            item.name = required(name, Field::Name)?;
        }
        if let Some(price) = update.price {
            if price.is_negative() {
                return Err(InvalidInput::NegativePrice.into());
            }
            item.set_price(price).map_err(InvalidInput::from)?;
        }
        if let Some(quantity) = update.quantity {
            if quantity == 0 {
                return Err(InvalidInput::ZeroQuantity.into());
            }
            item.set_quantity(quantity).map_err(InvalidInput::from)?;
        }

        self.bills.save_item(&item)?;
        tracing::info!(item_id = %item.id, total = %item.total_price(), "Item updated");
        Ok(item)
    }

    pub fn remove_item(&self, id: ItemId, actor: &UserId) -> Result<(), BillError> {
        let (bill, item) = self.live_item(id)?;
        require_owner(&bill, actor)?;

        self.bills.remove_item(item.id)?;
        tracing::info!(bill_id = %bill.id, item_id = %item.id, "Item removed");
        Ok(())
    }

    // --- splits ---

    /// Replaces the split set of an item. An empty set leaves the item to the owner.
    pub fn assign_splits(
        &self,
        actor: &UserId,
        assignment: SplitAssignment,
    ) -> Result<BillItem, BillError> {
        let (bill, mut item) = self.live_item(assignment.item_id)?;
        require_owner(&bill, actor)?;

        let members = self.bills.members(bill.id)?;
        let validator = SplitValidator::new(&members);
        if let Err(err) = validator.validate(item.total_price(), &assignment.splits) {
            tracing::warn!(item_id = %item.id, error = %err, "Split assignment rejected");
            return Err(err.into());
        }

        self.bills
            .replace_splits(item.id, assignment.splits.clone())?;
        item.splits = assignment.splits;
        tracing::info!(item_id = %item.id, split_count = item.splits.len(), "Splits assigned");
        Ok(item)
    }

    pub fn item(&self, id: ItemId) -> Result<BillItem, BillError> {
        self.live_item(id).map(|(_, item)| item)
    }

    pub fn item_splits(&self, item_id: ItemId) -> Result<Vec<SplitView>, BillError> {
        let (bill, item) = self.live_item(item_id)?;
        let members = self.bills.members(bill.id)?;

        item.splits
            .into_iter()
            .map(|split| {
                let member = members
                    .iter()
                    .find(|m| m.id == split.member_id)
                    .ok_or(BillError::InvalidReference(vec![split.member_id]))?;
                Ok(SplitView {
                    member_id: split.member_id,
                    member_name: member.name.clone(),
                    weight: split.weight,
                    fixed_amount: split.fixed_amount,
                })
            })
            .collect()
    }

    // --- summary ---

    /// Settles a bill from a fresh snapshot of its items, splits and members.
    pub fn summary(&self, bill_id: BillId) -> Result<BillSummary, BillError> {
        let bill = self.live_bill(bill_id)?;
        let members = self.bills.members(bill_id)?;
        let items = self.bills.items(bill_id)?;

        let validator = SplitValidator::new(&members);
        let mut foreign: Vec<MemberId> = items
            .iter()
            .flat_map(|item| item.splits.iter())
            .map(|split| split.member_id)
            .filter(|id| !validator.contains(*id))
            .collect();
        if !foreign.is_empty() {
            foreign.sort();
            foreign.dedup();
            tracing::warn!(bill_id = %bill_id, count = foreign.len(), "Stored splits reference foreign members");
            return Err(BillError::InvalidReference(foreign));
        }

        let settlement = SettlementEngine.compute(&bill, &items, &members)?;
        Ok(BillSummary {
            settlement,
            currency: bill.currency,
            status: bill.status,
            payment: bill.payment,
        })
    }

    // --- bank accounts ---

    /// The first account of a user is always the default; a new default
    /// demotes the previous one.
    pub fn add_bank_account(
        &self,
        actor: &UserId,
        new_account: NewBankAccount,
    ) -> Result<BankAccount, BillError> {
        let bank_name = required(new_account.bank_name, Field::BankName)?;
        let account_number = required(new_account.account_number, Field::AccountNumber)?;
        let account_name = required(new_account.account_name, Field::AccountName)?;

        let existing = self.accounts.accounts(actor)?;
        let is_default = existing.is_empty() || new_account.is_default;
        if is_default {
            for mut previous in existing.into_iter().filter(|a| a.is_default) {
                previous.is_default = false;
                self.accounts.save_account(&previous)?;
            }
        }

        let account = BankAccount {
            id: BankAccountId::random(),
            user: actor.clone(),
            bank_name,
            account_number,
            account_name,
            is_default,
            created_at: self.clock.now(),
        };
        self.accounts.insert_account(account.clone())?;
        tracing::info!(account_id = %account.id, user = %actor, is_default, "Bank account added");
        Ok(account)
    }

    /// Default account first, then newest first.
    pub fn bank_accounts(&self, actor: &UserId) -> Result<Vec<BankAccount>, BillError> {
        let mut accounts = self.accounts.accounts(actor)?;
        accounts.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(accounts)
    }

    pub fn remove_bank_account(&self, actor: &UserId, id: BankAccountId) -> Result<(), BillError> {
        let account = self
            .accounts
            .account(id)?
            .ok_or(BillError::NotFound(Resource::BankAccount))?;
        if &account.user != actor {
            return Err(BillError::Forbidden {
                required: Role::AccountHolder,
            });
        }

        self.accounts.remove_account(id)?;
        tracing::info!(account_id = %id, user = %actor, "Bank account removed");
        Ok(())
    }

    // --- helpers ---

    fn live_bill(&self, id: BillId) -> Result<Bill, BillError> {
        match self.bills.bill(id)? {
            Some(bill) if !bill.is_deleted() => Ok(bill),
            _ => Err(BillError::NotFound(Resource::Bill)),
        }
    }

    fn live_item(&self, id: ItemId) -> Result<(Bill, BillItem), BillError> {
        let item = self
            .bills
            .item(id)?
            .ok_or(BillError::NotFound(Resource::Item))?;
        let bill = self.live_bill(item.bill_id)?;
        Ok((bill, item))
    }

    fn member_of(&self, bill_id: BillId, member_id: MemberId) -> Result<BillMember, BillError> {
        self.bills
            .members(bill_id)?
            .into_iter()
            .find(|m| m.id == member_id)
            .ok_or(BillError::NotFound(Resource::Member))
    }
}

fn require_owner(bill: &Bill, actor: &UserId) -> Result<(), BillError> {
    if bill.is_owned_by(actor) {
        Ok(())
    } else {
        Err(BillError::Forbidden {
            required: Role::Owner,
        })
    }
}

fn require_participant(
    bill: &Bill,
    members: &[BillMember],
    actor: &UserId,
) -> Result<(), BillError> {
    if bill.is_owned_by(actor) || members.iter().any(|m| m.user.as_ref() == Some(actor)) {
        Ok(())
    } else {
        Err(BillError::Forbidden {
            required: Role::Participant,
        })
    }
}

fn required(value: String, field: Field) -> Result<String, InvalidInput> {
    non_blank(Some(value)).ok_or(InvalidInput::Blank(field))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_currency(raw: &str) -> Result<String, InvalidInput> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(InvalidInput::Currency(raw.to_string()))
    }
}
