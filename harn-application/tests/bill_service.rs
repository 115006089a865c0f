use chrono::{DateTime, Duration, TimeZone, Utc};
use harn_application::{
    BillError, BillService, BillUpdate, Clock, InvalidInput, ItemUpdate, JoinCodeGenerator,
    NewBankAccount, NewBill, NewItem, Resource, Role, SplitAssignment,
};
use harn_domain::{
    BillId, BillStatus, ItemSplit, JoinCode, MemberId, Money, PaymentSnapshot,
    SplitValidationError, UserId, Weight,
};
use harn_infrastructure::InMemoryStore;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, AtomicUsize, Ordering},
};

/// Starts at a fixed instant and moves one minute forward per reading.
struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::minutes(tick)
    }
}

/// Hands out a scripted sequence of codes, repeating the last one.
struct ScriptedCodes {
    codes: Vec<JoinCode>,
    next: AtomicUsize,
}

impl ScriptedCodes {
    fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes
                .iter()
                .map(|c| JoinCode::parse(c).expect("valid code"))
                .collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl JoinCodeGenerator for ScriptedCodes {
    fn generate(&self) -> JoinCode {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);
        self.codes[idx.min(self.codes.len() - 1)].clone()
    }
}

struct Harness {
    store: InMemoryStore,
    clock: SteppingClock,
    codes: ScriptedCodes,
    users: HashMap<UserId, String>,
}

impl Harness {
    fn with_codes(codes: &[&str]) -> Self {
        let users = [("user_owner", "Ploy"), ("user_friend", "Beam")]
            .into_iter()
            .map(|(id, name)| (UserId::new(id), name.to_string()))
            .collect();
        Self {
            store: InMemoryStore::new(),
            clock: SteppingClock {
                start: Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap(),
                ticks: AtomicI64::new(0),
            },
            codes: ScriptedCodes::new(codes),
            users,
        }
    }

    fn service(&self) -> BillService<'_> {
        BillService::new(
            &self.store,
            &self.store,
            &self.codes,
            &self.clock,
            &self.users,
        )
    }
}

fn owner() -> UserId {
    UserId::new("user_owner")
}

fn friend() -> UserId {
    UserId::new("user_friend")
}

fn stranger() -> UserId {
    UserId::new("user_stranger")
}

#[fixture]
fn harness() -> Harness {
    Harness::with_codes(&["DINNER", "LUNCH1", "BRUNCH", "SUPPER"])
}

fn create_bill(h: &Harness, title: &str) -> BillId {
    h.service()
        .create_bill(&owner(), NewBill::new(title))
        .expect("create bill")
        .bill
        .id
}

fn add_item(h: &Harness, bill_id: BillId, name: &str, cents: i64, quantity: u32) -> harn_domain::BillItem {
    h.service()
        .add_item(
            &owner(),
            NewItem {
                bill_id,
                name: name.to_string(),
                price: Money::new(cents, 2),
                quantity,
            },
        )
        .expect("add item")
}

// --- bills ---

#[rstest]
fn create_bill_enrolls_owner_with_directory_name(harness: Harness) {
    let aggregate = harness
        .service()
        .create_bill(&owner(), NewBill::new("  Dinner  ").with_currency("thb"))
        .expect("create bill");

    assert_eq!(aggregate.bill.title, "Dinner");
    assert_eq!(aggregate.bill.currency, "THB");
    assert_eq!(aggregate.bill.status, BillStatus::Draft);
    assert_eq!(aggregate.bill.join_code.as_str(), "DINNER");
    assert_eq!(aggregate.members.len(), 1);
    assert_eq!(aggregate.members[0].name, "Ploy");
    assert_eq!(aggregate.members[0].user, Some(owner()));
}

#[rstest]
fn create_bill_falls_back_to_owner_name(harness: Harness) {
    let aggregate = harness
        .service()
        .create_bill(&stranger(), NewBill::new("Snacks"))
        .expect("create bill");

    assert_eq!(aggregate.members[0].name, "Owner");
}

#[rstest]
fn create_bill_rejects_blank_title(harness: Harness) {
    let err = harness
        .service()
        .create_bill(&owner(), NewBill::new("   "))
        .expect_err("blank title");

    assert!(matches!(
        err,
        BillError::InvalidInput(InvalidInput::Blank(_))
    ));
}

#[test]
fn create_bill_skips_join_codes_in_use() {
    let h = Harness::with_codes(&["AAAAAA", "AAAAAA", "BBBBBB"]);
    create_bill(&h, "First");

    let second = h
        .service()
        .create_bill(&owner(), NewBill::new("Second"))
        .expect("create bill");

    assert_eq!(second.bill.join_code.as_str(), "BBBBBB");
}

#[test]
fn create_bill_gives_up_when_codes_keep_colliding() {
    let h = Harness::with_codes(&["AAAAAA"]);
    create_bill(&h, "First");

    let err = h
        .service()
        .create_bill(&owner(), NewBill::new("Second"))
        .expect_err("no free code");

    assert!(matches!(err, BillError::JoinCodeExhausted { .. }));
}

#[rstest]
fn list_bills_is_newest_first_and_hides_deleted(harness: Harness) {
    let older = create_bill(&harness, "Older");
    let deleted = create_bill(&harness, "Deleted");
    let newer = create_bill(&harness, "Newer");
    add_item(&harness, newer, "Tea", 5000, 2);
    harness
        .service()
        .delete_bill(deleted, &owner())
        .expect("delete");

    let listed = harness.service().list_bills(&owner()).expect("list");

    let ids: Vec<BillId> = listed.iter().map(|o| o.bill.id).collect();
    assert_eq!(ids, vec![newer, older]);
    assert_eq!(listed[0].member_count, 1);
    assert_eq!(listed[0].item_count, 1);
}

#[rstest]
fn deleted_bill_is_cancelled_and_not_found(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let deleted = harness
        .service()
        .delete_bill(bill_id, &owner())
        .expect("delete");

    assert_eq!(deleted.status, BillStatus::Cancelled);
    assert!(deleted.deleted_at.is_some());
    assert_eq!(
        harness.service().bill(bill_id),
        Err(BillError::NotFound(Resource::Bill))
    );
    assert_eq!(
        harness.service().summary(bill_id),
        Err(BillError::NotFound(Resource::Bill))
    );
}

#[rstest]
#[case::update(true)]
#[case::delete(false)]
fn only_the_owner_changes_a_bill(harness: Harness, #[case] update: bool) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();

    let result = if update {
        service
            .update_bill(
                bill_id,
                &friend(),
                BillUpdate {
                    title: Some("Mine now".to_string()),
                    ..BillUpdate::default()
                },
            )
            .map(|_| ())
    } else {
        service.delete_bill(bill_id, &friend()).map(|_| ())
    };

    assert_eq!(
        result,
        Err(BillError::Forbidden {
            required: Role::Owner
        })
    );
}

#[rstest]
fn update_bill_changes_only_given_fields(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let updated = harness
        .service()
        .update_bill(
            bill_id,
            &owner(),
            BillUpdate {
                note: Some("Soi 11".to_string()),
                ..BillUpdate::default()
            },
        )
        .expect("update");

    assert_eq!(updated.title, "Dinner");
    assert_eq!(updated.note.as_deref(), Some("Soi 11"));
}

#[rstest]
fn close_bill_snapshots_default_account(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    service
        .add_bank_account(
            &owner(),
            NewBankAccount {
                bank_name: "KBank".to_string(),
                account_number: "0812345678".to_string(),
                account_name: "Ploy S.".to_string(),
                is_default: false,
            },
        )
        .expect("add account");

    let closed = service.close_bill(bill_id, &owner()).expect("close");

    assert_eq!(closed.status, BillStatus::Completed);
    assert_eq!(
        closed.payment,
        Some(PaymentSnapshot {
            bank_name: Some("KBank".to_string()),
            bank_account: Some("0812345678".to_string()),
            prompt_pay_name: Some("Ploy S.".to_string()),
            prompt_pay_number: Some("0812345678".to_string()),
        })
    );
}

#[rstest]
fn close_bill_without_account_leaves_payment_empty(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let closed = harness
        .service()
        .close_bill(bill_id, &owner())
        .expect("close");

    assert_eq!(closed.status, BillStatus::Completed);
    assert_eq!(closed.payment, None);
}

// --- members ---

#[rstest]
fn join_bill_is_case_insensitive_and_idempotent(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();

    let first = service.join_bill(&friend(), "dinner").expect("join");
    let second = service.join_bill(&friend(), " DINNER ").expect("join again");

    assert_eq!(first.bill_id, bill_id);
    assert!(!first.already_joined);
    assert_eq!(first.member.name, "Beam");
    assert!(second.already_joined);
    assert_eq!(second.member.id, first.member.id);
    assert_eq!(service.members(bill_id).expect("members").len(), 2);
}

#[rstest]
fn join_bill_uses_member_fallback_name(harness: Harness) {
    create_bill(&harness, "Dinner");

    let outcome = harness
        .service()
        .join_bill(&stranger(), "DINNER")
        .expect("join");

    assert_eq!(outcome.member.name, "Member");
}

#[rstest]
#[case::unknown("ZZZZZZ")]
#[case::malformed("no!")]
fn join_bill_with_bad_code_is_not_found(harness: Harness, #[case] code: &str) {
    create_bill(&harness, "Dinner");

    assert_eq!(
        harness.service().join_bill(&friend(), code),
        Err(BillError::NotFound(Resource::Bill))
    );
}

#[rstest]
fn join_bill_rejects_cancelled_bill(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    harness
        .service()
        .delete_bill(bill_id, &owner())
        .expect("delete");

    assert_eq!(
        harness.service().join_bill(&friend(), "DINNER"),
        Err(BillError::InvalidInput(InvalidInput::BillCancelled))
    );
}

#[rstest]
fn guests_are_added_by_participants_only(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    service.join_bill(&friend(), "DINNER").expect("join");

    let guest = service
        .add_guest(bill_id, &friend(), "Auntie")
        .expect("member adds guest");
    let refused = service.add_guest(bill_id, &stranger(), "Gatecrasher");

    assert!(guest.is_guest());
    assert_eq!(
        refused,
        Err(BillError::Forbidden {
            required: Role::Participant
        })
    );
}

#[rstest]
fn payment_is_reported_by_member_and_confirmed_by_owner(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    let member = service.join_bill(&friend(), "DINNER").expect("join").member;

    assert_eq!(
        service.report_payment(bill_id, &stranger(), member.id),
        Err(BillError::Forbidden {
            required: Role::Payer
        })
    );
    let reported = service
        .report_payment(bill_id, &friend(), member.id)
        .expect("report");
    assert!(reported.paid_at.is_some());
    assert!(!reported.is_paid);

    assert_eq!(
        service.confirm_payment(bill_id, &friend(), member.id),
        Err(BillError::Forbidden {
            required: Role::Owner
        })
    );
    let confirmed = service
        .confirm_payment(bill_id, &owner(), member.id)
        .expect("confirm");
    assert!(confirmed.is_paid);
    assert_eq!(confirmed.paid_at, reported.paid_at);
    assert!(confirmed.verified_at.is_some());

    let summary = service.summary(bill_id).expect("summary");
    assert!(summary.settlement.member(member.id).expect("member").is_paid);
}

#[rstest]
fn payment_for_unknown_member_is_not_found(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    assert_eq!(
        harness
            .service()
            .confirm_payment(bill_id, &owner(), MemberId::random()),
        Err(BillError::NotFound(Resource::Member))
    );
}

// --- items ---

#[rstest]
fn items_get_totals_and_appended_order(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let first = add_item(&harness, bill_id, "Pad thai", 8000, 2);
    let second = add_item(&harness, bill_id, "Water", 1500, 3);

    assert_eq!(first.total_price(), Money::from_i64(160));
    assert_eq!(second.total_price(), Money::from_i64(45));
    assert_eq!(first.order_index, Some(0));
    assert_eq!(second.order_index, Some(1));
}

#[rstest]
#[case::zero_quantity(1000, 0, InvalidInput::ZeroQuantity)]
#[case::negative_price(-1, 1, InvalidInput::NegativePrice)]
fn add_item_validates_price_and_quantity(
    harness: Harness,
    #[case] cents: i64,
    #[case] quantity: u32,
    #[case] expected: InvalidInput,
) {
    let bill_id = create_bill(&harness, "Dinner");

    let err = harness
        .service()
        .add_item(
            &owner(),
            NewItem {
                bill_id,
                name: "Broken".to_string(),
                price: Money::new(cents, 2),
                quantity,
            },
        )
        .expect_err("invalid item");

    assert_eq!(err, BillError::InvalidInput(expected));
}

#[rstest]
fn add_item_rejects_totals_beyond_decimal_range(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let err = harness
        .service()
        .add_item(
            &owner(),
            NewItem {
                bill_id,
                name: "Gold leaf".to_string(),
                price: Money::from_decimal(Decimal::MAX),
                quantity: 2,
            },
        )
        .expect_err("total overflows");

    assert_eq!(err, BillError::InvalidInput(InvalidInput::PriceTooLarge));
    let aggregate = harness.service().bill(bill_id).expect("bill");
    assert!(aggregate.items.is_empty());
}

#[rstest]
fn outsiders_cannot_add_items(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");

    let err = harness
        .service()
        .add_item(
            &stranger(),
            NewItem {
                bill_id,
                name: "Sneaky".to_string(),
                price: Money::from_i64(10),
                quantity: 1,
            },
        )
        .expect_err("outsider");

    assert_eq!(
        err,
        BillError::Forbidden {
            required: Role::Participant
        }
    );
}

#[rstest]
fn update_item_recomputes_total(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let item = add_item(&harness, bill_id, "Beer", 9000, 2);

    let updated = harness
        .service()
        .update_item(
            item.id,
            &owner(),
            ItemUpdate {
                quantity: Some(5),
                ..ItemUpdate::default()
            },
        )
        .expect("update item");

    assert_eq!(updated.price(), Money::from_i64(90));
    assert_eq!(updated.total_price(), Money::from_i64(450));
}

#[rstest]
fn update_item_rejects_quantity_that_overflows_total(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let huge = Money::from_decimal(Decimal::MAX);
    let item = harness
        .service()
        .add_item(
            &owner(),
            NewItem {
                bill_id,
                name: "Gold leaf".to_string(),
                price: huge,
                quantity: 1,
            },
        )
        .expect("add item");

    let err = harness
        .service()
        .update_item(
            item.id,
            &owner(),
            ItemUpdate {
                quantity: Some(2),
                ..ItemUpdate::default()
            },
        )
        .expect_err("total overflows");

    assert_eq!(err, BillError::InvalidInput(InvalidInput::PriceTooLarge));
    let stored = harness.service().item(item.id).expect("item");
    assert_eq!(stored.quantity(), 1);
    assert_eq!(stored.total_price(), huge);
}

#[rstest]
fn members_cannot_edit_or_remove_items(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    service.join_bill(&friend(), "DINNER").expect("join");
    let item = add_item(&harness, bill_id, "Beer", 9000, 2);

    let forbidden = Err(BillError::Forbidden {
        required: Role::Owner,
    });
    assert_eq!(
        service
            .update_item(item.id, &friend(), ItemUpdate::default())
            .map(|_| ()),
        forbidden
    );
    assert_eq!(service.remove_item(item.id, &friend()), forbidden);
}

#[rstest]
fn removed_item_is_not_found(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let item = add_item(&harness, bill_id, "Beer", 9000, 2);
    let service = harness.service();

    assert_eq!(service.item(item.id), Ok(item.clone()));
    service.remove_item(item.id, &owner()).expect("remove");

    assert_eq!(service.item(item.id), Err(BillError::NotFound(Resource::Item)));
    assert_eq!(
        service.remove_item(item.id, &owner()),
        Err(BillError::NotFound(Resource::Item))
    );
}

// --- splits ---

#[rstest]
fn split_assignment_rejects_foreign_members(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let item = add_item(&harness, bill_id, "Soup", 10000, 1);
    let other_bill = harness
        .service()
        .create_bill(&friend(), NewBill::new("Elsewhere"))
        .expect("other bill");
    let outsider = other_bill.members[0].id;

    let err = harness
        .service()
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: vec![ItemSplit::weighted(outsider, Weight::ONE)],
            },
        )
        .expect_err("foreign member");

    assert_eq!(err, BillError::InvalidReference(vec![outsider]));
    let stored = harness.service().item_splits(item.id).expect("splits");
    assert!(stored.is_empty());
}

#[rstest]
fn split_assignment_rejects_fixed_amounts_over_total(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let item = add_item(&harness, bill_id, "Soup", 10000, 1);
    let owner_member = harness.service().members(bill_id).expect("members")[0].id;

    let err = harness
        .service()
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: vec![ItemSplit::fixed(owner_member, Money::from_i64(150))],
            },
        )
        .expect_err("over total");

    assert!(matches!(
        err,
        BillError::InvalidInput(InvalidInput::Splits(
            SplitValidationError::FixedAmountsExceedTotal { .. }
        ))
    ));
}

#[rstest]
fn split_assignment_replaces_the_previous_set(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    let friend_member = service.join_bill(&friend(), "DINNER").expect("join").member;
    let owner_member = service.members(bill_id).expect("members")[0].clone();
    let item = add_item(&harness, bill_id, "Soup", 10000, 1);

    service
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: vec![
                    ItemSplit::weighted(owner_member.id, Weight::ONE),
                    ItemSplit::weighted(friend_member.id, Weight::ONE),
                ],
            },
        )
        .expect("first assignment");
    service
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: vec![ItemSplit::weighted(friend_member.id, Weight::from_i64(2))],
            },
        )
        .expect("second assignment");

    let views = service.item_splits(item.id).expect("splits");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].member_name, "Beam");
    assert_eq!(views[0].weight, Weight::from_i64(2));

    service
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: Vec::new(),
            },
        )
        .expect("empty set is allowed");
    assert!(service.item_splits(item.id).expect("splits").is_empty());
}

#[rstest]
fn only_the_owner_assigns_splits(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    service.join_bill(&friend(), "DINNER").expect("join");
    let item = add_item(&harness, bill_id, "Soup", 10000, 1);

    assert_eq!(
        service
            .assign_splits(
                &friend(),
                SplitAssignment {
                    item_id: item.id,
                    splits: Vec::new(),
                },
            )
            .map(|_| ()),
        Err(BillError::Forbidden {
            required: Role::Owner
        })
    );
}

// --- summary ---

#[rstest]
fn summary_splits_item_evenly_with_fees(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    let friend_member = service.join_bill(&friend(), "DINNER").expect("join").member;
    let owner_member = service.members(bill_id).expect("members")[0].clone();
    let item = add_item(&harness, bill_id, "Hotpot", 10000, 1);
    service
        .assign_splits(
            &owner(),
            SplitAssignment {
                item_id: item.id,
                splits: vec![
                    ItemSplit::weighted(owner_member.id, Weight::ONE),
                    ItemSplit::weighted(friend_member.id, Weight::ONE),
                ],
            },
        )
        .expect("assign");

    let summary = service.summary(bill_id).expect("summary");

    assert_eq!(summary.status, BillStatus::Draft);
    assert_eq!(summary.settlement.members.len(), 2);
    for member in &summary.settlement.members {
        assert_eq!(member.base_amount, Money::from_i64(50));
        assert_eq!(member.sc_amount, Money::from_i64(5));
        assert_eq!(member.vat_amount, Money::new(385, 2));
        assert_eq!(member.net_amount, Money::new(5885, 2));
    }
    assert_eq!(summary.settlement.grand_total, Money::new(11770, 2));
}

#[rstest]
fn summary_charges_unassigned_items_to_owner(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    let service = harness.service();
    let friend_member = service.join_bill(&friend(), "DINNER").expect("join").member;
    add_item(&harness, bill_id, "Hotpot", 10000, 1);

    let summary = service.summary(bill_id).expect("summary");

    let owner_row = &summary.settlement.members[0];
    assert_eq!(owner_row.user_id, Some(owner()));
    assert_eq!(owner_row.net_amount, Money::new(11770, 2));
    assert_eq!(owner_row.items[0].name, "Hotpot (Unassigned)");
    let friend_row = summary
        .settlement
        .member(friend_member.id)
        .expect("friend row");
    assert_eq!(friend_row.net_amount, Money::ZERO);
    assert!(friend_row.items.is_empty());
}

#[rstest]
fn summary_serializes_camel_case(harness: Harness) {
    let bill_id = create_bill(&harness, "Dinner");
    add_item(&harness, bill_id, "Hotpot", 10000, 1);

    let summary = harness.service().summary(bill_id).expect("summary");
    let json = serde_json::to_value(&summary).expect("json");

    assert_eq!(json["billId"], serde_json::json!(bill_id));
    assert_eq!(json["status"], "DRAFT");
    assert_eq!(json["grandTotal"].as_f64(), Some(117.7));
    assert!(json["members"][0]["netAmount"].is_number());
    assert!(json.get("payment").is_none());
}

// --- bank accounts ---

fn account(name: &str, is_default: bool) -> NewBankAccount {
    NewBankAccount {
        bank_name: name.to_string(),
        account_number: format!("{name}-001"),
        account_name: "Ploy S.".to_string(),
        is_default,
    }
}

#[rstest]
fn first_account_is_default_and_new_default_demotes(harness: Harness) {
    let service = harness.service();

    let first = service
        .add_bank_account(&owner(), account("KBank", false))
        .expect("first");
    let second = service
        .add_bank_account(&owner(), account("SCB", false))
        .expect("second");
    let third = service
        .add_bank_account(&owner(), account("BBL", true))
        .expect("third");

    assert!(first.is_default);
    assert!(!second.is_default);
    assert!(third.is_default);

    let listed: Vec<(String, bool)> = service
        .bank_accounts(&owner())
        .expect("list")
        .into_iter()
        .map(|a| (a.bank_name, a.is_default))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("BBL".to_string(), true),
            ("SCB".to_string(), false),
            ("KBank".to_string(), false),
        ]
    );
}

#[rstest]
fn accounts_are_removed_by_their_holder_only(harness: Harness) {
    let service = harness.service();
    let added = service
        .add_bank_account(&owner(), account("KBank", true))
        .expect("add");

    assert_eq!(
        service.remove_bank_account(&friend(), added.id),
        Err(BillError::Forbidden {
            required: Role::AccountHolder
        })
    );
    service
        .remove_bank_account(&owner(), added.id)
        .expect("remove");
    assert_eq!(
        service.remove_bank_account(&owner(), added.id),
        Err(BillError::NotFound(Resource::BankAccount))
    );
}
