use crate::cli::{BankCommand, BillCommand, Command, ItemCommand, MemberCommand, SplitCommand};
use anyhow::anyhow;
use harn_application::{
    BillError, BillService, BillUpdate, ItemUpdate, NewBankAccount, NewBill, NewItem,
    SplitAssignment,
};
use harn_domain::{FeeConfig, UserId};
use harn_presentation::{ListingPresenter, SummaryPresenter, format_bill_error};

/// Whether a command changed the store and it must be written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    ReadOnly,
    Mutated,
}

#[derive(Debug)]
pub struct Outcome {
    pub effect: Effect,
    pub output: String,
}

impl Outcome {
    fn read(output: String) -> Self {
        Self {
            effect: Effect::ReadOnly,
            output,
        }
    }

    fn mutated(output: String) -> Self {
        Self {
            effect: Effect::Mutated,
            output,
        }
    }
}

/// Runs one command against the service. Use-case errors are rendered with
/// the localized error text.
pub fn execute(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: Command,
) -> anyhow::Result<Outcome> {
    let outcome = match command {
        Command::Bill(command) => bill(service, actor, command),
        Command::Member(command) => member(service, actor, command),
        Command::Item(command) => item(service, actor, command),
        Command::Split(command) => split(service, actor, command),
        Command::Bank(command) => bank(service, actor, command),
        Command::Summary { bill, json, items } => {
            let summary = service.summary(bill)?;
            if json {
                Ok(Outcome::read(serde_json::to_string_pretty(&summary)?))
            } else {
                let mut output = SummaryPresenter::render(&summary);
                if items {
                    output.push('\n');
                    output.push_str(&SummaryPresenter::render_breakdown(&summary));
                }
                Ok(Outcome::read(output))
            }
        }
    };
    outcome.map_err(present)
}

fn present(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<BillError>() {
        Ok(err) => {
            tracing::debug!(error = ?err, "Command rejected");
            anyhow!(format_bill_error(&err))
        }
        Err(err) => err,
    }
}

fn require(actor: Option<&UserId>) -> anyhow::Result<&UserId> {
    actor.ok_or_else(|| anyhow!("no acting user: pass --as USER or set HARN_USER"))
}

fn bill(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: BillCommand,
) -> anyhow::Result<Outcome> {
    match command {
        BillCommand::Create {
            title,
            note,
            currency,
            fees,
        } => {
            let new_bill = NewBill {
                title,
                note,
                currency,
                fees: fees.apply(FeeConfig::default()),
            };
            let aggregate = service.create_bill(require(actor)?, new_bill)?;
            Ok(Outcome::mutated(ListingPresenter::render_bill(&aggregate)))
        }
        BillCommand::List => {
            let bills = service.list_bills(require(actor)?)?;
            Ok(Outcome::read(ListingPresenter::render_bills(&bills)))
        }
        BillCommand::Show { bill } => Ok(Outcome::read(ListingPresenter::render_bill(
            &service.bill(bill)?,
        ))),
        BillCommand::Update {
            bill,
            title,
            note,
            currency,
            fees,
        } => {
            let fees = if fees.is_empty() {
                None
            } else {
                Some(fees.apply(service.bill(bill)?.bill.fees))
            };
            let update = BillUpdate {
                title,
                note,
                currency,
                fees,
            };
            service.update_bill(bill, require(actor)?, update)?;
            Ok(Outcome::mutated(ListingPresenter::render_bill(
                &service.bill(bill)?,
            )))
        }
        BillCommand::Close { bill } => {
            service.close_bill(bill, require(actor)?)?;
            let summary = service.summary(bill)?;
            Ok(Outcome::mutated(SummaryPresenter::render(&summary)))
        }
        BillCommand::Delete { bill } => {
            let deleted = service.delete_bill(bill, require(actor)?)?;
            Ok(Outcome::mutated(deleted.id.to_string()))
        }
    }
}

fn member(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: MemberCommand,
) -> anyhow::Result<Outcome> {
    match command {
        MemberCommand::Join { code } => {
            let joined = service.join_bill(require(actor)?, &code)?;
            let output = format!("{} {}", joined.bill_id, joined.member.id);
            if joined.already_joined {
                Ok(Outcome::read(output))
            } else {
                Ok(Outcome::mutated(output))
            }
        }
        MemberCommand::Guest { bill, name } => {
            let guest = service.add_guest(bill, require(actor)?, &name)?;
            Ok(Outcome::mutated(guest.id.to_string()))
        }
        MemberCommand::List { bill } => Ok(Outcome::read(ListingPresenter::render_members(
            &service.members(bill)?,
        ))),
        MemberCommand::ReportPaid { bill, member } => {
            let member = service.report_payment(bill, require(actor)?, member)?;
            Ok(Outcome::mutated(ListingPresenter::render_members(&[member])))
        }
        MemberCommand::ConfirmPaid { bill, member } => {
            let member = service.confirm_payment(bill, require(actor)?, member)?;
            Ok(Outcome::mutated(ListingPresenter::render_members(&[member])))
        }
    }
}

fn item(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: ItemCommand,
) -> anyhow::Result<Outcome> {
    match command {
        ItemCommand::Add {
            bill,
            name,
            price,
            quantity,
        } => {
            let new_item = NewItem {
                bill_id: bill,
                name,
                price,
                quantity,
            };
            let item = service.add_item(require(actor)?, new_item)?;
            Ok(Outcome::mutated(item.id.to_string()))
        }
        ItemCommand::Update {
            item,
            name,
            price,
            quantity,
        } => {
            let update = ItemUpdate {
                name,
                price,
                quantity,
            };
            let item = service.update_item(item, require(actor)?, update)?;
            Ok(Outcome::mutated(item.id.to_string()))
        }
        ItemCommand::Remove { item } => {
            service.remove_item(item, require(actor)?)?;
            Ok(Outcome::mutated(item.to_string()))
        }
    }
}

fn split(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: SplitCommand,
) -> anyhow::Result<Outcome> {
    let (item_id, effect) = match command {
        SplitCommand::Assign {
            item,
            mut shares,
            fixed,
        } => {
            shares.extend(fixed);
            let assignment = SplitAssignment {
                item_id: item,
                splits: shares,
            };
            service.assign_splits(require(actor)?, assignment)?;
            (item, Effect::Mutated)
        }
        SplitCommand::Show { item } => (item, Effect::ReadOnly),
    };

    let item = service.item(item_id)?;
    let scale = service.bill(item.bill_id)?.bill.settlement_context().scale;
    let output = ListingPresenter::render_splits(&service.item_splits(item_id)?, scale);
    Ok(Outcome { effect, output })
}

fn bank(
    service: BillService<'_>,
    actor: Option<&UserId>,
    command: BankCommand,
) -> anyhow::Result<Outcome> {
    let actor = require(actor)?;
    match command {
        BankCommand::Add {
            bank_name,
            account_number,
            account_name,
            default,
        } => {
            let new_account = NewBankAccount {
                bank_name,
                account_number,
                account_name,
                is_default: default,
            };
            let account = service.add_bank_account(actor, new_account)?;
            Ok(Outcome::mutated(account.id.to_string()))
        }
        BankCommand::List => Ok(Outcome::read(ListingPresenter::render_bank_accounts(
            &service.bank_accounts(actor)?,
        ))),
        BankCommand::Remove { account } => {
            service.remove_bank_account(actor, account)?;
            Ok(Outcome::mutated(account.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use harn_infrastructure::{InMemoryStore, RandomJoinCodeGenerator, SystemClock};
    use std::collections::HashMap;

    struct Fixture {
        store: InMemoryStore,
        users: HashMap<UserId, String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                users: HashMap::from([(UserId::new("user_ploy"), "Ploy".to_string())]),
            }
        }

        fn service(&self) -> BillService<'_> {
            BillService::new(
                &self.store,
                &self.store,
                &RandomJoinCodeGenerator,
                &SystemClock,
                &self.users,
            )
        }

        fn run(&self, args: &[&str]) -> anyhow::Result<Outcome> {
            let cli = Cli::try_parse_from(std::iter::once("harn").chain(args.iter().copied()))?;
            let actor = cli.user.map(UserId::new);
            execute(self.service(), actor.as_ref(), cli.command)
        }
    }

    #[test]
    fn reads_do_not_mark_the_store_dirty() {
        let fixture = Fixture::new();
        let created = fixture
            .run(&["--as", "user_ploy", "bill", "create", "Hotpot"])
            .expect("create");
        assert_eq!(created.effect, Effect::Mutated);

        let listed = fixture
            .run(&["--as", "user_ploy", "bill", "list"])
            .expect("list");

        assert_eq!(listed.effect, Effect::ReadOnly);
        assert!(listed.output.contains("Hotpot"));
    }

    #[test]
    fn mutating_commands_need_an_actor() {
        let fixture = Fixture::new();
        let err = fixture
            .run(&["bill", "create", "Hotpot"])
            .expect_err("no actor");
        assert!(err.to_string().contains("--as"));
    }

    #[test]
    fn use_case_errors_use_localized_text() {
        let fixture = Fixture::new();
        let err = fixture
            .run(&["--as", "user_ploy", "member", "join", "NOPE00"])
            .expect_err("unknown code");

        assert_eq!(
            err.to_string(),
            format_bill_error(&BillError::NotFound(harn_application::Resource::Bill))
        );
    }

    #[test]
    fn end_to_end_split_and_summary() {
        let fixture = Fixture::new();
        let owner = UserId::new("user_ploy");
        let service = fixture.service();
        let aggregate = service
            .create_bill(&owner, NewBill::new("Hotpot"))
            .expect("create");
        let bill_id = aggregate.bill.id.to_string();
        let owner_member = aggregate.members[0].id.to_string();

        let guest = fixture
            .run(&["--as", "user_ploy", "member", "guest", &bill_id, "Nok"])
            .expect("guest")
            .output;
        let item = fixture
            .run(&["--as", "user_ploy", "item", "add", &bill_id, "Set", "100"])
            .expect("item")
            .output;
        let assigned = fixture
            .run(&[
                "--as",
                "user_ploy",
                "split",
                "assign",
                &item,
                "--share",
                &owner_member,
                "--share",
                &guest,
            ])
            .expect("assign");
        assert_eq!(assigned.effect, Effect::Mutated);
        assert!(assigned.output.contains("Nok"));

        let summary = fixture
            .run(&["summary", &bill_id, "--json"])
            .expect("summary");
        let json: serde_json::Value = serde_json::from_str(&summary.output).expect("valid json");

        assert_eq!(summary.effect, Effect::ReadOnly);
        assert_eq!(json["grandTotal"].as_f64(), Some(117.7));
        assert_eq!(json["members"][1]["netAmount"].as_f64(), Some(58.85));
    }
}
