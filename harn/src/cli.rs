use clap::{Args, Parser, Subcommand};
use harn_domain::{
    BankAccountId, BillId, FeeConfig, ItemId, ItemSplit, MemberId, Money, Percent, Weight,
};
use rust_decimal::Decimal;
use std::{path::PathBuf, str::FromStr};

#[derive(Debug, Parser)]
#[command(name = "harn", version, about = "Split a group bill and settle who owes what")]
pub struct Cli {
    /// Store file; defaults to HARN_STORE or ./harn-store.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Acting user id; defaults to HARN_USER.
    #[arg(long = "as", global = true, value_name = "USER")]
    pub user: Option<String>,

    /// Display name used when this user creates or joins a bill; defaults to HARN_NAME.
    #[arg(long, global = true, value_name = "NAME")]
    pub display_name: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, inspect and close bills
    #[command(subcommand)]
    Bill(BillCommand),
    /// Join bills and track payments
    #[command(subcommand)]
    Member(MemberCommand),
    /// Line items of a bill
    #[command(subcommand)]
    Item(ItemCommand),
    /// Who shares which item
    #[command(subcommand)]
    Split(SplitCommand),
    /// Bank accounts shown on closed bills
    #[command(subcommand)]
    Bank(BankCommand),
    /// Per-member totals of a bill
    Summary {
        bill: BillId,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also list each member's item shares
        #[arg(long)]
        items: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum BillCommand {
    Create {
        title: String,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[command(flatten)]
        fees: FeeArgs,
    },
    List,
    Show {
        bill: BillId,
    },
    Update {
        bill: BillId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[command(flatten)]
        fees: FeeArgs,
    },
    Close {
        bill: BillId,
    },
    Delete {
        bill: BillId,
    },
}

/// Fee flags; any flag left out keeps the bill's current (or default) value.
#[derive(Debug, Default, Args)]
pub struct FeeArgs {
    /// VAT rate in percent
    #[arg(long, value_parser = parse_percent)]
    pub vat: Option<Percent>,
    /// Service charge rate in percent
    #[arg(long = "sc", value_parser = parse_percent)]
    pub service_charge: Option<Percent>,
    #[arg(long)]
    pub vat_included: Option<bool>,
    #[arg(long = "sc-included")]
    pub service_charge_included: Option<bool>,
}

impl FeeArgs {
    pub fn is_empty(&self) -> bool {
        self.vat.is_none()
            && self.service_charge.is_none()
            && self.vat_included.is_none()
            && self.service_charge_included.is_none()
    }

    pub fn apply(&self, base: FeeConfig) -> FeeConfig {
        FeeConfig {
            vat_rate: self.vat.unwrap_or(base.vat_rate),
            service_charge_rate: self.service_charge.unwrap_or(base.service_charge_rate),
            vat_included: self.vat_included.unwrap_or(base.vat_included),
            service_charge_included: self
                .service_charge_included
                .unwrap_or(base.service_charge_included),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Join a bill by its six-character code
    Join { code: String },
    /// Add a member without a login
    Guest { bill: BillId, name: String },
    List { bill: BillId },
    /// Report that a member has paid
    ReportPaid { bill: BillId, member: MemberId },
    /// Confirm that a member's payment arrived
    ConfirmPaid { bill: BillId, member: MemberId },
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    Add {
        bill: BillId,
        name: String,
        #[arg(value_parser = parse_money)]
        price: Money,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },
    Update {
        item: ItemId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_money)]
        price: Option<Money>,
        #[arg(long, short)]
        quantity: Option<u32>,
    },
    Remove {
        item: ItemId,
    },
}

#[derive(Debug, Subcommand)]
pub enum SplitCommand {
    /// Replace the splits of an item
    Assign {
        item: ItemId,
        /// MEMBER or MEMBER=WEIGHT
        #[arg(long = "share", value_parser = parse_share)]
        shares: Vec<ItemSplit>,
        /// MEMBER=AMOUNT
        #[arg(long = "fixed", value_parser = parse_fixed)]
        fixed: Vec<ItemSplit>,
    },
    Show {
        item: ItemId,
    },
}

#[derive(Debug, Subcommand)]
pub enum BankCommand {
    Add {
        bank_name: String,
        account_number: String,
        account_name: String,
        /// Make this the account shown on closed bills
        #[arg(long)]
        default: bool,
    },
    List,
    Remove {
        account: BankAccountId,
    },
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|err| format!("invalid number `{raw}`: {err}"))
}

pub fn parse_money(raw: &str) -> Result<Money, String> {
    parse_decimal(raw).map(Money::from_decimal)
}

pub fn parse_percent(raw: &str) -> Result<Percent, String> {
    parse_decimal(raw.trim().trim_end_matches('%')).map(Percent::new)
}

fn parse_member(raw: &str) -> Result<MemberId, String> {
    MemberId::from_str(raw).map_err(|err| format!("invalid member id `{raw}`: {err}"))
}

/// `MEMBER` (weight 1) or `MEMBER=WEIGHT`.
pub fn parse_share(raw: &str) -> Result<ItemSplit, String> {
    match raw.split_once('=') {
        Some((member, weight)) => Ok(ItemSplit::weighted(
            parse_member(member)?,
            Weight::new(parse_decimal(weight)?),
        )),
        None => Ok(ItemSplit::weighted(parse_member(raw)?, Weight::ONE)),
    }
}

/// `MEMBER=AMOUNT`.
pub fn parse_fixed(raw: &str) -> Result<ItemSplit, String> {
    let (member, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected MEMBER=AMOUNT, got `{raw}`"))?;
    Ok(ItemSplit::fixed(parse_member(member)?, parse_money(amount)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    const MEMBER: &str = "6f1c1a2e-8a8b-4c55-9d0e-2b7f6f1f9a10";

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn share_without_weight_defaults_to_one() {
        let split = parse_share(MEMBER).expect("valid share");
        assert_eq!(split.weight, Weight::ONE);
        assert_eq!(split.fixed_amount, None);
    }

    #[test]
    fn share_with_weight() {
        let split = parse_share(&format!("{MEMBER}=2.5")).expect("valid share");
        assert_eq!(split.weight, Weight::new(Decimal::new(25, 1)));
    }

    #[test]
    fn fixed_share_carries_amount() {
        let split = parse_fixed(&format!("{MEMBER}=120.50")).expect("valid fixed share");
        assert_eq!(split.fixed_amount, Some(Money::new(12050, 2)));
    }

    #[rstest]
    #[case::missing_amount(MEMBER)]
    #[case::bad_member("someone=10")]
    #[case::bad_amount("6f1c1a2e-8a8b-4c55-9d0e-2b7f6f1f9a10=ten")]
    fn rejects_malformed_fixed_share(#[case] raw: &str) {
        assert!(parse_fixed(raw).is_err());
    }

    #[rstest]
    #[case("7", 7)]
    #[case("10%", 10)]
    #[case(" 0 ", 0)]
    fn percent_accepts_optional_sign(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_percent(raw), Ok(Percent::from_i64(expected)));
    }

    #[test]
    fn fee_flags_override_only_what_is_given() {
        let cli = Cli::try_parse_from(["harn", "bill", "create", "Hotpot", "--sc", "0"])
            .expect("parses");
        let Command::Bill(BillCommand::Create { fees, .. }) = cli.command else {
            panic!("expected bill create");
        };

        let config = fees.apply(FeeConfig::default());

        assert_eq!(config.service_charge_rate, Percent::ZERO);
        assert_eq!(config.vat_rate, FeeConfig::default().vat_rate);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "harn", "bill", "list", "--as", "user_ploy", "--store", "b.json",
        ])
        .expect("parses");

        assert_eq!(cli.user.as_deref(), Some("user_ploy"));
        assert_eq!(cli.store, Some(PathBuf::from("b.json")));
        assert!(matches!(cli.command, Command::Bill(BillCommand::List)));
    }
}
