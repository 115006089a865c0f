use harn_domain::{AmountOverflow, FeeConfigError, MemberId, SettlementError, SplitValidationError};
use std::fmt;
use thiserror::Error;

/// Kind of record a lookup or permission check was about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Bill,
    Member,
    Item,
    BankAccount,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Bill => "bill",
            Resource::Member => "member",
            Resource::Item => "item",
            Resource::BankAccount => "bank account",
        })
    }
}

/// Relationship an actor must have to perform an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The user who created the bill.
    Owner,
    /// The owner or any registered member of the bill.
    Participant,
    /// The member's own user, or the owner acting for them.
    Payer,
    /// The user a bank account belongs to.
    AccountHolder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Owner => "bill owner",
            Role::Participant => "bill member",
            Role::Payer => "paying member",
            Role::AccountHolder => "account holder",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    Name,
    BankName,
    AccountNumber,
    AccountName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Name => "name",
            Field::BankName => "bank name",
            Field::AccountNumber => "account number",
            Field::AccountName => "account name",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("{0} must not be empty")]
    Blank(Field),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("item total is too large to represent")]
    PriceTooLarge,
    #[error("currency code {0:?} is not a three-letter code")]
    Currency(String),
    #[error("bill has been cancelled")]
    BillCancelled,
    #[error(transparent)]
    Fees(#[from] FeeConfigError),
    #[error(transparent)]
    Splits(SplitValidationError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{resource} {id} does not exist")]
    Missing { resource: Resource, id: String },
    #[error("{resource} {id} already exists")]
    Duplicate { resource: Resource, id: String },
    #[error("storage backend failed: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BillError {
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("only the {required} may do this")]
    Forbidden { required: Role },
    #[error("split references members outside the bill: {}", join_ids(.0))]
    InvalidReference(Vec<MemberId>),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("no unused join code found after {attempts} attempts")]
    JoinCodeExhausted { attempts: usize },
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SplitValidationError> for BillError {
    fn from(err: SplitValidationError) -> Self {
        match err {
            SplitValidationError::ForeignMembers(ids) => BillError::InvalidReference(ids),
            other => BillError::InvalidInput(InvalidInput::Splits(other)),
        }
    }
}

impl From<AmountOverflow> for InvalidInput {
    fn from(_: AmountOverflow) -> Self {
        InvalidInput::PriceTooLarge
    }
}

impl From<FeeConfigError> for BillError {
    fn from(err: FeeConfigError) -> Self {
        BillError::InvalidInput(InvalidInput::Fees(err))
    }
}

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
