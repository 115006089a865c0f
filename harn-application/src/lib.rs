#![warn(clippy::uninlined_format_args)]

pub mod bill_service;
pub mod error;
pub mod model;
pub mod ports;

pub use bill_service::BillService;
pub use error::{BillError, Field, InvalidInput, RepositoryError, Resource, Role};
pub use model::{
    BillAggregate, BillOverview, BillSummary, BillUpdate, DEFAULT_CURRENCY, ItemUpdate,
    JoinOutcome, NewBankAccount, NewBill, NewItem, SplitAssignment, SplitView,
};
pub use ports::{BankAccountRepository, BillRepository, Clock, JoinCodeGenerator, UserDirectory};
