pub mod fee_policy;
pub mod rounding;
pub mod settlement_engine;
pub mod split_validator;

pub use fee_policy::{FeeBreakdown, FeePolicy};
pub use rounding::{RoundingMode, SettlementContext, SettlementRoundingError};
pub use settlement_engine::{SettlementEngine, SettlementError};
pub use split_validator::{SplitValidationError, SplitValidator};
