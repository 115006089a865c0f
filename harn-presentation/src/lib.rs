#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod listing_presenter;
pub mod summary_presenter;
pub mod text_table;

pub use error_presenter::format_bill_error;
pub use listing_presenter::ListingPresenter;
pub use summary_presenter::SummaryPresenter;
pub use text_table::{Alignment, TextTableBuilder};
