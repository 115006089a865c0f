#![warn(clippy::uninlined_format_args)]

pub mod clock;
pub mod join_code;
pub mod json_store;
pub mod memory_store;

pub use clock::SystemClock;
pub use join_code::RandomJoinCodeGenerator;
pub use json_store::{JsonStoreFile, StoreFileError};
pub use memory_store::{BillRecord, InMemoryStore, StoreSnapshot};
