// Bank Account Manager - Core Library
// Exposes all modules for use in the CLI, the web server, and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod export;
pub mod record;
pub mod service;
pub mod sorting;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{ServerConfig, StorageConfig};
pub use entities::{Account, NewAccount};
pub use error::{BankError, Result};
pub use export::{ExportFormat, ExportSummary};
pub use record::{Record, RECORD_SIZE};
pub use service::{AccountService, BalanceUpdate, StoreStatus};
pub use sorting::{SortCriterion, SortOrder, SortOutcome, SortRequest};
pub use store::CreditFile;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
