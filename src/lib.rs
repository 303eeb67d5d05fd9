//! Reporting engine over a federal spending warehouse.
//!
//! Builds the filterable, grouped aggregation queries behind the Account
//! Download files: File A (account balances), File B (breakdown by program
//! activity and object class), and File C (breakdown by award), at either
//! treasury-account or federal-account granularity.

pub mod columns;
pub mod dates;
pub mod db;
pub mod derivations;
pub mod download;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod periods;
pub mod settings;
pub mod types;

pub use download::{account_download_filter, account_download_filter_with_url, Record};
pub use error::{FiscusError, Result};
pub use types::{AccountDownloadFilters, AccountLevel, AccountType};
