//! xpends is a terminal client for a personal expense tracker API.
//!
//! The client signs in with a bearer token, manages expenses, categories and
//! the persons money is paid to or spent on, scans receipts, and summarizes
//! spending on a dashboard. Admins can also manage user accounts.
//!
//! The dashboard figures are computed locally from the fetched expenses by
//! [dashboard::summarize], a pure function of its inputs.

#![warn(missing_docs)]

pub mod category;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
mod error;
pub mod expense;
pub mod format;
pub mod ledger;
pub mod logging;
pub mod month;
pub mod person;
pub mod receipt;
pub mod timezone;
pub mod token;
pub mod user;
pub mod views;

#[cfg(test)]
mod test_utils;

pub use client::ApiClient;
pub use dashboard::{DashboardSummary, summarize};
pub use error::Error;
pub use ledger::{Ledger, LedgerSource};
pub use month::YearMonth;
