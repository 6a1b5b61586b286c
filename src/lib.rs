pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::{IntegrityWarning, LedgerError};
pub use crate::core::ingest::{Ledger, Viewer};
pub use crate::core::services::LedgerService;

#[cfg(test)]
mod tests;
