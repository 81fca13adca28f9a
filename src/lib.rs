#![doc(test(attr(deny(warnings))))]

//! Expense Core persists personal expense and budget records and derives the
//! monthly views built on them: totals, category breakdowns, month-over-month
//! deltas and CSV exports.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::services::{ExportService, SummaryService};
pub use crate::core::ExpenseStore;
pub use errors::StoreError;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
