#![doc(test(attr(deny(warnings))))]

//! Saisie core: grid-based journal entry for double-entry bookkeeping.
//! Holds the editable entry grid, balance checks, keyboard navigation and
//! grouping of grid rows into balanced transactions for submission.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Saisie core tracing initialized.");
    });
}
