//! Boundaries with the reference-data and transaction-submission services.

pub mod json_backend;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Account, ChartOfAccounts, FiscalYear, Journal, TransactionPayload};
use crate::errors::ReferenceDataError;

pub type Result<T> = std::result::Result<T, ReferenceDataError>;

/// One page of the chart of accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub has_more: bool,
}

/// Read-only reference data consumed when an entry session starts.
pub trait ReferenceDataSource {
    /// Active journals.
    fn journals(&self) -> Result<Vec<Journal>>;
    /// Zero-based page of the chart of accounts.
    fn account_page(&self, page: usize) -> Result<AccountPage>;
    /// The currently open fiscal year with its periods, if any.
    fn open_fiscal_year(&self) -> Result<Option<FiscalYear>>;
}

/// Everything an entry session needs resident before the grid opens.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub journals: Vec<Journal>,
    pub chart: ChartOfAccounts,
    pub fiscal_year: FiscalYear,
}

impl ReferenceData {
    /// Loads journals, every page of the chart, and the open fiscal year.
    /// Any failure aborts the load. An empty page ends the chart even when
    /// the source claims there is more.
    pub fn load(source: &dyn ReferenceDataSource) -> Result<Self> {
        let journals: Vec<Journal> = source
            .journals()?
            .into_iter()
            .filter(|journal| journal.is_active)
            .collect();

        let mut chart = ChartOfAccounts::default();
        let mut page = 0;
        loop {
            let batch = source.account_page(page)?;
            let exhausted = !batch.has_more || batch.accounts.is_empty();
            chart.extend(batch.accounts);
            if exhausted {
                break;
            }
            page += 1;
        }

        let fiscal_year = source
            .open_fiscal_year()?
            .ok_or(ReferenceDataError::NoOpenFiscalYear)?;

        tracing::info!(
            journals = journals.len(),
            accounts = chart.len(),
            fiscal_year = %fiscal_year.code,
            "reference data loaded"
        );
        Ok(Self {
            journals,
            chart,
            fiscal_year,
        })
    }

    pub fn journal_by_code(&self, code: &str) -> Option<&Journal> {
        self.journals
            .iter()
            .find(|journal| journal.code.eq_ignore_ascii_case(code))
    }
}

/// What the submission service returns for one created transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub number: String,
}

/// Rejection from the submission service, with the server's text when it
/// sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    message: Option<String>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn silent() -> Self {
        Self { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|text| !text.trim().is_empty())
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or("submission failed"))
    }
}

impl std::error::Error for SinkError {}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::new(err.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::new(err.to_string())
    }
}

/// Write side: one call per finalized transaction.
pub trait TransactionSink {
    fn create(&mut self, payload: &TransactionPayload)
        -> std::result::Result<SubmissionReceipt, SinkError>;
}

pub use json_backend::{JsonOutbox, JsonReferenceStore};
