use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::fiscal_year::{FiscalYearId, PeriodId};
use super::journal::JournalId;

/// Body of one create call to the transaction-submission service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub journal_id: JournalId,
    pub period_id: PeriodId,
    pub fiscal_year_id: FiscalYearId,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub reference: String,
    pub lines: Vec<PayloadLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadLine {
    pub account_id: AccountId,
    pub description: String,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub reference: String,
}

impl TransactionPayload {
    pub fn total_debit(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.debit_amount))
    }

    pub fn total_credit(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.credit_amount))
    }
}
