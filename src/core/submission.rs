//! Save flow: precondition checks, grouping the grid into payloads, and
//! sequential submission.

use chrono::NaiveDate;

use crate::core::grid::GridSession;
use crate::domain::{
    FiscalYear, FiscalYearId, Journal, JournalId, PayloadLine, Period, PeriodId, TransactionDraft,
    TransactionPayload,
};
use crate::errors::SubmissionError;
use crate::storage::{SubmissionReceipt, TransactionSink};

pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Fallback shown when the sink fails without a message of its own.
pub const GENERIC_SAVE_FAILURE: &str = "Failed to save transactions";

/// Minimum number of valid detail lines for a transaction to be submitted.
pub const MIN_DETAIL_LINES: usize = 2;

/// Journal, fiscal year and period the session posts into.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    journal: Option<Journal>,
    fiscal_year: Option<FiscalYear>,
    period_id: Option<PeriodId>,
}

impl SessionContext {
    pub fn new(fiscal_year: Option<FiscalYear>) -> Self {
        Self {
            journal: None,
            fiscal_year,
            period_id: None,
        }
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    pub fn fiscal_year(&self) -> Option<&FiscalYear> {
        self.fiscal_year.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        let id = self.period_id?;
        self.fiscal_year.as_ref()?.period(id)
    }

    pub fn select_journal(&mut self, journal: Journal) {
        tracing::info!(journal = %journal.code, "journal selected");
        self.journal = Some(journal);
    }

    /// Selects a period of the current fiscal year. Periods that do not
    /// accept entries are refused.
    pub fn select_period(&mut self, period_id: PeriodId) -> SubmissionResult<&Period> {
        let year = self
            .fiscal_year
            .as_ref()
            .ok_or(SubmissionError::PeriodNotSelected)?;
        let period = year
            .period(period_id)
            .ok_or(SubmissionError::PeriodNotSelected)?;
        if !year.is_entry_allowed(period) {
            return Err(SubmissionError::PeriodClosed(year.period_label(period)));
        }
        tracing::info!(period = %year.period_label(period), "period selected");
        self.period_id = Some(period_id);
        Ok(period)
    }
}

/// Checks everything that must hold before any create call is issued.
pub fn check_preconditions(session: &GridSession, context: &SessionContext) -> SubmissionResult<()> {
    if context.journal.is_none() {
        return Err(SubmissionError::JournalNotSelected);
    }
    if context.period().is_none() {
        return Err(SubmissionError::PeriodNotSelected);
    }
    let totals = session.totals();
    if !totals.is_balanced() {
        return Err(SubmissionError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }
    Ok(())
}

/// Turns the grid into submittable payloads.
///
/// A header with an account code opens a new pending transaction; a header
/// without one does not, so its detail lines keep feeding the previous
/// pending transaction. Detail lines need both a typed code and a resolved
/// account, others are dropped. Transactions with fewer than
/// [`MIN_DETAIL_LINES`] lines are dropped; a kept transaction whose header
/// has no date fails the whole grouping.
pub fn group_transactions(
    transactions: &[TransactionDraft],
    context: &SessionContext,
) -> SubmissionResult<Vec<TransactionPayload>> {
    let journal = context
        .journal
        .as_ref()
        .ok_or(SubmissionError::JournalNotSelected)?;
    let year = context
        .fiscal_year
        .as_ref()
        .ok_or(SubmissionError::PeriodNotSelected)?;
    let period = context.period().ok_or(SubmissionError::PeriodNotSelected)?;

    let ids = PostingIds {
        journal_id: journal.id,
        period_id: period.id,
        fiscal_year_id: year.id,
    };
    let mut output = Vec::new();
    let mut pending: Option<PendingTransaction> = None;
    let mut next_row = 0;

    for draft in transactions {
        let header = &draft.header;
        let header_row = next_row;
        next_row += draft.row_count();
        if !header.fields.account_code.is_empty() {
            finalize(pending.take(), &ids, &mut output)?;
            pending = Some(PendingTransaction {
                header_row,
                date: header.date,
                description: header.fields.description.clone(),
                reference: header.fields.piece.clone(),
                lines: Vec::new(),
            });
        }
        let Some(current) = pending.as_mut() else {
            continue;
        };
        for detail in &draft.details {
            let Some(account_id) = detail.fields.account_id else {
                continue;
            };
            if detail.fields.account_code.is_empty() {
                continue;
            }
            current.lines.push(PayloadLine {
                account_id,
                description: detail.fields.description.clone(),
                debit_amount: detail.debit.value_or_zero(),
                credit_amount: detail.credit.value_or_zero(),
                reference: detail.fields.piece.clone(),
            });
        }
    }
    finalize(pending, &ids, &mut output)?;
    Ok(output)
}

struct PostingIds {
    journal_id: JournalId,
    period_id: PeriodId,
    fiscal_year_id: FiscalYearId,
}

struct PendingTransaction {
    header_row: usize,
    date: Option<NaiveDate>,
    description: String,
    reference: String,
    lines: Vec<PayloadLine>,
}

fn finalize(
    pending: Option<PendingTransaction>,
    ids: &PostingIds,
    output: &mut Vec<TransactionPayload>,
) -> SubmissionResult<()> {
    let Some(pending) = pending else {
        return Ok(());
    };
    if pending.lines.len() < MIN_DETAIL_LINES {
        return Ok(());
    }
    let transaction_date = pending
        .date
        .ok_or(SubmissionError::MissingDate(pending.header_row))?;
    output.push(TransactionPayload {
        journal_id: ids.journal_id,
        period_id: ids.period_id,
        fiscal_year_id: ids.fiscal_year_id,
        transaction_date,
        description: pending.description,
        reference: pending.reference,
        lines: pending.lines,
    });
    Ok(())
}

/// Validates, groups and submits every transaction of the session, one
/// create call at a time.
///
/// Submission is not atomic: on the first failure the loop stops, earlier
/// transactions stay saved, and the grid is left untouched so the user can
/// fix and resubmit. On full success the grid is reset.
pub fn submit_session(
    session: &mut GridSession,
    context: &SessionContext,
    sink: &mut dyn TransactionSink,
) -> SubmissionResult<Vec<SubmissionReceipt>> {
    check_preconditions(session, context)?;
    let payloads = group_transactions(session.transactions(), context)?;
    tracing::info!(count = payloads.len(), "submitting transactions");

    let mut receipts = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        match sink.create(payload) {
            Ok(receipt) => receipts.push(receipt),
            Err(err) => {
                let saved = receipts.len();
                let message = err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_SAVE_FAILURE.to_string());
                tracing::warn!(saved, %message, "transaction submission stopped");
                return Err(SubmissionError::Rejected { saved, message });
            }
        }
    }

    session.reset();
    tracing::info!(saved = receipts.len(), "transactions saved");
    Ok(receipts)
}
