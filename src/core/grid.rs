//! Grid state model: the transactions of one editing session and the
//! focused cell.

use std::fmt;

use chrono::NaiveDate;

use crate::core::balance::{self, Totals};
use crate::core::clock::Clock;
use crate::core::navigation::{self, Focus, GridKey, NavAction, Transition};
use crate::domain::{
    AccountId, Amount, ChartOfAccounts, Column, DetailLine, GridRow, LineSlot, RowRef,
    TransactionDraft,
};
use crate::errors::GridError;

pub type GridResult<T> = Result<T, GridError>;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// In-memory editing session. Always holds at least one transaction, so
/// row 0 is always a header.
pub struct GridSession {
    transactions: Vec<TransactionDraft>,
    focus: Focus,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for GridSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridSession")
            .field("transactions", &self.transactions)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl GridSession {
    pub fn new(clock: impl Clock + 'static) -> Self {
        let today = clock.today();
        Self {
            transactions: vec![TransactionDraft::new(today)],
            focus: Focus::origin(),
            clock: Box::new(clock),
        }
    }

    pub fn transactions(&self) -> &[TransactionDraft] {
        &self.transactions
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn row_count(&self) -> usize {
        self.transactions.iter().map(TransactionDraft::row_count).sum()
    }

    /// Flat rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = GridRow<'_>> {
        self.transactions.iter().flat_map(|draft| {
            std::iter::once(GridRow::Header(&draft.header))
                .chain(draft.details.iter().map(GridRow::Detail))
        })
    }

    pub fn row(&self, row: usize) -> Option<GridRow<'_>> {
        let location = self.locate(row)?;
        let draft = &self.transactions[location.transaction];
        Some(match location.slot {
            LineSlot::Header => GridRow::Header(&draft.header),
            LineSlot::Detail(index) => GridRow::Detail(&draft.details[index]),
        })
    }

    /// Maps a flat row index to its transaction and slot.
    pub fn locate(&self, row: usize) -> Option<RowRef> {
        let mut start = 0;
        for (transaction, draft) in self.transactions.iter().enumerate() {
            let end = start + draft.row_count();
            if row < end {
                let slot = match row - start {
                    0 => LineSlot::Header,
                    offset => LineSlot::Detail(offset - 1),
                };
                return Some(RowRef { transaction, slot });
            }
            start = end;
        }
        None
    }

    /// Flat index of the header row of transaction `transaction`.
    pub fn header_row(&self, transaction: usize) -> usize {
        self.transactions[..transaction.min(self.transactions.len())]
            .iter()
            .map(TransactionDraft::row_count)
            .sum()
    }

    /// Appends a header dated today and one blank detail line after every
    /// existing row. Returns the row index of the new header.
    pub fn start_transaction(&mut self) -> usize {
        let row = self.row_count();
        self.transactions.push(TransactionDraft::new(self.clock.today()));
        tracing::debug!(row, "transaction started");
        row
    }

    /// Adds a blank detail line at the end of the transaction that owns
    /// `row`, defaulting its description to the transaction's. Returns the
    /// row index of the new line.
    pub fn append_line(&mut self, row: usize) -> GridResult<usize> {
        let location = self.locate(row).ok_or(GridError::RowOutOfRange(row))?;
        let draft = &mut self.transactions[location.transaction];
        let line = DetailLine::with_description(draft.header.fields.description.clone());
        draft.details.push(line);
        let new_row = self.header_row(location.transaction)
            + self.transactions[location.transaction].row_count()
            - 1;
        tracing::debug!(row, new_row, "detail line appended");
        Ok(new_row)
    }

    /// Sets one cell. Account edits re-run resolution against `chart`;
    /// header description edits propagate to detail lines that still carry
    /// the previous default.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: Column,
        value: &str,
        chart: &ChartOfAccounts,
    ) -> GridResult<()> {
        let location = self.locate(row).ok_or(GridError::RowOutOfRange(row))?;
        let draft = &mut self.transactions[location.transaction];
        match location.slot {
            LineSlot::Header => {
                let header = &mut draft.header;
                match column {
                    Column::Date => header.date = parse_date(value)?,
                    Column::Piece => header.fields.piece = value.to_string(),
                    Column::Account => {
                        header.fields.set_account(value, chart.find_by_prefix(value))
                    }
                    Column::Counterparty => header.fields.counterparty = value.to_string(),
                    Column::Description => {
                        let previous = std::mem::replace(
                            &mut header.fields.description,
                            value.to_string(),
                        );
                        for detail in draft.details.iter_mut() {
                            let current = &mut detail.fields.description;
                            if current.is_empty() || *current == previous {
                                *current = value.to_string();
                            }
                        }
                    }
                    Column::Debit | Column::Credit => {
                        return Err(GridError::ReadOnlyCell { row, column })
                    }
                }
            }
            LineSlot::Detail(index) => {
                let detail = &mut draft.details[index];
                match column {
                    Column::Date => return Err(GridError::ReadOnlyCell { row, column }),
                    Column::Piece => detail.fields.piece = value.to_string(),
                    Column::Account => {
                        detail.fields.set_account(value, chart.find_by_prefix(value))
                    }
                    Column::Counterparty => detail.fields.counterparty = value.to_string(),
                    Column::Description => detail.fields.description = value.to_string(),
                    Column::Debit => detail.debit = parse_amount(value)?,
                    Column::Credit => detail.credit = parse_amount(value)?,
                }
            }
        }
        tracing::debug!(row, ?column, "cell updated");
        Ok(())
    }

    /// Stores `code` on the line and resolves it to the first account whose
    /// code starts with it. A miss is not an error: the line is simply left
    /// without an account identifier.
    pub fn resolve_account(
        &mut self,
        row: usize,
        code: &str,
        chart: &ChartOfAccounts,
    ) -> GridResult<Option<AccountId>> {
        self.set_cell(row, Column::Account, code, chart)?;
        Ok(self.row(row).and_then(|line| line.fields().account_id))
    }

    /// Removes a line. A header row takes its whole transaction with it;
    /// removing the last transaction leaves one fresh transaction.
    pub fn remove_line(&mut self, row: usize) -> GridResult<()> {
        let location = self.locate(row).ok_or(GridError::RowOutOfRange(row))?;
        match location.slot {
            LineSlot::Header => {
                self.transactions.remove(location.transaction);
                if self.transactions.is_empty() {
                    self.transactions
                        .push(TransactionDraft::new(self.clock.today()));
                }
            }
            LineSlot::Detail(index) => {
                self.transactions[location.transaction].details.remove(index);
            }
        }
        let last_row = self.row_count() - 1;
        if self.focus.row > last_row {
            self.focus.row = last_row;
        }
        tracing::debug!(row, "line removed");
        Ok(())
    }

    /// Discards every line and starts over with one fresh transaction.
    pub fn reset(&mut self) {
        self.transactions = vec![TransactionDraft::new(self.clock.today())];
        self.focus = Focus::origin();
        tracing::debug!("grid reset");
    }

    /// Click equivalent: moves focus to an explicit cell.
    pub fn focus_cell(&mut self, row: usize, column: Column) -> GridResult<Focus> {
        if row >= self.row_count() {
            return Err(GridError::RowOutOfRange(row));
        }
        self.focus = Focus { row, column };
        Ok(self.focus)
    }

    /// Feeds one key through the navigation table and applies the
    /// resulting grid action and focus change.
    pub fn apply_key(&mut self, key: GridKey) -> GridResult<Transition> {
        let transition = navigation::transition(self.focus, key, self.row_count());
        let mut focus = transition.focus;
        match transition.action {
            NavAction::AppendLine { row } => {
                focus.row = self.append_line(row)?;
            }
            NavAction::StartTransaction => {
                focus.row = self.start_transaction();
            }
            NavAction::AutoBalance => {
                self.auto_balance();
            }
            NavAction::None | NavAction::Passthrough => {}
        }
        self.focus = focus;
        Ok(Transition {
            focus,
            action: transition.action,
        })
    }

    pub fn totals(&self) -> Totals {
        balance::compute_totals(self.detail_lines())
    }

    /// Adjusts the last touched detail line so the grid balances.
    /// Returns the row that changed, if any.
    pub fn auto_balance(&mut self) -> Option<usize> {
        let totals = self.totals();
        let (transaction, index) = self.last_touched_detail()?;
        let row = self.header_row(transaction) + 1 + index;
        let line = &mut self.transactions[transaction].details[index];
        if balance::balance_line(totals, line) {
            tracing::debug!(row, "auto-balance adjusted line");
            Some(row)
        } else {
            None
        }
    }

    pub fn detail_lines(&self) -> impl Iterator<Item = &DetailLine> {
        self.transactions
            .iter()
            .flat_map(|draft| draft.details.iter())
    }

    fn last_touched_detail(&self) -> Option<(usize, usize)> {
        self.transactions
            .iter()
            .enumerate()
            .rev()
            .find_map(|(transaction, draft)| {
                draft
                    .details
                    .iter()
                    .rposition(DetailLine::is_touched)
                    .map(|index| (transaction, index))
            })
    }
}

fn parse_amount(value: &str) -> GridResult<Amount> {
    let amount = Amount::parse(value);
    if amount.exceeds_limit() {
        return Err(GridError::AmountOutOfRange(value.trim().to_string()));
    }
    Ok(amount)
}

fn parse_date(value: &str) -> GridResult<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(Some)
        .ok_or_else(|| GridError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::domain::{Account, AccountType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn session() -> GridSession {
        GridSession::new(FixedClock(today()))
    }

    fn chart() -> ChartOfAccounts {
        ChartOfAccounts::new(vec![
            Account::new(1, "60100000", "Achats", AccountType::Charge),
            Account::new(2, "40100000", "Fournisseurs", AccountType::Passif),
        ])
    }

    #[test]
    fn locate_walks_transactions() {
        let mut grid = session();
        grid.start_transaction();
        assert_eq!(grid.row_count(), 4);
        assert!(grid.locate(0).unwrap().is_header());
        assert_eq!(grid.locate(1).unwrap().slot, LineSlot::Detail(0));
        assert_eq!(
            grid.locate(2).unwrap(),
            RowRef {
                transaction: 1,
                slot: LineSlot::Header
            }
        );
        assert!(grid.locate(4).is_none());
    }

    #[test]
    fn append_line_lands_at_end_of_owning_transaction() {
        let mut grid = session();
        grid.start_transaction();
        let new_row = grid.append_line(0).unwrap();
        assert_eq!(new_row, 2);
        assert!(grid.row(3).unwrap().is_header());
        assert_eq!(grid.transactions()[0].details.len(), 2);
    }

    #[test]
    fn date_cell_accepts_two_formats() {
        let mut grid = session();
        let chart = chart();
        grid.set_cell(0, Column::Date, "15/06/2024", &chart).unwrap();
        assert_eq!(
            grid.transactions()[0].header.date,
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        let err = grid.set_cell(0, Column::Date, "tomorrow", &chart).unwrap_err();
        assert_eq!(err, GridError::InvalidDate("tomorrow".into()));
        assert_eq!(
            grid.transactions()[0].header.date,
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn removing_only_header_resets_session() {
        let mut grid = session();
        grid.focus_cell(1, Column::Debit).unwrap();
        grid.remove_line(0).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.focus().row, 1);
        grid.remove_line(1).unwrap();
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.focus().row, 0);
    }

    #[test]
    fn focus_cell_rejects_missing_rows() {
        let mut grid = session();
        assert_eq!(
            grid.focus_cell(5, Column::Date),
            Err(GridError::RowOutOfRange(5))
        );
    }
}
