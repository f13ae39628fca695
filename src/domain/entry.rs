//! Entry lines of the transaction grid.
//!
//! A transaction draft owns its header line and an ordered list of detail
//! lines. The grid's flat row numbering (header, its details, next header...)
//! is derived from this tree and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::amount::Amount;

/// Logical grid columns, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Date,
    Piece,
    Account,
    Counterparty,
    Description,
    Debit,
    Credit,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Date,
        Column::Piece,
        Column::Account,
        Column::Counterparty,
        Column::Description,
        Column::Debit,
        Column::Credit,
    ];
    pub const FIRST: Column = Column::Date;
    pub const LAST: Column = Column::Credit;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Column> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Column> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Piece => "Pièce",
            Column::Account => "Compte",
            Column::Counterparty => "Tiers",
            Column::Description => "Libellé",
            Column::Debit => "Débit",
            Column::Credit => "Crédit",
        }
    }
}

/// Fields shared by header and detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFields {
    /// Session-local identity; not a persisted key.
    pub key: Uuid,
    pub persisted_id: Option<i64>,
    pub piece: String,
    pub account_code: String,
    pub account_id: Option<AccountId>,
    pub counterparty: String,
    pub description: String,
    pub is_new: bool,
}

impl Default for LineFields {
    fn default() -> Self {
        Self {
            key: Uuid::new_v4(),
            persisted_id: None,
            piece: String::new(),
            account_code: String::new(),
            account_id: None,
            counterparty: String::new(),
            description: String::new(),
            is_new: true,
        }
    }
}

impl LineFields {
    pub fn set_account(&mut self, code: &str, resolved: Option<&Account>) {
        self.account_code = code.to_string();
        self.account_id = resolved.map(|account| account.id);
    }

    pub fn has_resolved_account(&self) -> bool {
        !self.account_code.is_empty() && self.account_id.is_some()
    }
}

/// First line of a transaction; carries the transaction date and the
/// transaction-level piece and description. Never carries amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLine {
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub fields: LineFields,
}

impl HeaderLine {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            fields: LineFields::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    #[serde(flatten)]
    pub fields: LineFields,
    pub debit: Amount,
    pub credit: Amount,
}

impl DetailLine {
    pub fn with_description(description: impl Into<String>) -> Self {
        let mut line = Self::default();
        line.fields.description = description.into();
        line
    }

    /// A line the user has typed into: it has an account, a debit or a credit.
    pub fn is_touched(&self) -> bool {
        !self.fields.account_code.is_empty() || !self.debit.is_blank() || !self.credit.is_blank()
    }
}

/// One transaction being edited: header plus owned detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub header: HeaderLine,
    pub details: Vec<DetailLine>,
}

impl TransactionDraft {
    /// Header dated `date` followed by one blank detail line.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            header: HeaderLine::new(date),
            details: vec![DetailLine::default()],
        }
    }

    /// Rows this draft occupies in the flat grid.
    pub fn row_count(&self) -> usize {
        1 + self.details.len()
    }
}

/// Position of a line inside its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSlot {
    Header,
    Detail(usize),
}

/// Flat row resolved to its owning transaction and slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub transaction: usize,
    pub slot: LineSlot,
}

impl RowRef {
    pub fn is_header(&self) -> bool {
        matches!(self.slot, LineSlot::Header)
    }
}

/// Borrowed view of one grid row for rendering.
#[derive(Debug, Clone, Copy)]
pub enum GridRow<'a> {
    Header(&'a HeaderLine),
    Detail(&'a DetailLine),
}

impl GridRow<'_> {
    pub fn is_header(&self) -> bool {
        matches!(self, GridRow::Header(_))
    }

    pub fn fields(&self) -> &LineFields {
        match self {
            GridRow::Header(header) => &header.fields,
            GridRow::Detail(detail) => &detail.fields,
        }
    }

    /// Text shown in `column`; non-editable cells render empty.
    pub fn cell_text(&self, column: Column) -> String {
        let fields = self.fields();
        match (self, column) {
            (GridRow::Header(header), Column::Date) => header
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            (GridRow::Detail(_), Column::Date) => String::new(),
            (_, Column::Piece) => fields.piece.clone(),
            (_, Column::Account) => fields.account_code.clone(),
            (_, Column::Counterparty) => fields.counterparty.clone(),
            (_, Column::Description) => fields.description.clone(),
            (GridRow::Detail(detail), Column::Debit) => detail.debit.raw().to_string(),
            (GridRow::Detail(detail), Column::Credit) => detail.credit.raw().to_string(),
            (GridRow::Header(_), Column::Debit | Column::Credit) => String::new(),
        }
    }

    /// Whether `column` accepts input on this row.
    pub fn is_editable(&self, column: Column) -> bool {
        match self {
            GridRow::Header(_) => !matches!(column, Column::Debit | Column::Credit),
            GridRow::Detail(_) => column != Column::Date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_stepping_stops_at_edges() {
        assert_eq!(Column::Date.next(), Some(Column::Piece));
        assert_eq!(Column::Credit.next(), None);
        assert_eq!(Column::Date.prev(), None);
        assert_eq!(Column::from_index(6), Some(Column::LAST));
        assert_eq!(Column::from_index(7), None);
    }

    #[test]
    fn new_draft_has_header_and_blank_detail() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let draft = TransactionDraft::new(date);
        assert_eq!(draft.row_count(), 2);
        assert_eq!(draft.header.date, Some(date));
        assert!(!draft.details[0].is_touched());
    }

    #[test]
    fn header_rows_hide_amount_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let header = HeaderLine::new(date);
        let row = GridRow::Header(&header);
        assert_eq!(row.cell_text(Column::Date), "2024-06-01");
        assert!(!row.is_editable(Column::Debit));
        let detail = DetailLine::default();
        assert!(!GridRow::Detail(&detail).is_editable(Column::Date));
    }
}
