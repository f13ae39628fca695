use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{format_amount, Column};

/// Rejected grid mutations. State is unchanged when one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),
    #[error("Column {} is not editable on row {row}", .column.title())]
    ReadOnlyCell { row: usize, column: Column },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Amount {0} exceeds the largest allowed amount")]
    AmountOutOfRange(String),
}

/// Failures of the save flow, from precondition checks to the sink.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Select a journal before saving")]
    JournalNotSelected,
    #[error("Select a period before saving")]
    PeriodNotSelected,
    #[error("Period {0} is not open for entries")]
    PeriodClosed(String),
    #[error(
        "Entries are not balanced. Debit: {}, Credit: {}, Gap: {}",
        amount(.debit),
        amount(.credit),
        gap(.debit, .credit)
    )]
    Unbalanced { debit: Decimal, credit: Decimal },
    #[error("Transaction on row {0} has no date")]
    MissingDate(usize),
    #[error("{message}")]
    Rejected { saved: usize, message: String },
}

fn amount(value: &Decimal) -> String {
    format_amount(*value)
}

fn gap(debit: &Decimal, credit: &Decimal) -> String {
    format_amount(debit.saturating_sub(*credit).abs())
}

/// Reference data could not be loaded; the entry grid must not open.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),
    #[error("No open fiscal year")]
    NoOpenFiscalYear,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Invalid input: {0}")]
    Input(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_message_reports_gap() {
        let err = SubmissionError::Unbalanced {
            debit: Decimal::new(15000, 2),
            credit: Decimal::new(100, 0),
        };
        assert_eq!(
            err.to_string(),
            "Entries are not balanced. Debit: 150.00, Credit: 100.00, Gap: 50.00"
        );
    }

    #[test]
    fn read_only_message_names_column() {
        let err = GridError::ReadOnlyCell {
            row: 0,
            column: Column::Debit,
        };
        assert_eq!(err.to_string(), "Column Débit is not editable on row 0");
    }
}
