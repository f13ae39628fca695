//! Entry-grid lines, reference data and submission payloads.

pub mod account;
pub mod amount;
pub mod entry;
pub mod fiscal_year;
pub mod journal;
pub mod payload;

pub use account::{Account, AccountId, AccountType, ChartOfAccounts, NormalBalance};
pub use amount::{
    format_amount, parse_decimal, within_epsilon, Amount, BALANCE_EPSILON, MAX_AMOUNT,
};
pub use entry::{
    Column, DetailLine, GridRow, HeaderLine, LineFields, LineSlot, RowRef, TransactionDraft,
};
pub use fiscal_year::{FiscalYear, FiscalYearId, FiscalYearStatus, Period, PeriodId, PeriodStatus};
pub use journal::{Journal, JournalId, JournalType};
pub use payload::{PayloadLine, TransactionPayload};
