//! Non-blocking warnings about detail lines the server would refuse.

use std::fmt;

use rust_decimal::Decimal;

use crate::core::grid::GridSession;
use crate::domain::{ChartOfAccounts, GridRow, Period};

/// OHADA class of third-party accounts, which need a counterparty.
const THIRD_PARTY_CLASS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingDate,
    DateOutsidePeriod,
    FutureDate,
    UnresolvedAccount(String),
    InactiveAccount(String),
    MissingCounterparty(String),
    BothSides,
    ZeroAmount,
    NegativeAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIssue {
    pub row: usize,
    pub kind: IssueKind,
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingDate => write!(f, "row {}: transaction has no date", self.row),
            IssueKind::DateOutsidePeriod => {
                write!(f, "row {}: date is outside the selected period", self.row)
            }
            IssueKind::FutureDate => write!(f, "row {}: date is in the future", self.row),
            IssueKind::UnresolvedAccount(code) => {
                write!(f, "row {}: no account matches `{}`", self.row, code)
            }
            IssueKind::InactiveAccount(code) => {
                write!(f, "row {}: account {} is inactive", self.row, code)
            }
            IssueKind::MissingCounterparty(code) => {
                write!(f, "row {}: account {} needs a counterparty", self.row, code)
            }
            IssueKind::BothSides => {
                write!(f, "row {}: line has both a debit and a credit", self.row)
            }
            IssueKind::ZeroAmount => {
                write!(f, "row {}: line needs a debit or a credit", self.row)
            }
            IssueKind::NegativeAmount => write!(f, "row {}: amounts must be positive", self.row),
        }
    }
}

/// Lists issues per row, in row order. Header dates are checked against
/// `period` when one is selected and against the session's today.
pub fn diagnostics(
    session: &GridSession,
    chart: &ChartOfAccounts,
    period: Option<&Period>,
) -> Vec<LineIssue> {
    let today = session.today();
    let mut issues = Vec::new();
    for (row, line) in session.rows().enumerate() {
        let mut push = |kind| issues.push(LineIssue { row, kind });
        let detail = match line {
            GridRow::Header(header) => {
                match header.date {
                    None if !header.fields.account_code.is_empty() => {
                        push(IssueKind::MissingDate)
                    }
                    Some(date) => {
                        if period.is_some_and(|period| !period.contains(date)) {
                            push(IssueKind::DateOutsidePeriod);
                        }
                        if date > today {
                            push(IssueKind::FutureDate);
                        }
                    }
                    None => {}
                }
                continue;
            }
            GridRow::Detail(detail) => detail,
        };
        let fields = &detail.fields;
        match fields.account_id {
            None if !fields.account_code.is_empty() => {
                push(IssueKind::UnresolvedAccount(fields.account_code.clone()))
            }
            Some(id) => {
                if let Some(account) = chart.get(id) {
                    if !account.is_active {
                        push(IssueKind::InactiveAccount(account.code.clone()));
                    }
                    if account.class() == Some(THIRD_PARTY_CLASS)
                        && fields.counterparty.trim().is_empty()
                    {
                        push(IssueKind::MissingCounterparty(account.code.clone()));
                    }
                }
            }
            None => {}
        }
        let debit = detail.debit.value_or_zero();
        let credit = detail.credit.value_or_zero();
        if debit > Decimal::ZERO && credit > Decimal::ZERO {
            push(IssueKind::BothSides);
        }
        if debit.is_zero() && credit.is_zero() && !fields.account_code.is_empty() {
            push(IssueKind::ZeroAmount);
        }
        if debit < Decimal::ZERO || credit < Decimal::ZERO {
            push(IssueKind::NegativeAmount);
        }
    }
    issues
}
