#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use saisie_core::{
    core::{FixedClock, GridSession, SessionContext},
    domain::{
        Account, AccountType, ChartOfAccounts, Column, FiscalYear, FiscalYearStatus, Journal,
        JournalType, NormalBalance, Period, PeriodStatus, TransactionPayload,
    },
    storage::{json_backend::ReferenceFile, SinkError, SubmissionReceipt, TransactionSink},
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn clock() -> FixedClock {
    FixedClock(date(2024, 6, 1))
}

pub fn grid() -> GridSession {
    GridSession::new(clock())
}

pub fn accounts() -> Vec<Account> {
    let mut inactive = Account::new(6, "658", "Charges diverses", AccountType::Charge);
    inactive.is_active = false;
    vec![
        Account::new(1, "601100", "Achats de marchandises", AccountType::Charge),
        Account::new(2, "401100", "Fournisseurs", AccountType::Passif)
            .with_normal_balance(NormalBalance::Credit),
        Account::new(3, "411100", "Clients", AccountType::Actif),
        Account::new(4, "521100", "Banque", AccountType::Actif)
            .with_normal_balance(NormalBalance::Variable),
        Account::new(5, "701100", "Ventes de marchandises", AccountType::Produit)
            .with_normal_balance(NormalBalance::Credit),
        inactive,
    ]
}

pub fn chart() -> ChartOfAccounts {
    ChartOfAccounts::new(accounts())
}

pub fn journals() -> Vec<Journal> {
    let mut closed = Journal::new(9, "OD", "Operations diverses", JournalType::Miscellaneous);
    closed.is_active = false;
    vec![
        Journal::new(1, "AC", "Achats", JournalType::Purchases),
        Journal::new(2, "VT", "Ventes", JournalType::Sales),
        closed,
    ]
}

/// 2024 fiscal year: May is closed, June and July are open.
pub fn fiscal_year() -> FiscalYear {
    let period = |id, number: u8, month: u32, end: u32, status| Period {
        id,
        number,
        start_date: date(2024, month, 1),
        end_date: date(2024, month, end),
        status,
    };
    FiscalYear {
        id: 2024,
        code: "2024".into(),
        label: "Exercice 2024".into(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        status: FiscalYearStatus::Open,
        periods: vec![
            period(5, 5, 5, 31, PeriodStatus::Closed),
            period(6, 6, 6, 30, PeriodStatus::Open),
            period(7, 7, 7, 31, PeriodStatus::Open),
        ],
    }
}

pub fn reference_file() -> ReferenceFile {
    ReferenceFile {
        journals: journals(),
        accounts: accounts(),
        fiscal_years: vec![fiscal_year()],
    }
}

pub fn write_reference(dir: &Path) {
    let json = serde_json::to_string_pretty(&reference_file()).expect("serialize reference");
    std::fs::write(dir.join("reference.json"), json).expect("write reference file");
}

/// Journal AC and the June period selected.
pub fn context() -> SessionContext {
    let mut context = SessionContext::new(Some(fiscal_year()));
    context.select_journal(journals().remove(0));
    context.select_period(6).expect("june is open");
    context
}

/// Fills `row` cell by cell.
pub fn fill(session: &mut GridSession, row: usize, cells: &[(Column, &str)]) {
    let chart = chart();
    for (column, value) in cells {
        session
            .set_cell(row, *column, value, &chart)
            .expect("cell is editable");
    }
}

/// Header `601 / Achat fournitures` with a 100.00 debit on 601 and a
/// 100.00 credit on 401.
pub fn balanced_purchase(session: &mut GridSession) {
    fill(
        session,
        0,
        &[
            (Column::Account, "601"),
            (Column::Description, "Achat fournitures"),
        ],
    );
    fill(session, 1, &[(Column::Account, "601"), (Column::Debit, "100.00")]);
    let row = session.append_line(1).expect("append");
    fill(session, row, &[(Column::Account, "401"), (Column::Credit, "100.00")]);
}

/// Records every payload; fails from the `fail_from`-th call on.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub created: Vec<TransactionPayload>,
    pub fail_from: Option<usize>,
    pub failure: Option<String>,
}

impl RecordingSink {
    pub fn failing_at(index: usize, message: Option<&str>) -> Self {
        Self {
            created: Vec::new(),
            fail_from: Some(index),
            failure: message.map(str::to_string),
        }
    }
}

impl TransactionSink for RecordingSink {
    fn create(&mut self, payload: &TransactionPayload) -> Result<SubmissionReceipt, SinkError> {
        if self.fail_from.is_some_and(|index| self.created.len() >= index) {
            return Err(match &self.failure {
                Some(message) => SinkError::new(message.clone()),
                None => SinkError::silent(),
            });
        }
        self.created.push(payload.clone());
        let id = self.created.len() as i64;
        Ok(SubmissionReceipt {
            id,
            number: format!("AC24{id:04}"),
        })
    }
}
